//! # Template Catalog
//!
//! A fixed mapping from [Category] to a [PromptTemplate] and a few example prompts.
//!
//! Every template in a catalog has exactly one `{[prompt]}` placeholder and no other placeholder; this is checked when
//! the catalog is built, so substituting a user prompt into a resolved template cannot fail afterwards.
//!
//! Resolution is total: [TemplateCatalog::resolve] accepts any string and falls back to [Category::General] for
//! anything that is not exactly one of the known category names.

use std::fmt;
use std::str::FromStr;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::prompt::PromptTemplate;

/// Name of the single placeholder every catalog template carries.
pub const PROMPT_PLACEHOLDER: &str = "prompt";

/// A label selecting which rewriting template applies to a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Coding,
    Creative,
    Business,
}

impl Category {
    /// All categories, in catalog order.
    pub const ALL: [Category; 4] = [Category::General, Category::Coding, Category::Creative, Category::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Coding => "coding",
            Category::Creative => "creative",
            Category::Business => "business",
        }
    }

    /// Maps any string to a category. Unknown names resolve to [Category::General].
    pub fn resolve(name: &str) -> Category {
        name.parse().unwrap_or_else(|UnknownCategory(name)| {
            debug!("unknown category {:?}, falling back to {}", name, Category::General);
            Category::General
        })
    }

    #[inline]
    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a string that is not exactly one of the category names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One row of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub category: Category,
    pub template: PromptTemplate,
    pub examples: Vec<String>,
}

impl CatalogEntry {
    pub fn new(category: Category, template: impl Into<String>, examples: &[&str]) -> Self {
        Self {
            category,
            template: PromptTemplate::new(template),
            examples: examples.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Errors found while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("template for {category} must contain {{[{placeholder}]}} exactly once, found {found} occurrence(s)")]
    PlaceholderCount {
        category: Category,
        placeholder: &'static str,
        found: usize,
    },

    #[error("template for {category} has unexpected placeholders: {placeholders:?}")]
    ForeignPlaceholders {
        category: Category,
        placeholders: Vec<String>,
    },

    #[error("category {0} appears more than once")]
    DuplicateCategory(Category),

    #[error("category {0} has no template")]
    MissingCategory(Category),
}

/// Immutable category -> template mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    /// Indexed by [Category::index]
    entries: Vec<CatalogEntry>,
}

impl TemplateCatalog {
    /// The canonical catalog shipped with the service.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_entries([
            CatalogEntry::new(Category::General, GENERAL_TEMPLATE, &[
                "Write a blog post about AI",
                "Explain quantum computing",
            ]),
            CatalogEntry::new(Category::Coding, CODING_TEMPLATE, &[
                "Write a function to sort an array",
                "Create an API endpoint",
            ]),
            CatalogEntry::new(Category::Creative, CREATIVE_TEMPLATE, &[
                "Design a logo for a tech company",
                "Write a story about the future",
            ]),
            CatalogEntry::new(Category::Business, BUSINESS_TEMPLATE, &[
                "Create a marketing strategy",
                "Write a business proposal",
            ]),
        ])
    }

    /// Build a catalog from entries, checking that every category is covered exactly once and that every template
    /// has a single `{[prompt]}` slot.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Result<Self, CatalogError> {
        let mut slots: Vec<Option<CatalogEntry>> = vec![None; Category::ALL.len()];
        for entry in entries {
            Self::validate(&entry)?;
            let slot = &mut slots[entry.category.index()];
            if slot.is_some() {
                return Err(CatalogError::DuplicateCategory(entry.category));
            }
            *slot = Some(entry);
        }
        let entries = slots
            .into_iter()
            .zip(Category::ALL)
            .map(|(slot, category)| slot.ok_or(CatalogError::MissingCategory(category)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    fn validate(entry: &CatalogEntry) -> Result<(), CatalogError> {
        let found = entry.template.occurrences(PROMPT_PLACEHOLDER);
        if found != 1 {
            return Err(CatalogError::PlaceholderCount {
                category: entry.category,
                placeholder: PROMPT_PLACEHOLDER,
                found,
            });
        }
        let mut foreign: Vec<String> = entry.template.placeholders
            .iter()
            .filter(|p| p.as_str() != PROMPT_PLACEHOLDER)
            .cloned()
            .collect();
        if !foreign.is_empty() {
            foreign.sort();
            return Err(CatalogError::ForeignPlaceholders {
                category: entry.category,
                placeholders: foreign,
            });
        }
        Ok(())
    }

    /// Entry for a known category.
    pub fn get(&self, category: Category) -> &CatalogEntry {
        &self.entries[category.index()]
    }

    /// Resolve an arbitrary category string. Never fails: unknown names get the `general` entry.
    pub fn resolve(&self, category: &str) -> &CatalogEntry {
        self.get(Category::resolve(category))
    }

    /// Entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

const GENERAL_TEMPLATE: &str = "Optimize this prompt for better AI responses:
{[prompt]}

Consider:
- Clarity and specificity
- Context and background
- Desired output format
- Constraints and requirements";

const CODING_TEMPLATE: &str = "Enhance this coding-related prompt:
{[prompt]}

Include:
- Language/framework specifications
- Input/output examples
- Performance requirements
- Error handling expectations";

const CREATIVE_TEMPLATE: &str = "Transform this creative prompt:
{[prompt]}

Add:
- Style references
- Mood and atmosphere
- Technical specifications
- Inspiration sources";

const BUSINESS_TEMPLATE: &str = "Optimize this business prompt:
{[prompt]}

Include:
- Industry context
- Target audience
- Success metrics
- Compliance requirements";

#[cfg(test)]
mod test_catalog {
    use std::collections::HashSet;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use super::*;

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::builtin().expect("builtin catalog is valid")
    }

    #[rstest]
    #[case("general", Category::General, "Optimize this prompt for better AI responses:")]
    #[case("coding", Category::Coding, "Enhance this coding-related prompt:")]
    #[case("creative", Category::Creative, "Transform this creative prompt:")]
    #[case("business", Category::Business, "Optimize this business prompt:")]
    fn known_categories_resolve_to_their_template(#[case] name: &str, #[case] category: Category, #[case] head: &str) {
        let catalog = catalog();
        let entry = catalog.resolve(name);
        assert_eq!(category, entry.category);
        assert!(entry.template.str().starts_with(head));
        assert_eq!(2, entry.examples.len());
    }

    #[test]
    fn templates_are_distinct() {
        let catalog = catalog();
        let templates: HashSet<&str> = catalog.entries().map(|e| e.template.str()).collect();
        assert_eq!(Category::ALL.len(), templates.len());
    }

    #[rstest]
    #[case("unknown_category")]
    #[case("")]
    #[case("Coding")]
    #[case(" general")]
    fn unknown_categories_fall_back_to_general(#[case] name: &str) {
        let catalog = catalog();
        assert_eq!(catalog.get(Category::General).template, catalog.resolve(name).template);
    }

    #[test]
    fn resolution_is_idempotent() {
        let catalog = catalog();
        for name in ["general", "coding", "creative", "business", "whatever"] {
            let first = catalog.resolve(name).template.clone();
            for _ in 0..3 {
                assert_eq!(first, catalog.resolve(name).template);
            }
        }
    }

    #[test]
    fn category_round_trips_through_serde() {
        assert_eq!("\"creative\"", serde_json::to_string(&Category::Creative).unwrap());
        assert_eq!(Category::Business, serde_json::from_str::<Category>("\"business\"").unwrap());
        assert_matches!("nope".parse::<Category>(), Err(UnknownCategory(name)) if name == "nope");
    }

    #[test]
    fn rejects_template_without_slot() {
        let err = TemplateCatalog::from_entries([CatalogEntry::new(Category::General, "no slot", &[])]).unwrap_err();
        assert_matches!(err, CatalogError::PlaceholderCount { category: Category::General, found: 0, .. });
    }

    #[test]
    fn rejects_template_with_two_slots() {
        let err = TemplateCatalog::from_entries([
            CatalogEntry::new(Category::Coding, "{[prompt]} and again {[prompt]}", &[]),
        ]).unwrap_err();
        assert_matches!(err, CatalogError::PlaceholderCount { category: Category::Coding, found: 2, .. });
    }

    #[test]
    fn rejects_foreign_placeholder() {
        let err = TemplateCatalog::from_entries([
            CatalogEntry::new(Category::General, "{[prompt]} for {[audience]}", &[]),
        ]).unwrap_err();
        assert_eq!(CatalogError::ForeignPlaceholders {
            category: Category::General,
            placeholders: vec!["audience".to_string()],
        }, err);
    }

    #[test]
    fn rejects_duplicate_and_missing_categories() {
        let err = TemplateCatalog::from_entries([
            CatalogEntry::new(Category::General, "{[prompt]}", &[]),
            CatalogEntry::new(Category::General, "again {[prompt]}", &[]),
        ]).unwrap_err();
        assert_eq!(CatalogError::DuplicateCategory(Category::General), err);

        let err = TemplateCatalog::from_entries([
            CatalogEntry::new(Category::General, "{[prompt]}", &[]),
            CatalogEntry::new(Category::Coding, "{[prompt]}", &[]),
            CatalogEntry::new(Category::Creative, "{[prompt]}", &[]),
        ]).unwrap_err();
        assert_eq!(CatalogError::MissingCategory(Category::Business), err);
    }
}
