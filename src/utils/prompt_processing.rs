use std::collections::{HashMap, HashSet};
use regex::{Captures, Regex};
use lazy_static::lazy_static;


lazy_static! {
    pub(crate) static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\[.*?\]\}").unwrap();
}

#[inline]
pub(crate) fn strip_format(key: &str) -> &str {
    //! Strips "{\[" and "\]}" for a string, which is algorithmically unsafe.
    //! Ensure the string is properly formatted like "{\[a\]}".
    &key[2..key.len() - 2]
}

/// Replaces every placeholder occurrence in one pass over `original`.
///
/// Filled values are inserted verbatim and never re-scanned. Placeholders that have no filling value are left as they
/// are.
pub(crate) fn replace_all_placeholders(original: &str, mapping: &HashMap<String, Option<String>>) -> String {
    PLACEHOLDER_MATCH_RE
        .replace_all(original, |captures: &Captures| {
            let match_text = &captures[0];
            let key = strip_format(match_text);
            match mapping.get(key) {
                Some(Some(value)) => value.clone(),
                _ => match_text.to_string(),
            }
        })
        .into_owned()
}

/// Collects the distinct placeholder names of a template string.
pub fn get_placeholders(string: &str) -> HashSet<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .map(|captures| strip_format(&captures[0]).to_string())
        .collect()
}

/// Counts how many times each placeholder appears in a template string.
pub fn count_placeholder_occurrences(string: &str) -> HashMap<String, usize> {
    let mut count = HashMap::new();
    PLACEHOLDER_MATCH_RE
        .captures_iter(string)
        .for_each(|captures| {
            let placeholder_name = strip_format(&captures[0]).to_string();
            *count.entry(placeholder_name).or_insert(0) += 1;
        });
    count
}
