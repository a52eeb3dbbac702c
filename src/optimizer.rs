//! The request handler: resolve a template, substitute the prompt, call the generator.

use std::sync::Arc;
use std::time::Duration;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::catalog::{Category, TemplateCatalog, PROMPT_PLACEHOLDER};
use crate::generation::{GenerateText, GenerationRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};

/// Inbound optimization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl OptimizationRequest {
    pub fn new(prompt: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            prompt: prompt.into(),
            category: category.map(str::to_string),
        }
    }
}

/// Outcome of one optimization. `category` echoes what the caller sent, not the resolved category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original: String,
    pub optimized: String,
    pub category: String,
}

/// Parameters of the outbound generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u16,
    pub temperature: f32,
    /// Upper bound on one generation call; the call is dropped when it elapses.
    pub timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("failed to fill template: {0}")]
    Fill(#[from] PlaceholderNotExist),

    #[error("failed to complete template: {0}")]
    Complete(#[from] UnfilledPlaceholders),

    #[error("text generation failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Turns a raw prompt into an optimized one with the help of a text generator.
#[derive(Clone)]
pub struct PromptOptimizer {
    catalog: Arc<TemplateCatalog>,
    generator: Arc<dyn GenerateText>,
    settings: GenerationSettings,
}

impl PromptOptimizer {
    pub fn new(catalog: Arc<TemplateCatalog>, generator: Arc<dyn GenerateText>, settings: GenerationSettings) -> Self {
        Self {
            catalog,
            generator,
            settings,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Substitute `prompt` into the template that `category` resolves to.
    pub fn build_prompt(&self, prompt: &str, category: &str) -> Result<String, OptimizeError> {
        self.fill_template(Category::resolve(category), prompt)
    }

    fn fill_template(&self, category: Category, prompt: &str) -> Result<String, OptimizeError> {
        let completed = self.catalog
            .get(category)
            .template
            .construct_prompt()
            .try_fill(PROMPT_PLACEHOLDER, prompt)?
            .complete()?;
        Ok(completed)
    }

    /// Rewrite the request's prompt through the generator.
    pub async fn optimize(&self, request: OptimizationRequest) -> Result<OptimizationResult, OptimizeError> {
        let OptimizationRequest { prompt, category } = request;
        let category = category.unwrap_or_else(|| Category::General.to_string());
        let resolved = Category::resolve(&category);
        let outbound = self.fill_template(resolved, &prompt)?;
        info!("optimizing prompt: category = {}, resolved = {}, {} chars", category, resolved, prompt.chars().count());

        let generation = GenerationRequest {
            prompt: outbound,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        let optimized = match tokio::time::timeout(self.settings.timeout, self.generator.generate(generation)).await {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                warn!("text generation failed: {:#}", err);
                return Err(OptimizeError::Upstream(err));
            }
            Err(_) => {
                warn!("text generation timed out after {:?}", self.settings.timeout);
                return Err(OptimizeError::Timeout(self.settings.timeout));
            }
        };

        Ok(OptimizationResult {
            original: prompt,
            optimized,
            category,
        })
    }
}
