//! Text generation endpoint.
//!
//! The optimizer only needs one request/response call: send a completed prompt with a token budget and a sampling
//! temperature, get text back. [GenerateText] is that seam; [OpenAICompletion] implements it against an
//! OpenAI-compatible completions API.

use anyhow::{anyhow, Context, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::CreateCompletionRequestArgs;
use async_openai::Client;
use async_trait::async_trait;
use serde::Serialize;

/// Default completion budget of an optimization call.
pub const DEFAULT_MAX_TOKENS: u16 = 200;

/// Default sampling temperature of an optimization call.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Inputs of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u16,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Anything that turns a prompt into generated text.
#[async_trait]
pub trait GenerateText: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

/// Completion model from an OpenAI-compatible API.
#[derive(Clone, Debug)]
pub struct OpenAICompletion {
    pub client: Client<OpenAIConfig>,
    pub model: String,
}

impl OpenAICompletion {
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }
}

#[async_trait]
impl GenerateText for OpenAICompletion {
    /// Sends a completion request and returns the text of the first choice.
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let completion = CreateCompletionRequestArgs::default()
            .model(self.model.as_str())
            .prompt(request.prompt)
            .max_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()
            .context("building completion request")?;
        let response = self.client
            .completions()
            .create(completion)
            .await
            .with_context(|| format!("completion request to model {} failed", self.model))?;
        response.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| anyhow!("completion response from model {} has no choices", self.model))
    }
}
