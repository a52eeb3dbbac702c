//! # prompt-optimizer
//!
//! Category-aware prompt rewriting in front of a text-generation API.
//!
//! A user sends a rough prompt and a category. The service picks the category's rewriting template, drops the prompt
//! into it and asks an LLM to produce a better prompt. That's all: no caching, no retries, no state shared between
//! requests.
//!
//! ## Concepts
//!
//! ### Prompt Template and Placeholder
//!
//! A template is a string with named slots:
//!
//! ```text
//! Enhance this coding-related prompt:
//! {[prompt]}
//! ```
//!
//! `{[prompt]}` is a placeholder named `"prompt"`. A [`PromptTemplate`](crate::prompt::PromptTemplate) is turned into
//! a [`PartialPrompt`](crate::prompt::PartialPrompt), filled, then completed into a plain `String`. See
//! [prompt](crate::prompt).
//!
//! ### Category and Catalog
//!
//! [`Category`](crate::catalog::Category) is one of `general`, `coding`, `creative`, `business`. The
//! [`TemplateCatalog`](crate::catalog::TemplateCatalog) maps each category to a template with exactly one
//! `{[prompt]}` slot. Unknown category names resolve to `general`.
//!
//! ### Endpoint or LLM
//!
//! The completed prompt goes to anything implementing [`GenerateText`](crate::generation::GenerateText); the shipped
//! implementation talks to an OpenAI-compatible completions API.
//!
//! ### Optimizer and Server
//!
//! [`PromptOptimizer`](crate::optimizer::PromptOptimizer) glues the above together and bounds the generation call
//! with a timeout. [server] exposes it over HTTP.
//!
//! ## License
//!
//! Apache-2.0


pub mod prompt;
pub mod catalog;
pub mod generation;
pub mod optimizer;
pub mod config;
pub mod server;
pub mod utils;
