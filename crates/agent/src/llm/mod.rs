//! LLM backend abstraction.
//!
//! Provides a trait for text-completion backends, allowing the pipeline to
//! swap providers (Anthropic API, stubs in tests) through a unified
//! interface.

mod anthropic;

pub use anthropic::{AnthropicBackend, AnthropicBackendBuilder};

use std::future::Future;
use thiserror::Error;

/// Errors from LLM provider calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A network error occurred during the API call.
    #[error("network: {0}")]
    Network(String),

    /// The LLM provider returned an error response.
    #[error("provider api: {0}")]
    Api(String),

    /// The provider response could not be parsed.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider returned an empty completion.
    #[error("empty completion")]
    Empty,
}

/// Trait for LLM backends.
///
/// The pipeline sends one rendered prompt per query as a single user
/// message and consumes the completion as untrusted free-form text.
pub trait LlmBackend: Send + Sync {
    /// Send a prompt and get the text completion.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, ModelError>> + Send;
}
