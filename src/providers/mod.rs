//! Text-generation provider integrations

mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiModel, DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never completed (connect, DNS, timeout, body read).
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("Service rejected request ({status}): {message}")]
    ServiceRejected { status: u16, message: String },

    /// A 2xx response that could not be used as generated text.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The one capability the chat engine needs from a model service.
///
/// Kept behind a trait so tests can script replies without a network.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
