//! Generative AI backends.
//!
//! The chat engine only sees [`TextGenerator`], so tests swap in scripted
//! generators and the engine never knows which HTTP API sits behind it.

pub mod gemini;

pub use gemini::GeminiClient;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("API returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("API returned no text in the response candidates")]
    EmptyResponse,
}

impl GenerationError {
    /// Rate limits and server-side failures are worth retrying later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) => true,
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::InvalidResponse(_) | Self::EmptyResponse => false,
        }
    }
}

/// Anything that turns a prompt into text
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Short description for the status bar
    fn describe(&self) -> String {
        "AI".to_string()
    }
}
