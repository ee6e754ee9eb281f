use async_trait::async_trait;
use thiserror::Error;

/// One chat-completion call: a system message, a user message and the
/// sampling bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Unable to reach completion API: {0}")]
    Unreachable(String),

    #[error("Completion API rejected credentials")]
    AuthFailed,

    #[error("Completion API rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Completion API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issues exactly one completion call and returns the text of the first
    /// choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    fn model_name(&self) -> &str;
}
