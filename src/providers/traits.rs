use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API request failed: Status {status}, Body: {body}")]
    Status { status: u16, body: String },
    #[error("API returned error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Response contained no text")]
    EmptyResponse,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// One blocking request/response exchange; no streaming.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    fn get_system_message(&self) -> &str;

    fn get_model_info(&self) -> &str;
}
