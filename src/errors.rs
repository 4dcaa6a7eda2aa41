use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No Gemini API key configured")]
    MissingApiKey,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Request to generation service timed out")]
    Timeout,
    #[error("Rate limited by generation service")]
    RateLimited,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Generation service returned no usable text")]
    EmptyResponse,
}
