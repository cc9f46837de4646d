use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream API key is not configured")]
    MissingApiKey,

    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream network error: {0}")]
    Network(String),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("upstream response contained no output text")]
    EmptyResponse,
}
