use thiserror::Error;

use chatgate_core::error::CoreError;
use chatgate_upstream::error::UpstreamError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("message must not be empty")]
    EmptyInput,

    #[error("sign in to use the assistant")]
    MissingAccessToken,

    /// The proxy answered with an error body.
    #[error("proxy returned {status} {code}: {message}")]
    Proxy {
        status: u16,
        code: String,
        message: String,
    },

    #[error("proxy request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("proxy response did not contain a reply")]
    InvalidResponse,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
