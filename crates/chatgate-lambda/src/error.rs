use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use chatgate_audit::events::AuditOutcome;
use chatgate_core::error::CoreError;
use chatgate_upstream::error::UpstreamError;

/// Every way a completion request can fail, as seen by the client.
///
/// Auth failures are a single variant so the response never reveals whether
/// a token was missing or rejected.
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest,
    Unauthorized,
    MethodNotAllowed,
    RateLimited { retry_after_seconds: u64 },
    Config(String),
    Upstream(String),
    UpstreamNetwork(String),
    UpstreamEmptyResponse,
    UpstreamTimeout,
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_)
            | ApiError::UpstreamNetwork(_)
            | ApiError::UpstreamEmptyResponse => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest => "INVALID_REQUEST",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::RateLimited { .. } => "RATE_LIMITED",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::UpstreamNetwork(_) => "UPSTREAM_NETWORK_ERROR",
            ApiError::UpstreamEmptyResponse => "UPSTREAM_EMPTY_RESPONSE",
            ApiError::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Outcome recorded in the audit event for this failure.
    pub fn audit_outcome(&self) -> AuditOutcome {
        match self {
            ApiError::RateLimited { .. } => AuditOutcome::RateLimited,
            ApiError::Config(_) => AuditOutcome::ConfigError,
            ApiError::Upstream(_) => AuditOutcome::UpstreamError,
            ApiError::UpstreamNetwork(_) => AuditOutcome::UpstreamNetworkError,
            ApiError::UpstreamEmptyResponse => AuditOutcome::UpstreamEmptyResponse,
            ApiError::UpstreamTimeout => AuditOutcome::UpstreamTimeout,
            ApiError::InvalidRequest
            | ApiError::Unauthorized
            | ApiError::MethodNotAllowed
            | ApiError::Internal(_) => AuditOutcome::InternalError,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest => {
                "Request body must include a non-empty \"input\" string.".to_string()
            }
            ApiError::Unauthorized => "Authentication required.".to_string(),
            ApiError::MethodNotAllowed => "Method not allowed.".to_string(),
            ApiError::RateLimited {
                retry_after_seconds,
            } => format!("Too many requests. Try again in {retry_after_seconds} seconds."),
            ApiError::Config(_) => "Chatbot service is not configured.".to_string(),
            ApiError::Upstream(message) => message.clone(),
            ApiError::UpstreamNetwork(_) => "Could not reach the chatbot provider.".to_string(),
            ApiError::UpstreamEmptyResponse => {
                "The chatbot provider returned an empty response.".to_string()
            }
            ApiError::UpstreamTimeout => {
                "The chatbot provider took too long to respond. Please try again.".to_string()
            }
            ApiError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Config(detail) => tracing::error!("configuration error: {detail}"),
            ApiError::Internal(detail) => tracing::error!("internal error: {detail}"),
            _ => {}
        }

        let status = self.status();
        let body = ErrorBody {
            message: self.message(),
            code: self.code(),
        };
        let mut response = (status, Json(body)).into_response();

        if let ApiError::RateLimited {
            retry_after_seconds,
        } = self
        {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from(retry_after_seconds),
            );
        }

        response
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::MissingApiKey => ApiError::Config(e.to_string()),
            UpstreamError::Timeout(_) => ApiError::UpstreamTimeout,
            UpstreamError::Network(detail) => ApiError::UpstreamNetwork(detail),
            UpstreamError::Status { message, .. } => ApiError::Upstream(message),
            UpstreamError::EmptyResponse => ApiError::UpstreamEmptyResponse,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
