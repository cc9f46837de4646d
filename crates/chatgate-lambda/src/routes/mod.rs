pub mod complete;
pub mod health;

use crate::error::ApiError;

/// Fallback for any method other than the route's own.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
