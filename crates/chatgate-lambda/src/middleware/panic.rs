use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Turn a panic in request handling into a generic `INTERNAL_ERROR` response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic type".to_string()
    };

    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
