//! chatgate-lambda
//!
//! The completion proxy: an axum router that authenticates the caller,
//! applies rate limiting, calls the provider, and returns a sanitized
//! structured reply. Runs under AWS Lambda or as a local listener.

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Path of the completion endpoint.
pub const COMPLETE_PATH: &str = "/chatbot-complete";

/// Build the proxy router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        .route(
            COMPLETE_PATH,
            post(routes::complete::complete).fallback(routes::method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(axum_mw::from_fn(middleware::access_log::access_log))
                .layer(CatchPanicLayer::custom(middleware::panic::handle_panic)),
        )
        .with_state(state)
}
