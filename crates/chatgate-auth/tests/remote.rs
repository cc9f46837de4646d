use std::net::SocketAddr;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use chatgate_auth::provider::{IdentityProvider, RejectAllIdentityProvider};
use chatgate_auth::remote::RemoteIdentityProvider;
use serde_json::{Value, json};

async fn user_endpoint(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    let api_key = headers.get("apikey").and_then(|v| v.to_str().ok());

    match (bearer, api_key) {
        (Some("Bearer good"), Some("anon-key")) => {
            Ok(Json(json!({ "id": "user-42", "email": "x@example.com" })))
        }
        (Some("Bearer no-id"), Some("anon-key")) => Ok(Json(json!({ "email": "x@example.com" }))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn spawn_identity_server() -> SocketAddr {
    let app = Router::new().route("/auth/v1/user", get(user_endpoint));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server runs");
    });
    addr
}

fn provider(addr: SocketAddr) -> RemoteIdentityProvider {
    RemoteIdentityProvider::new(
        reqwest::Client::new(),
        format!("http://{addr}/auth/v1/user"),
        Some("anon-key".to_string()),
    )
}

#[tokio::test]
async fn accepted_token_resolves_user() {
    let addr = spawn_identity_server().await;
    let identity = provider(addr).authenticate("good").await.expect("accepted");
    assert_eq!(identity.id, "user-42");
}

#[tokio::test]
async fn rejected_token_is_an_error() {
    let addr = spawn_identity_server().await;
    assert!(provider(addr).authenticate("bad").await.is_err());
}

#[tokio::test]
async fn user_without_id_is_an_error() {
    let addr = spawn_identity_server().await;
    assert!(provider(addr).authenticate("no-id").await.is_err());
}

#[tokio::test]
async fn reject_all_rejects() {
    assert!(RejectAllIdentityProvider.authenticate("anything").await.is_err());
}
