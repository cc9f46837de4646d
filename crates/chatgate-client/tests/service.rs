use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::{Value, json};

use chatgate_client::error::ClientError;
use chatgate_client::mode::{CompletionMode, CompletionSettings};
use chatgate_client::service::CompletionService;
use chatgate_core::models::message::ChatMessage;
use chatgate_core::models::ui_block::UiBlock;

#[derive(Clone, Default)]
struct Seen {
    body: Arc<Mutex<Option<Value>>>,
    auth: Arc<Mutex<Option<String>>>,
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server runs");
    });
    addr
}

async fn spawn_responder(status: StatusCode, response: Value) -> (SocketAddr, Seen) {
    let seen = Seen::default();
    let recorder = seen.clone();
    let app = Router::new().route(
        "/complete",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let recorder = recorder.clone();
            let response = response.clone();
            async move {
                *recorder.body.lock().unwrap() = Some(body);
                *recorder.auth.lock().unwrap() = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                (status, Json(response))
            }
        }),
    );
    (spawn(app).await, seen)
}

fn proxy_service(addr: SocketAddr) -> CompletionService {
    let settings = CompletionSettings {
        proxy_url: Some(format!("http://{addr}/complete")),
        ..Default::default()
    };
    CompletionService::new(&settings, reqwest::Client::new())
}

#[tokio::test]
async fn proxy_mode_sends_history_and_token() {
    let (addr, seen) = spawn_responder(
        StatusCode::OK,
        json!({ "success": true, "data": { "reply": "hi there" } }),
    )
    .await;
    let service = proxy_service(addr);

    let history = vec![
        ChatMessage::user("first"),
        ChatMessage::assistant("   "),
        ChatMessage::assistant("answer"),
    ];
    let reply = service
        .complete("  next question ", &history, Some("session-token"))
        .await
        .expect("completion succeeds");

    assert_eq!(reply.reply, "hi there");
    assert!(reply.ui.is_empty());
    assert_eq!(
        seen.auth.lock().unwrap().as_deref(),
        Some("Bearer session-token")
    );
    assert_eq!(
        seen.body.lock().unwrap().clone(),
        Some(json!({
            "input": "next question",
            "history": [
                { "role": "user", "text": "first" },
                { "role": "assistant", "text": "answer" },
            ],
        }))
    );
}

#[tokio::test]
async fn proxy_bare_shapes_are_accepted_and_ui_resanitized() {
    let (addr, _) = spawn_responder(
        StatusCode::OK,
        json!({
            "message": "Choose one",
            "ui": [
                { "type": "quick-replies", "options": [{ "label": "Yes" }, { "nope": true }] },
                { "type": "carousel" },
            ],
        }),
    )
    .await;
    let service = proxy_service(addr);

    let reply = service
        .complete("hello", &[], Some("t"))
        .await
        .expect("completion succeeds");

    assert_eq!(reply.reply, "Choose one");
    let [UiBlock::QuickReplies(block)] = reply.ui.as_slice() else {
        panic!("expected one quick-replies block, got {:?}", reply.ui);
    };
    assert_eq!(block.options.len(), 1);
    assert_eq!(block.options[0].id, "option-1");
    assert_eq!(block.options[0].payload, "Yes");
}

#[tokio::test]
async fn proxy_error_bodies_become_typed_errors() {
    let (addr, _) = spawn_responder(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "message": "Too many requests. Try again in 12 seconds.", "code": "RATE_LIMITED" }),
    )
    .await;
    let service = proxy_service(addr);

    let err = service
        .complete("hello", &[], Some("t"))
        .await
        .expect_err("rate limited");
    match err {
        ClientError::Proxy {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 429);
            assert_eq!(code, "RATE_LIMITED");
            assert!(message.contains("12 seconds"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn proxy_error_without_body_gets_fallback() {
    let (addr, _) = spawn_responder(StatusCode::BAD_GATEWAY, Value::Null).await;
    let service = proxy_service(addr);

    let err = service
        .complete("hello", &[], Some("t"))
        .await
        .expect_err("bad gateway");
    assert!(matches!(
        err,
        ClientError::Proxy { status: 502, ref code, .. } if code == "UNKNOWN"
    ));
}

#[tokio::test]
async fn proxy_success_without_reply_is_invalid() {
    let (addr, _) = spawn_responder(StatusCode::OK, json!({ "success": true, "data": {} })).await;
    let service = proxy_service(addr);

    let err = service
        .complete("hello", &[], Some("t"))
        .await
        .expect_err("no reply");
    assert!(matches!(err, ClientError::InvalidResponse));
}

#[tokio::test]
async fn proxy_mode_requires_a_token_before_sending() {
    let (addr, seen) = spawn_responder(StatusCode::OK, json!({ "reply": "x" })).await;
    let service = proxy_service(addr);

    let err = service
        .complete("hello", &[], None)
        .await
        .expect_err("no token");
    assert!(matches!(err, ClientError::MissingAccessToken));
    assert!(seen.body.lock().unwrap().is_none());
}

#[tokio::test]
async fn blank_input_is_rejected_locally() {
    let service = CompletionService::new(&CompletionSettings::default(), reqwest::Client::new());
    let err = service
        .complete("   ", &[], None)
        .await
        .expect_err("empty input");
    assert!(matches!(err, ClientError::EmptyInput));
}

#[tokio::test]
async fn mock_mode_needs_no_network() {
    let service = CompletionService::new(&CompletionSettings::default(), reqwest::Client::new());
    assert_eq!(service.mode(), &CompletionMode::Mock);

    let reply = service
        .complete("contact support", &[], None)
        .await
        .expect("mock reply");
    assert!(matches!(reply.ui.as_slice(), [UiBlock::Form(_)]));
}

#[tokio::test]
async fn direct_mode_calls_provider_and_parses_reply() {
    let (addr, seen) = spawn_responder(
        StatusCode::OK,
        json!({ "output_text": "{\"reply\":\"direct hi\",\"ui\":[{\"type\":\"menu\",\"title\":\"Plans\",\"items\":[{\"label\":\"Pro\"}]}]}" }),
    )
    .await;
    let settings = CompletionSettings {
        direct_api_key: Some("sk-direct".to_string()),
        allow_direct: true,
        upstream_endpoint: format!("http://{addr}/complete"),
        upstream_model: "test-model".to_string(),
        timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let service = CompletionService::new(&settings, reqwest::Client::new());

    let reply = service
        .complete("hello", &[], None)
        .await
        .expect("direct completion");

    assert_eq!(reply.reply, "direct hi");
    assert!(matches!(reply.ui.as_slice(), [UiBlock::Menu(menu)] if menu.items[0].id == "option-1"));
    assert_eq!(seen.auth.lock().unwrap().as_deref(), Some("Bearer sk-direct"));

    let body = seen.body.lock().unwrap().clone().expect("provider saw a body");
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["metadata"]["source"], "mobile-direct");
    assert_eq!(body["input"][0]["role"], "system");
    assert_eq!(body["input"][1], json!({ "role": "user", "content": "hello" }));
}
