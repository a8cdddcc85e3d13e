//! `AnthropicVision` against a local stub of the Messages API.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use papaji::config::Config;
use papaji::data_url::ImagePayload;
use papaji::vision::{AnthropicVision, VisionError, VisionModel, API_VERSION};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    captured: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn messages(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    stub.captured.lock().unwrap().push((headers, body));
    (stub.status, Json(stub.reply.clone()))
}

/// Spawns the stub on a random port and returns its base URL.
async fn spawn_stub(stub: Stub) -> String {
    let app = Router::new()
        .route("/v1/messages", post(messages))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}

fn client(base_url: &str, api_key: Option<&str>) -> AnthropicVision {
    let mut pairs = vec![("ANTHROPIC_BASE_URL", base_url)];
    if let Some(key) = api_key {
        pairs.push(("ANTHROPIC_API_KEY", key));
    }
    AnthropicVision::new(&Config::from_pairs(&pairs).unwrap())
}

fn png() -> ImagePayload {
    ImagePayload::from_data_url("data:image/png;base64,iVBORw0KGgo=")
}

#[tokio::test]
async fn sends_one_image_and_one_instruction() {
    let stub = Stub {
        status: StatusCode::OK,
        reply: json!({
            "id": "msg_1",
            "type": "message",
            "content": [{"type": "text", "text": "{\"problem\":\"crack\"}"}]
        }),
        captured: Arc::default(),
    };
    let base_url = spawn_stub(stub.clone()).await;

    let text = client(&base_url, Some("sk-test"))
        .describe(&png(), "diagnose this")
        .await
        .unwrap();

    assert_eq!(text, "{\"problem\":\"crack\"}");

    let captured = stub.captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let (headers, body) = &captured[0];

    assert_eq!(headers["x-api-key"], "sk-test");
    assert_eq!(headers["anthropic-version"], API_VERSION);
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["max_tokens"], 2000);

    let content = body["messages"][0]["content"].as_array().unwrap();
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(content.len(), 2);
    assert_eq!(
        content[0],
        json!({"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "iVBORw0KGgo="}})
    );
    assert_eq!(content[1], json!({"type": "text", "text": "diagnose this"}));
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let stub = Stub {
        status: StatusCode::TOO_MANY_REQUESTS,
        reply: json!({"type": "error", "error": {"type": "rate_limit_error", "message": "slow down"}}),
        captured: Arc::default(),
    };
    let base_url = spawn_stub(stub).await;

    let err = client(&base_url, Some("sk-test"))
        .describe(&png(), "diagnose this")
        .await
        .unwrap_err();

    match err {
        VisionError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("rate_limit_error"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_content_reads_as_empty_text() {
    let stub = Stub {
        status: StatusCode::OK,
        reply: json!({"content": []}),
        captured: Arc::default(),
    };
    let base_url = spawn_stub(stub).await;

    let text = client(&base_url, Some("sk-test"))
        .describe(&png(), "diagnose this")
        .await
        .unwrap();

    assert_eq!(text, "");
}

#[tokio::test]
async fn missing_key_never_reaches_the_network() {
    let stub = Stub {
        status: StatusCode::OK,
        reply: json!({"content": []}),
        captured: Arc::default(),
    };
    let base_url = spawn_stub(stub.clone()).await;

    let err = client(&base_url, None)
        .describe(&png(), "diagnose this")
        .await
        .unwrap_err();

    assert!(matches!(err, VisionError::MissingApiKey));
    assert!(stub.captured.lock().unwrap().is_empty());
}
