//! Integration tests for the chat endpoint: decode tolerance, validation
//! errors, the streamed response contract, and the debug path.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{StubBehavior, StubInference, test_app};

const CHUNKS: [&str; 3] = [
    "{\"response\":\"A\"}\n",
    "{\"response\":\"B\"}\n",
    "{\"response\":\"C\"}\n",
];

fn chat_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn plain_json_streams_chunks_then_metadata_line() {
    let stub = StubInference::new(StubBehavior::Chunks(CHUNKS.to_vec()));
    let app = test_app(stub.clone()).await;

    let body = serde_json::json!({
        "messages": [{ "role": "user", "content": "hi" }],
        "model": "llama-3.1-8b",
        "maxTokens": 999_999
    });
    let response = app
        .oneshot(chat_request(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/x-ndjson"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = std::str::from_utf8(&bytes).unwrap();

    // Upstream chunks verbatim, in order, before the trailer.
    assert!(text.starts_with(&CHUNKS.concat()));

    let trailer = text.lines().last().unwrap();
    let meta: serde_json::Value = serde_json::from_str(trailer).unwrap();
    assert_eq!(meta["meta"]["modelKey"], "llama-3.1-8b");
    assert_eq!(meta["meta"]["modelId"], "@cf/meta/llama-3.1-8b-instruct");
    // 999_999 clamped to the model's ceiling.
    assert_eq!(meta["meta"]["params"]["max_tokens"], 2048);

    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn dispatch_body_carries_system_message_and_stream_flag() {
    let stub = StubInference::new(StubBehavior::Chunks(vec!["{}\n"]));
    let app = test_app(stub.clone()).await;

    let body = serde_json::json!({
        "messages": [{ "role": "user", "content": "hi" }],
        "model": "mistral-7b"
    });
    let response = app
        .oneshot(chat_request(body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.into_body().collect().await.unwrap();

    assert_eq!(
        stub.last_model_id.lock().unwrap().as_deref(),
        Some("@cf/mistral/mistral-7b-instruct-v0.2")
    );
    let dispatched = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(dispatched["stream"], true);
    assert_eq!(dispatched["messages"][0]["role"], "system");
    assert_eq!(dispatched["messages"][1]["content"], "hi");
}

#[tokio::test]
async fn form_wrapped_body_decodes_like_plain_json() {
    let stub = StubInference::new(StubBehavior::Chunks(vec!["{}\n"]));
    let app = test_app(stub.clone()).await;

    let inner = serde_json::json!({
        "messages": [{ "role": "user", "content": "wrapped" }],
        "model": "llama-3.1-8b"
    });
    let form = format!("payload={}", urlencoding::encode(&inner.to_string()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn base64_body_with_encoding_header_decodes() {
    use base64::Engine;

    let stub = StubInference::new(StubBehavior::Chunks(vec!["{}\n"]));
    let app = test_app(stub.clone()).await;

    let inner = serde_json::json!({
        "messages": [{ "role": "user", "content": "smuggled" }],
        "model": "llama-3.1-8b"
    });
    let encoded = base64::engine::general_purpose::STANDARD.encode(inner.to_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "text/plain")
        .header("x-payload-encoding", "base64")
        .body(Body::from(encoded))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn unknown_model_rejected_with_400_naming_it() {
    let stub = StubInference::new(StubBehavior::Chunks(vec![]));
    let app = test_app(stub.clone()).await;

    let body = serde_json::json!({
        "messages": [],
        "model": "unknown-model-xyz"
    });
    let response = app
        .oneshot(chat_request(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["type"], "UNKNOWN_MODEL");
    assert!(
        error["error"]
            .as_str()
            .unwrap()
            .contains("unknown-model-xyz")
    );
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn garbled_body_gets_400_with_capped_preview_and_no_attempts() {
    let stub = StubInference::new(StubBehavior::Chunks(vec![]));
    let app = test_app(stub.clone()).await;

    let garbage = "@@@not json at all@@@".repeat(40);
    let response = app.oneshot(chat_request(garbage)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["type"], "DECODE_FAILED");

    let preview = error["metadata"]["bodyPreview"].as_str().unwrap();
    assert_eq!(preview.chars().count(), 160);
    // Attempt log only travels under the debug header.
    assert!(error["metadata"].get("attempts").is_none());
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn debug_header_returns_decode_report_without_dispatching() {
    let stub = StubInference::new(StubBehavior::Chunks(CHUNKS.to_vec()));
    let app = test_app(stub.clone()).await;

    let body = serde_json::json!({
        "messages": [{ "role": "user", "content": "hi" }],
        "model": "llama-3.1-8b"
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-chatrelay-debug", "1")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["strategy"], "direct-json");
    assert_eq!(report["parsed"]["model"], "llama-3.1-8b");
    assert!(report["attempts"].is_array());

    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn debug_header_attaches_attempt_log_on_decode_failure() {
    let stub = StubInference::new(StubBehavior::Chunks(vec![]));
    let app = test_app(stub.clone()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-chatrelay-debug", "1")
        .body(Body::from("@@@not json at all@@@"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let attempts = error["metadata"]["attempts"].as_array().unwrap();
    assert!(!attempts.is_empty());
    assert!(attempts[0]["label"].is_string());
}

#[tokio::test]
async fn provider_call_failure_maps_to_500() {
    let stub = StubInference::new(StubBehavior::FailCall);
    let app = test_app(stub.clone()).await;

    let body = serde_json::json!({
        "messages": [{ "role": "user", "content": "hi" }],
        "model": "llama-3.1-8b"
    });
    let response = app
        .oneshot(chat_request(body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(stub.call_count(), 1);
}

#[tokio::test]
async fn mid_stream_failure_truncates_body_without_metadata() {
    let stub = StubInference::new(StubBehavior::FailAfter(vec!["{\"response\":\"A\"}\n"]));
    let app = test_app(stub.clone()).await;

    let body = serde_json::json!({
        "messages": [{ "role": "user", "content": "hi" }],
        "model": "llama-3.1-8b"
    });
    let response = app
        .oneshot(chat_request(body.to_string()))
        .await
        .unwrap();

    // Headers were already sent; the failure surfaces as a broken body.
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.into_body().collect().await.is_err());
}
