//! GroqClient against local stand-ins for the chat completions endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use groqchat::{ChatClient, ChatModel, Conversation, DomainError, GroqClient, Message, Role};

const COMPLETIONS: &str = "/v1/chat/completions";

#[derive(Clone, Default)]
struct Seen {
    request: Arc<Mutex<Option<(HeaderMap, Value)>>>,
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    format!("http://{addr}")
}

fn conversation() -> Conversation {
    let mut conversation = Conversation::new();
    conversation.append(Role::User, "hi");
    conversation
}

fn client(base_url: &str) -> GroqClient {
    GroqClient::new(base_url, Duration::from_secs(5)).expect("client")
}

async fn record_and_reply(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    *seen.request.lock().await = Some((headers, body));
    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
        ]
    }))
}

#[tokio::test]
async fn test_success_returns_first_choice_content() {
    let seen = Seen::default();
    let router = Router::new()
        .route(COMPLETIONS, post(record_and_reply))
        .with_state(seen.clone());
    let base = spawn(router).await;

    let reply = client(&base)
        .complete(
            conversation().messages(),
            ChatModel::Llama3_8b8192,
            "gsk_test",
        )
        .await
        .expect("completion should succeed");
    assert_eq!(reply, "hello");

    let (headers, body) = seen.request.lock().await.clone().expect("request recorded");
    assert_eq!(
        headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer gsk_test")
    );
    assert!(headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("application/json"));
    assert_eq!(
        body,
        json!({
            "model": "llama3-8b-8192",
            "messages": [
                {"role": "system", "content": "You are a helpful AI assistant."},
                {"role": "user", "content": "hi"}
            ]
        })
    );
}

#[tokio::test]
async fn test_non_200_carries_status_and_body() {
    let router = Router::new().route(
        COMPLETIONS,
        post(|| async { (StatusCode::UNAUTHORIZED, "unauthorized") }),
    );
    let base = spawn(router).await;

    let err = client(&base)
        .complete(conversation().messages(), ChatModel::Gemma7b, "bad")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    let text = err.detail().transcript_text();
    assert!(text.contains("401"));
    assert!(text.contains("unauthorized"));
}

#[tokio::test]
async fn test_other_success_statuses_are_errors_too() {
    let router = Router::new().route(
        COMPLETIONS,
        post(|| async {
            (
                StatusCode::ACCEPTED,
                Json(json!({"choices": [{"message": {"content": "queued"}}]})),
            )
                .into_response()
        }),
    );
    let base = spawn(router).await;

    let err = client(&base)
        .complete(conversation().messages(), ChatModel::default(), "k")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(202));
}

#[tokio::test]
async fn test_missing_choices_is_malformed_not_status_error() {
    let router = Router::new().route(COMPLETIONS, post(|| async { Json(json!({"choices": []})) }));
    let base = spawn(router).await;

    let err = client(&base)
        .complete(conversation().messages(), ChatModel::default(), "k")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::MalformedResponse(_)));
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_refused_connection_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = client(&format!("http://{addr}"))
        .complete(conversation().messages(), ChatModel::default(), "k")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Transport(_)));
    let detail = err.detail();
    assert_eq!(detail.status_code(), None);
    assert!(detail.transcript_text().starts_with("Error: transport failure"));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let router = Router::new().route(
        COMPLETIONS,
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": [{"message": {"content": "late"}}]}))
        }),
    );
    let base = spawn(router).await;

    let err = GroqClient::new(&base, Duration::from_secs(1))
        .expect("client")
        .complete(conversation().messages(), ChatModel::default(), "k")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Transport(_)));
    assert!(err.to_string().contains("timed out after 1s"));
}

#[tokio::test]
async fn test_empty_conversation_is_rejected_before_sending() {
    let messages: Vec<Message> = Vec::new();
    let err = client("http://127.0.0.1:9")
        .complete(&messages, ChatModel::default(), "k")
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
}
