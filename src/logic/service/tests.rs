use super::*;
use crate::logic::normalize::{normalize, Decision};
use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

async fn spawn_service(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(server_url: String) -> HttpAnalysisClient {
    HttpAnalysisClient::new(ServiceConfig {
        server_url,
        timeout_seconds: 5,
    })
    .unwrap()
}

async fn analyze_ok(headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let body = String::from_utf8_lossy(&body);

    if !content_type.starts_with("multipart/form-data") || !body.contains("filename=\"a.pdf\"") {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "No file uploaded"})));
    }

    (
        StatusCode::OK,
        Json(json!({
            "file": "data/uploads/a.pdf",
            "scores": {
                "ai_score": 0.82,
                "plagiarism_score": 0.10,
                "final": {"final_probability": 0.6, "decision": "Reject - likely AI"}
            },
            "matches": ["para 3"]
        })),
    )
}

async fn echo_chat(Json(body): Json<Value>) -> Json<Value> {
    let with_context = body["analysis_context"]["fileName"].as_str().unwrap_or("none");
    Json(json!({
        "message": format!("{} / {}", body["message"].as_str().unwrap_or_default(), with_context)
    }))
}

#[tokio::test]
async fn test_analyze_returns_raw_payload() {
    let url = spawn_service(Router::new().route("/analyze", post(analyze_ok))).await;
    let client = client_for(url);

    let raw = client
        .analyze(&UploadFile::new("a.pdf", b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    let result = normalize(&raw);
    assert_eq!(result.file_name, "a.pdf");
    assert_eq!(result.decision, Decision::Reject);
}

#[tokio::test]
async fn test_service_error_detail_passed_through() {
    let app = Router::new().route(
        "/analyze",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": "unsupported file type"})),
            )
        }),
    );
    let client = client_for(spawn_service(app).await);

    let err = client
        .analyze(&UploadFile::new("x.exe", vec![0u8; 4]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ServiceError::Service {
            status: 422,
            detail: "unsupported file type".to_string()
        }
    );
    assert_eq!(err.user_message(), "Error: unsupported file type");
}

#[tokio::test]
async fn test_error_without_detail() {
    let app = Router::new().route(
        "/analyze",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
    );
    let client = client_for(spawn_service(app).await);

    let err = client
        .analyze(&UploadFile::new("a.pdf", vec![1]))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Error: Unknown error");
}

#[tokio::test]
async fn test_non_json_bodies_are_malformed() {
    let app = Router::new()
        .route(
            "/analyze",
            post(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
        )
        .route("/chat/greeting", get(|| async { "hello in plain text" }));
    let client = client_for(spawn_service(app).await);

    let err = client
        .analyze(&UploadFile::new("a.pdf", vec![1]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Parse(_)));
    assert!(err.is_transport());

    let err = client.greeting().await.unwrap_err();
    assert!(matches!(err, ServiceError::Parse(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(format!("http://{}", addr));
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ServiceError::Network(_)));
    assert!(err.user_message().starts_with("Network Error: "));
}

#[tokio::test]
async fn test_feedback_chat_greeting_health() {
    let app = Router::new()
        .route(
            "/feedback",
            post(|Json(body): Json<Value>| async move {
                let verdict = if body["is_accurate"].as_bool() == Some(true) { "accurate" } else { "inaccurate" };
                Json(json!({
                    "status": "received",
                    "message": format!("{} marked {}", body["filename"].as_str().unwrap_or_default(), verdict)
                }))
            }),
        )
        .route("/chat", post(echo_chat))
        .route(
            "/chat/greeting",
            get(|| async { Json(json!({"message": "Hello! I'm your Detection Assistant."})) }),
        )
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }));
    let client = client_for(spawn_service(app).await);

    assert_eq!(
        client.feedback("a.pdf", true).await.unwrap(),
        "a.pdf marked accurate"
    );

    let context = normalize(&json!({"file": "uploads/ctx.pdf"}));
    assert_eq!(
        client.chat("why?", Some(&context)).await.unwrap(),
        "why? / ctx.pdf"
    );
    assert_eq!(client.chat("hi", None).await.unwrap(), "hi / none");

    assert_eq!(
        client.greeting().await.unwrap(),
        "Hello! I'm your Detection Assistant."
    );
    assert_eq!(client.health().await.unwrap().status, "ok");
}
