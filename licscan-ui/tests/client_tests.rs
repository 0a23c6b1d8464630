//! HTTP client integration tests
//!
//! [`HttpBackend`] talks to a fake authentication/analysis service served
//! by axum on an ephemeral loopback port.

use axum::{
    body::{Body, Bytes},
    extract::{Form, Multipart},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures::StreamExt;
use licscan_common::CandidateFile;
use licscan_ui::client::{Backend, Credentials, HttpBackend, ServiceEndpoints};
use licscan_ui::error::ClientError;
use licscan_ui::session::SessionStore;
use serde_json::{json, Value};
use std::collections::HashMap;

async fn issue_token(Form(params): Form<HashMap<String, String>>) -> Response {
    let valid = params.get("username").map(String::as_str) == Some("abcd")
        && params.get("password").map(String::as_str) == Some("password123");
    if valid {
        Json(json!({ "access_token": "tok-1", "token_type": "bearer" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "Incorrect username or password").into_response()
    }
}

async fn create_user(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return (StatusCode::BAD_REQUEST, "Username already registered").into_response();
    }
    Json(json!({ "id": 7, "username": body["username"] })).into_response()
}

async fn generate_report(headers: HeaderMap, mut multipart: Multipart) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer tok-1");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
    }
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut project_name = String::new();
    let mut file_line = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name() {
            Some("project_name") => project_name = field.text().await.unwrap(),
            Some("requirements_file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let size = field.bytes().await.unwrap().len();
                file_line = format!("{} {} {}", name, mime, size);
            }
            _ => {}
        }
    }

    match project_name.as_str() {
        "empty" => {
            return (StatusCode::BAD_REQUEST, "requirements file is empty").into_response();
        }
        "crash" => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => {}
    }

    // "café" is split across chunks in the middle of the two-byte "é"
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from(format!("## Report for {}\n", project_name))),
        Ok(Bytes::from(format!("{}\naccept {}\n", file_line, accept))),
        Ok(Bytes::from_static(b"caf\xC3")),
        Ok(Bytes::from_static(b"\xA9\n")),
    ];

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(futures::stream::iter(chunks)),
    )
        .into_response()
}

/// Serve the fake services; returns the base URL
async fn spawn_fake_services() -> String {
    let app = Router::new()
        .route("/users/token", post(issue_token))
        .route("/users", post(create_user))
        .route("/generate/report", post(generate_report));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn backend_with(session: SessionStore) -> HttpBackend {
    let base = spawn_fake_services().await;
    // Trailing slash on one of them on purpose
    let endpoints = ServiceEndpoints::new(format!("{}/", base), base);
    HttpBackend::new(endpoints, session).unwrap()
}

fn manifest() -> CandidateFile {
    CandidateFile::new("requirements.txt", "text/plain", b"flask==3.0.0\n".to_vec())
}

async fn collect(backend: &HttpBackend, project_name: &str) -> Result<String, ClientError> {
    let mut stream = backend.stream_analysis(project_name, &manifest()).await?;
    let mut transcript = String::new();
    while let Some(fragment) = stream.next().await {
        transcript.push_str(&fragment?);
    }
    Ok(transcript)
}

#[tokio::test]
async fn test_authenticate_returns_access_token() {
    let backend = backend_with(SessionStore::in_memory()).await;

    let token = backend
        .authenticate(&Credentials::new("abcd", "password123"))
        .await
        .unwrap();

    assert_eq!(token, "tok-1");
}

#[tokio::test]
async fn test_authenticate_rejection_is_generic() {
    let backend = backend_with(SessionStore::in_memory()).await;

    let err = backend
        .authenticate(&Credentials::new("abcd", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::AuthenticationFailed));
}

#[tokio::test]
async fn test_register_returns_confirmation() {
    let backend = backend_with(SessionStore::in_memory()).await;

    let confirmation = backend
        .register(&Credentials::new("newuser", "password123"))
        .await
        .unwrap();
    assert_eq!(confirmation["username"], "newuser");

    let err = backend
        .register(&Credentials::new("taken", "password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RegistrationFailed));
}

#[tokio::test]
async fn test_stream_analysis_delivers_report() {
    let session = SessionStore::in_memory();
    session.login("tok-1").unwrap();
    let backend = backend_with(session).await;

    let transcript = collect(&backend, "demo").await.unwrap();

    assert_eq!(
        transcript,
        "## Report for demo\nrequirements.txt text/plain 13\naccept text/plain\ncafé\n"
    );
}

#[tokio::test]
async fn test_stream_analysis_error_carries_server_text() {
    let session = SessionStore::in_memory();
    session.login("tok-1").unwrap();
    let backend = backend_with(session).await;

    match collect(&backend, "empty").await {
        Err(ClientError::RequestFailed { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "requirements file is empty");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }

    match collect(&backend, "crash").await {
        Err(err @ ClientError::RequestFailed { status: 500, .. }) => {
            assert!(err.to_string().contains("500"));
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stale_token_surfaces_as_request_failure() {
    let session = SessionStore::in_memory();
    session.login("revoked").unwrap();
    let backend = backend_with(session).await;

    let err = collect(&backend, "demo").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid token");
}
