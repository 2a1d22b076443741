#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::path::{Path, PathBuf};
use serde_json::{json, Value};
use server::routes;
use server::ServerState;
use tower::ServiceExt;
use uuid::Uuid;

pub fn app() -> Router {
    app_with_media().0
}

/// Router plus the temporary media root its uploads land in.
pub fn app_with_media() -> (Router, PathBuf) {
    let auth = configs::AuthConfig { jwt_secret: "test-secret".into(), ..Default::default() };
    let root = std::env::temp_dir().join(format!("hall-test-media-{}", Uuid::new_v4().simple()));
    let media = configs::MediaConfig { root: root.to_string_lossy().into_owned(), ..Default::default() };
    let state = ServerState::in_memory(&auth, &media);
    (routes::build_router(state, tower_http::cors::CorsLayer::very_permissive()), root)
}

/// Files currently stored under `<root>/profile_photos`.
pub fn stored_photos(root: &Path) -> usize {
    std::fs::read_dir(root.join("profile_photos")).map(|dir| dir.count()).unwrap_or(0)
}

/// Multipart request with text fields and an optional `photo` file part.
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    photo: Option<(&str, &[u8])>,
) -> anyhow::Result<Request<Body>> {
    let boundary = "hallboundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = photo {
        body.extend_from_slice(
            format!("--{boundary}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))?)
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<Reply> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok(Reply { status, headers, body })
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    Ok(builder.body(Body::from(serde_json::to_vec(&body)?))?)
}

pub fn get(uri: &str, token: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    Ok(builder.body(Body::empty())?)
}

/// Register an account and return `(access, refresh)`.
pub async fn register(app: &Router, email: &str, role: &str) -> anyhow::Result<(String, String)> {
    let body = json!({"email": email, "password": "Passw0rd", "full_name": "Test User", "role": role});
    let reply = send(app, json_request("POST", "/auth/register", None, body)?).await?;
    assert_eq!(reply.status, StatusCode::CREATED, "register failed: {}", reply.body);
    let access = reply.body["access"].as_str().unwrap_or_default().to_string();
    let refresh = reply.body["refresh"].as_str().unwrap_or_default().to_string();
    Ok((access, refresh))
}
