//! Shared setup for account-portal integration tests.
//!
//! The account API is played by a wiremock server; the portal router is
//! driven in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use account_portal::config::{AccountApiSettings, SignUpSettings};
use account_portal::services::AccountClient;
use account_portal::startup::build_router;
use account_portal::AppState;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use std::sync::Arc;
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> AccountClient {
    AccountClient::new(AccountApiSettings {
        url: server.uri(),
        timeout_secs: Some(5),
    })
    .expect("Failed to build account client")
}

pub fn app_for(server: &MockServer, signup: SignUpSettings) -> Router {
    let state = AppState::new(Arc::new(client_for(server)), &signup);
    build_router(state)
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// `name=value` part of the session cookie set on a response.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
