use account_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::handlers::{
    app::health_check,
    auth::{login_handler, logout_handler, signup_handler},
    metrics::metrics,
    user::profile_handler,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/logout", get(logout_handler).post(logout_handler))
        .route("/profile", get(profile_handler))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the trace span sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
