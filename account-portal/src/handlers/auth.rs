use crate::models::{SignInRequest, SignUpRequest};
use crate::services::{AuthSession, SignInError, SIGN_UP_SUCCESS_MESSAGE};
use crate::AppState;
use account_core::error::AppError;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use validator::Validate;

const HX_REDIRECT: &str = "HX-Redirect";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SignedInResponse {
    pub user_id: String,
}

fn redirect_headers(location: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(HX_REDIRECT, HeaderValue::from_static(location));
    headers
}

pub async fn signup_handler(
    State(state): State<AppState>,
    Form(payload): Form<SignUpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .signup
        .sign_up(&payload)
        .await
        .map_err(|e| AppError::Unprocessable(e.message))?;

    Ok(Json(MessageResponse {
        message: SIGN_UP_SUCCESS_MESSAGE,
    }))
}

pub async fn login_handler(
    State(state): State<AppState>,
    session: AuthSession,
    Form(payload): Form<SignInRequest>,
) -> Result<Response, AppError> {
    let user_id = state
        .signin
        .sign_in(&payload)
        .await
        .map_err(|e| match e {
            SignInError::InvalidCredentials => AppError::Unauthorized(e.user_message()),
            SignInError::Network(_) => AppError::BadGateway(e.user_message()),
        })?;

    session.sign_in(user_id).await?;

    // HTMX redirect to the profile page
    Ok((
        StatusCode::OK,
        redirect_headers("/profile"),
        Json(SignedInResponse {
            user_id: user_id.to_string(),
        }),
    )
        .into_response())
}

pub async fn logout_handler(session: AuthSession) -> impl IntoResponse {
    session.sign_out().await;
    tracing::info!("User signed out");

    (StatusCode::OK, redirect_headers("/"), "")
}
