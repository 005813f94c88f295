use crate::services::AuthSession;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

pub const ACCESS_DENIED_MESSAGE: &str = "You don't have access to this page.";

const REFRESH: HeaderName = HeaderName::from_static("refresh");

/// Signed-in user, extracted from the session.
///
/// Requests without a session user id are refused with 403 and sent back to
/// the landing page after two seconds.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match session.user_id().await {
            Ok(Some(user_id)) => Ok(AuthUser { user_id }),
            Ok(None) => Err((
                StatusCode::FORBIDDEN,
                [(REFRESH, HeaderValue::from_static("2; url=/"))],
                ACCESS_DENIED_MESSAGE,
            )
                .into_response()),
            Err(e) => {
                tracing::error!("Failed to read session: {}", e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Failed to read session").into_response())
            }
        }
    }
}
