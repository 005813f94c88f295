use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tower_sessions::Session;

/// Session key holding the signed-in user's id.
pub const USER_ID_KEY: &str = "user_id";

/// The signed-in identity, backed by the request's `tower-sessions` session.
///
/// Created on successful sign-in, cleared on sign-out, read when a protected
/// page is entered.
#[derive(Clone, Debug)]
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Rotates the session id before storing the user, so an id handed out
    /// before sign-in cannot be reused afterwards.
    pub async fn sign_in(&self, user_id: i64) -> anyhow::Result<()> {
        self.session.cycle_id().await?;
        self.session
            .insert(USER_ID_KEY, user_id.to_string())
            .await?;
        Ok(())
    }

    pub async fn user_id(&self) -> anyhow::Result<Option<String>> {
        Ok(self.session.get::<String>(USER_ID_KEY).await?)
    }

    pub async fn sign_out(&self) {
        self.session.clear().await;
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}
