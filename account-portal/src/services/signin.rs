use crate::models::SignInRequest;
use crate::services::account_client::AccountApi;
use crate::services::error::ApiError;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignInError {
    #[error("Failed to sign in. Please check your access key.")]
    InvalidCredentials,

    /// Anything other than an explicit rejection of the key.
    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] ApiError),
}

impl SignInError {
    /// Text shown to the user; same as the `Display` output.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Exchanges an access key for the user id. One attempt per submission.
pub struct SignInFlow {
    api: Arc<dyn AccountApi>,
}

impl SignInFlow {
    pub fn new(api: Arc<dyn AccountApi>) -> Self {
        Self { api }
    }

    #[tracing::instrument(skip_all)]
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<i64, SignInError> {
        let outcome = self
            .api
            .login(&request.key, request.verification_token())
            .await
            .map_err(|err| match err {
                ApiError::Unauthorized => SignInError::InvalidCredentials,
                other => SignInError::Network(other),
            });

        match &outcome {
            Ok(user_id) => {
                counter!("signin_attempts_total", "outcome" => "success").increment(1);
                tracing::info!(user_id, "User signed in");
            }
            Err(SignInError::InvalidCredentials) => {
                counter!("signin_attempts_total", "outcome" => "invalid_credentials").increment(1);
                tracing::info!("Sign-in rejected");
            }
            Err(SignInError::Network(source)) => {
                counter!("signin_attempts_total", "outcome" => "network").increment(1);
                tracing::error!(error = %source, "Sign-in failed");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrganizationSummary, UserProfile};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use secrecy::{ExposeSecret, Secret};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum LoginBehaviour {
        Accept(i64),
        Reject(fn() -> ApiError),
    }

    struct LoginOnlyApi {
        behaviour: LoginBehaviour,
        attempts: AtomicUsize,
    }

    impl LoginOnlyApi {
        fn new(behaviour: LoginBehaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                attempts: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AccountApi for LoginOnlyApi {
        async fn create_organization(&self, _name: &str) -> Result<i64, ApiError> {
            unreachable!()
        }

        async fn create_user(
            &self,
            _username: &str,
            _email: &str,
            _token: Option<&str>,
        ) -> Result<i64, ApiError> {
            unreachable!()
        }

        async fn add_user_to_organization(
            &self,
            _org_id: i64,
            _user_id: i64,
            _role: &str,
        ) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn issue_access_key(&self, _org_id: i64, _user_id: i64) -> Result<(), ApiError> {
            unreachable!()
        }

        async fn login(&self, key: &Secret<String>, _token: Option<&str>) -> Result<i64, ApiError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            assert_eq!(key.expose_secret(), "key-123");
            match &self.behaviour {
                LoginBehaviour::Accept(id) => Ok(*id),
                LoginBehaviour::Reject(err) => Err(err()),
            }
        }

        async fn fetch_profile(&self, _user_id: &str) -> Result<UserProfile, ApiError> {
            unreachable!()
        }

        async fn list_user_organizations(
            &self,
            _user_id: &str,
        ) -> Result<Vec<OrganizationSummary>, ApiError> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn successful_sign_in_returns_user_id() {
        let api = LoginOnlyApi::new(LoginBehaviour::Accept(17));
        let user_id = SignInFlow::new(api.clone())
            .sign_in(&SignInRequest::new("key-123"))
            .await
            .unwrap();

        assert_eq!(user_id, 17);
        assert_eq!(api.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unauthorized_is_invalid_credentials() {
        let api = LoginOnlyApi::new(LoginBehaviour::Reject(|| ApiError::Unauthorized));
        let err = SignInFlow::new(api.clone())
            .sign_in(&SignInRequest::new("key-123"))
            .await
            .unwrap_err();

        assert!(matches!(err, SignInError::InvalidCredentials));
        assert_eq!(
            err.user_message(),
            "Failed to sign in. Please check your access key."
        );
        assert_eq!(api.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_response_is_network_error() {
        let api = LoginOnlyApi::new(LoginBehaviour::Reject(|| {
            ApiError::Network("connection refused".to_string())
        }));
        let err = SignInFlow::new(api.clone())
            .sign_in(&SignInRequest::new("key-123"))
            .await
            .unwrap_err();

        assert!(matches!(err, SignInError::Network(ApiError::Network(_))));
        assert_eq!(
            err.user_message(),
            "Network error. Please check your connection and try again."
        );
        assert_eq!(api.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_failure_is_reported_as_network_error() {
        let api = LoginOnlyApi::new(LoginBehaviour::Reject(|| ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        }));
        let err = SignInFlow::new(api)
            .sign_in(&SignInRequest::new("key-123"))
            .await
            .unwrap_err();

        assert!(matches!(err, SignInError::Network(ApiError::Server { .. })));
    }
}
