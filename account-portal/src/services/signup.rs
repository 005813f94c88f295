use crate::config::{SignUpMode, SignUpSettings};
use crate::models::{ProvisioningResult, SignUpRequest, OWNER_ROLE};
use crate::services::account_client::AccountApi;
use crate::services::error::ApiError;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;

pub const SIGN_UP_SUCCESS_MESSAGE: &str =
    "Sign up successful! Check your email for the access key and sign in.";

const ORGANIZATION_FAILED_MESSAGE: &str =
    "Failed to create account. Please check the user or organization name.";
const USER_FAILED_MESSAGE: &str = "Failed to create user. Please check the email address.";

/// The provisioning step that stopped a sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpFailure {
    OrganizationCreationFailed,
    UserCreationFailed,
    MembershipFailed,
    AccessKeyIssuanceFailed,
}

impl SignUpFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignUpFailure::OrganizationCreationFailed => "organization_creation_failed",
            SignUpFailure::UserCreationFailed => "user_creation_failed",
            SignUpFailure::MembershipFailed => "membership_failed",
            SignUpFailure::AccessKeyIssuanceFailed => "access_key_issuance_failed",
        }
    }
}

/// A failed sign-up: which step failed, what to tell the user, and what had
/// already been created. Earlier steps are not undone.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SignUpError {
    pub kind: SignUpFailure,
    pub message: String,
    pub partial: ProvisioningResult,
    pub source: ApiError,
}

/// Runs account provisioning against the account API.
///
/// In [`SignUpMode::MultiStep`] the steps are organization, user, membership
/// and access key, awaited one after another. The first failure ends the run.
/// No step is retried and nothing is deduplicated: submitting the same
/// request twice provisions twice.
pub struct SignUpOrchestrator {
    api: Arc<dyn AccountApi>,
    mode: SignUpMode,
    support_contact: String,
}

impl SignUpOrchestrator {
    pub fn new(api: Arc<dyn AccountApi>, settings: &SignUpSettings) -> Self {
        Self {
            api,
            mode: settings.mode,
            support_contact: settings.support_contact.clone(),
        }
    }

    #[tracing::instrument(skip_all, fields(username = %request.username, mode = ?self.mode))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<ProvisioningResult, SignUpError> {
        let outcome = match self.mode {
            SignUpMode::MultiStep => self.provision_in_steps(request).await,
            SignUpMode::SingleCall => self.provision_in_one_call(request).await,
        };

        match &outcome {
            Ok(result) => {
                counter!("signup_attempts_total", "outcome" => "success").increment(1);
                tracing::info!(
                    org_id = ?result.org_id,
                    user_id = ?result.user_id,
                    "Sign-up completed"
                );
            }
            Err(err) => {
                counter!("signup_attempts_total", "outcome" => err.kind.as_str()).increment(1);
                tracing::warn!(
                    step = err.kind.as_str(),
                    partial = ?err.partial,
                    error = %err.source,
                    "Sign-up stopped"
                );
            }
        }

        outcome
    }

    async fn provision_in_steps(
        &self,
        request: &SignUpRequest,
    ) -> Result<ProvisioningResult, SignUpError> {
        let mut result = ProvisioningResult::default();

        let org_id = self
            .api
            .create_organization(request.organization_name())
            .await
            .map_err(|e| self.fail(SignUpFailure::OrganizationCreationFailed, &result, e))?;
        result.org_id = Some(org_id);

        // The verification token belongs to the single-call contract only.
        let user_id = self
            .api
            .create_user(&request.username, &request.email, None)
            .await
            .map_err(|e| self.fail(SignUpFailure::UserCreationFailed, &result, e))?;
        result.user_id = Some(user_id);

        self.api
            .add_user_to_organization(org_id, user_id, OWNER_ROLE)
            .await
            .map_err(|e| self.fail(SignUpFailure::MembershipFailed, &result, e))?;
        result.membership_established = true;

        self.api
            .issue_access_key(org_id, user_id)
            .await
            .map_err(|e| self.fail(SignUpFailure::AccessKeyIssuanceFailed, &result, e))?;
        result.access_key_issued = true;

        Ok(result)
    }

    /// The API creates organization, membership and key itself.
    async fn provision_in_one_call(
        &self,
        request: &SignUpRequest,
    ) -> Result<ProvisioningResult, SignUpError> {
        let user_id = self
            .api
            .create_user(&request.username, &request.email, request.verification_token())
            .await
            .map_err(|e| {
                self.fail(
                    SignUpFailure::UserCreationFailed,
                    &ProvisioningResult::default(),
                    e,
                )
            })?;

        Ok(ProvisioningResult {
            org_id: None,
            user_id: Some(user_id),
            membership_established: true,
            access_key_issued: true,
        })
    }

    fn fail(&self, kind: SignUpFailure, partial: &ProvisioningResult, source: ApiError) -> SignUpError {
        SignUpError {
            kind,
            message: self.message_for(kind, &source),
            partial: partial.clone(),
            source,
        }
    }

    fn message_for(&self, kind: SignUpFailure, source: &ApiError) -> String {
        match kind {
            SignUpFailure::OrganizationCreationFailed => ORGANIZATION_FAILED_MESSAGE.to_string(),
            SignUpFailure::UserCreationFailed => source
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| USER_FAILED_MESSAGE.to_string()),
            SignUpFailure::MembershipFailed => format!(
                "Failed to add account. Please contact {}.",
                self.support_contact
            ),
            SignUpFailure::AccessKeyIssuanceFailed => format!(
                "Failed to issue access key. Please contact {}.",
                self.support_contact
            ),
        }
    }
}
