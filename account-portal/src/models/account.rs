use secrecy::Secret;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Membership role granted to whoever signs up.
pub const OWNER_ROLE: &str = "owner";

const USERNAME_MAX_LEN: usize = 39;

/// Sign-up form submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email(message = "Invalid email provided."))]
    pub email: String,
    #[serde(rename = "org-name", default)]
    pub org_name: Option<String>,
    /// Challenge-widget verification token. Only the single-call sign-up sends it.
    #[serde(default)]
    pub token: Option<String>,
}

impl SignUpRequest {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            org_name: None,
            token: None,
        }
    }

    pub fn with_org_name(mut self, org_name: impl Into<String>) -> Self {
        self.org_name = Some(org_name.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn verification_token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }

    /// Organization to create; falls back to the username when left blank.
    pub fn organization_name(&self) -> &str {
        match self.org_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Empty form fields arrive as `Some("")`; treat them as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Account names start with an alphanumeric and continue with
/// alphanumerics or '-', up to 39 characters.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let mut chars = username.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '-');

    if first_ok && rest_ok && username.len() <= USERNAME_MAX_LEN {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message = Some("Invalid username provided.".into());
        Err(err)
    }
}

/// What provisioning managed to establish. Attached to failures too, so the
/// partial state left behind is visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisioningResult {
    pub org_id: Option<i64>,
    pub user_id: Option<i64>,
    pub membership_established: bool,
    pub access_key_issued: bool,
}

/// Sign-in form submission.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub key: Secret<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl SignInRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Secret::new(key.into()),
            token: None,
        }
    }

    pub fn verification_token(&self) -> Option<&str> {
        non_blank(self.token.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeySummary {
    pub id: i64,
    pub thumbnail: String,
    pub create_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub org_id: i64,
    pub org_name: String,
    #[serde(default)]
    pub keys: Vec<AccessKeySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_name_falls_back_to_username() {
        let request = SignUpRequest::new("alice", "alice@example.com");
        assert_eq!(request.organization_name(), "alice");

        let blank = request.clone().with_org_name("   ");
        assert_eq!(blank.organization_name(), "alice");

        let named = request.with_org_name("acme");
        assert_eq!(named.organization_name(), "acme");
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a-1").is_ok());
        assert!(validate_username(&"a".repeat(39)).is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("-alice").is_err());
        assert!(validate_username("al ice").is_err());
        assert!(validate_username("alice_smith").is_err());
        assert!(validate_username(&"a".repeat(40)).is_err());
    }

    #[test]
    fn sign_up_request_validation() {
        assert!(SignUpRequest::new("alice", "alice@example.com")
            .validate()
            .is_ok());
        assert!(SignUpRequest::new("alice", "not-an-email")
            .validate()
            .is_err());
        assert!(SignUpRequest::new("-bad", "alice@example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn sign_up_form_field_names() {
        let request: SignUpRequest = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "org-name": "acme",
        }))
        .unwrap();

        assert_eq!(request.organization_name(), "acme");
        assert_eq!(request.token, None);
    }

    #[test]
    fn blank_verification_tokens_are_absent() {
        let request = SignUpRequest::new("alice", "alice@example.com").with_token("");
        assert_eq!(request.verification_token(), None);
        let request = request.with_token("captcha");
        assert_eq!(request.verification_token(), Some("captcha"));

        let sign_in: SignInRequest =
            serde_json::from_value(serde_json::json!({ "key": "k", "token": " " })).unwrap();
        assert_eq!(sign_in.verification_token(), None);
    }

    #[test]
    fn access_key_is_redacted_in_debug_output() {
        let request = SignInRequest::new("super-secret-key");
        assert!(!format!("{:?}", request).contains("super-secret-key"));
    }
}
