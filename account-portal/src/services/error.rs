use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Outcome of a single call to the account API that did not succeed.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connect failure, timeout, reset).
    #[error("Network issue: {0}")]
    Network(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Client-side issue: {status}")]
    Client {
        status: StatusCode,
        detail: Option<String>,
    },

    #[error("Server internal issue: {status}")]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A 2xx response whose body did not carry what the call promised.
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// Classify a non-success response. `body` is the raw response text.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = parse_detail(body);

        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized
        } else if status.is_server_error() {
            ApiError::Server { status, detail }
        } else {
            ApiError::Client { status, detail }
        }
    }

    /// Server-supplied explanation, when the API sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Client { detail, .. } | ApiError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Pull a message string out of an error body. Other `detail` shapes, such
/// as validation lists, are not messages and are only logged.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => {
            tracing::debug!(detail = %other, "Account API sent a structured error detail");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_its_own_kind() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"detail":"bad key"}"#);
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn server_and_client_errors_are_split_by_status() {
        let server = ApiError::from_status(StatusCode::BAD_GATEWAY, "");
        assert!(matches!(server, ApiError::Server { status, .. } if status == StatusCode::BAD_GATEWAY));

        let client = ApiError::from_status(StatusCode::CONFLICT, "");
        assert!(matches!(client, ApiError::Client { status, .. } if status == StatusCode::CONFLICT));
    }

    #[test]
    fn string_detail_is_extracted() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":"Username already exists."}"#,
        );
        assert_eq!(err.detail(), Some("Username already exists."));
    }

    #[test]
    fn structured_detail_is_not_a_message() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error.email"}]}"#,
        );
        assert!(matches!(err, ApiError::Client { .. }));
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn missing_or_unparseable_detail() {
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, "oops").detail(), None);
        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, "{}").detail(), None);
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"detail":""}"#).detail(),
            None
        );
    }
}
