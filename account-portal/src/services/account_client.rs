use crate::config::AccountApiSettings;
use crate::models::{OrganizationSummary, UserProfile};
use crate::services::error::ApiError;
use account_core::observability::TracedRequestExt;
use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// Calls the portal makes against the account-management API.
///
/// Every call is a single round trip that either yields its value or an
/// [`ApiError`]; nothing here retries.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn create_organization(&self, name: &str) -> Result<i64, ApiError>;

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        token: Option<&str>,
    ) -> Result<i64, ApiError>;

    async fn add_user_to_organization(
        &self,
        org_id: i64,
        user_id: i64,
        role: &str,
    ) -> Result<(), ApiError>;

    async fn issue_access_key(&self, org_id: i64, user_id: i64) -> Result<(), ApiError>;

    async fn login(&self, key: &Secret<String>, token: Option<&str>) -> Result<i64, ApiError>;

    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, ApiError>;

    async fn list_user_organizations(
        &self,
        user_id: &str,
    ) -> Result<Vec<OrganizationSummary>, ApiError>;
}

#[derive(Serialize)]
struct CreateOrganizationBody<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct OrganizationCreated {
    org_id: i64,
}

#[derive(Serialize)]
struct CreateUserBody<'a> {
    username: &'a str,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

#[derive(Deserialize)]
struct UserCreated {
    user_id: i64,
}

#[derive(Serialize)]
struct AddMemberBody<'a> {
    user_id: i64,
    role: &'a str,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

#[derive(Deserialize)]
struct LoggedIn {
    user_id: i64,
}

/// reqwest-backed [`AccountApi`].
pub struct AccountClient {
    client: Client,
    settings: AccountApiSettings,
}

impl AccountClient {
    pub fn new(settings: AccountApiSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            settings,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);

        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.with_trace_context().send().await.map_err(|e| {
            tracing::error!("Failed to send POST request to {}: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        check_status(response).await
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .with_trace_context()
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                ApiError::Network(e.to_string())
            })?;

        check_status(response).await
    }
}

/// Pass 2xx responses through, classify everything else.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_status(status, &body);
    tracing::warn!(status = %status, error = %err, "Account API call rejected");
    Err(err)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl AccountApi for AccountClient {
    async fn create_organization(&self, name: &str) -> Result<i64, ApiError> {
        let response = self
            .post("/api/v1/organizations", Some(&CreateOrganizationBody { name }))
            .await?;
        Ok(decode::<OrganizationCreated>(response).await?.org_id)
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        token: Option<&str>,
    ) -> Result<i64, ApiError> {
        let body = CreateUserBody {
            username,
            email,
            token,
        };
        let response = self.post("/api/v1/users", Some(&body)).await?;
        Ok(decode::<UserCreated>(response).await?.user_id)
    }

    async fn add_user_to_organization(
        &self,
        org_id: i64,
        user_id: i64,
        role: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/api/v1/organizations/{}/users", org_id);
        self.post(&path, Some(&AddMemberBody { user_id, role }))
            .await?;
        Ok(())
    }

    async fn issue_access_key(&self, org_id: i64, user_id: i64) -> Result<(), ApiError> {
        let path = format!(
            "/api/v1/organizations/{}/user/{}/access_key",
            org_id, user_id
        );
        self.post::<()>(&path, None).await?;
        Ok(())
    }

    async fn login(&self, key: &Secret<String>, token: Option<&str>) -> Result<i64, ApiError> {
        let body = LoginBody {
            key: key.expose_secret(),
            token,
        };
        let response = self.post("/api/v1/login", Some(&body)).await?;
        Ok(decode::<LoggedIn>(response).await?.user_id)
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .get(&format!("/api/v1/users/{}/profile", user_id))
            .await?;
        decode(response).await
    }

    async fn list_user_organizations(
        &self,
        user_id: &str,
    ) -> Result<Vec<OrganizationSummary>, ApiError> {
        let response = self
            .get(&format!("/api/v1/users/{}/organizations", user_id))
            .await?;
        decode(response).await
    }
}
