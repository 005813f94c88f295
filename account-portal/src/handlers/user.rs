use crate::models::{AuthUser, OrganizationSummary};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub organizations: Vec<OrganizationSummary>,
}

pub async fn profile_handler(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Json<ProfileView> {
    let (profile, organizations) = tokio::join!(
        state.account_api.fetch_profile(&auth_user.user_id),
        state.account_api.list_user_organizations(&auth_user.user_id),
    );

    // If the account API is unavailable we still show what the session knows.
    let (username, email) = match profile {
        Ok(profile) => (Some(profile.username), Some(profile.email)),
        Err(e) => {
            tracing::warn!(user_id = %auth_user.user_id, error = %e, "Failed to fetch profile");
            (None, None)
        }
    };

    let organizations = organizations.unwrap_or_else(|e| {
        tracing::warn!(user_id = %auth_user.user_id, error = %e, "Failed to list organizations");
        Vec::new()
    });

    Json(ProfileView {
        user_id: auth_user.user_id,
        username,
        email,
        organizations,
    })
}
