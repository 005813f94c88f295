use crate::AppState;
use account_core::error::AppError;
use axum::extract::State;

pub async fn metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Metrics recorder not installed")))
}
