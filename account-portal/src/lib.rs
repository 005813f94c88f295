pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use config::SignUpSettings;
use metrics_exporter_prometheus::PrometheusHandle;
use services::{AccountApi, SignInFlow, SignUpOrchestrator};
use std::sync::Arc;

/// Shared application state: the account API and the flows built on it.
#[derive(Clone)]
pub struct AppState {
    pub account_api: Arc<dyn AccountApi>,
    pub signup: Arc<SignUpOrchestrator>,
    pub signin: Arc<SignInFlow>,
    /// Present when a Prometheus recorder was installed for this process.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(account_api: Arc<dyn AccountApi>, signup_settings: &SignUpSettings) -> Self {
        Self {
            signup: Arc::new(SignUpOrchestrator::new(account_api.clone(), signup_settings)),
            signin: Arc::new(SignInFlow::new(account_api.clone())),
            account_api,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
