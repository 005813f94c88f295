use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub account_api: AccountApiSettings,
    #[serde(default)]
    pub signup: SignUpSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AccountApiSettings {
    /// Base URL of the account-management API, without a trailing slash.
    pub url: String,
    /// Overall request timeout. Unset leaves reqwest's default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Which provisioning workflow sign-up runs.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignUpMode {
    /// Organization, user, membership and access key as four calls.
    #[default]
    MultiStep,
    /// One create-user call; the API provisions the rest itself.
    SingleCall,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SignUpSettings {
    #[serde(default)]
    pub mode: SignUpMode,
    /// Contact shown when provisioning fails after the account exists.
    #[serde(default = "default_support_contact")]
    pub support_contact: String,
}

impl Default for SignUpSettings {
    fn default() -> Self {
        Self {
            mode: SignUpMode::default(),
            support_contact: default_support_contact(),
        }
    }
}

fn default_support_contact() -> String {
    "hello@devchat.ai".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint (e.g. http://tempo:4317). Spans are not exported when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Cannot read current directory: {}", e)))?;

    // Running from the workspace root or from inside the crate both work.
    let configuration_directory = if base_path.ends_with("account-portal") {
        base_path.join("config")
    } else {
        base_path.join("account-portal").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
