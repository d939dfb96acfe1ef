//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::view::ViewSettings;

#[derive(Clone, Debug, Deserialize)]
/// Server configuration shared across handlers.
pub struct ServerConfig {
    /// Cookie domain; cookies are host-only when unset.
    #[serde(default)]
    pub domain: Option<String>,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Signs session cookies and access tokens. At least 64 bytes.
    pub secret: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
    pub posts_url: String,
    pub members_url: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    pub posts_view: ViewSettings,
    pub members_view: ViewSettings,
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

/// Loads `config/default.yaml`, the optional `config/{APP_ENV}.yaml` profile
/// and `APP_*` environment overrides.
pub fn load_server_config() -> Result<ServerConfig, config::ConfigError> {
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize::<ServerConfig>()
}
