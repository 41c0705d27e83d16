use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{ApiConfig, AuthConfig};

/// CLI application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CliAppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl CliAppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("BACHA_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("api.base_url", "https://kenkoooo.com/atcoder")?
            .set_default("api.timeout_secs", 30_i64)?
            .add_source(File::with_name(&config_path).required(false))
            // e.g. BACHA__AUTH__TOKEN
            .add_source(Environment::with_prefix("BACHA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
