use serde::Deserialize;

/// Remote API configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Site root; resource and internal-api paths are joined onto it.
    /// Default: "https://kenkoooo.com/atcoder".
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Default: 30.
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://kenkoooo.com/atcoder".into()
}
fn default_api_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

/// Session credentials for the internal API.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Session token sent as the `token` cookie. Unset means anonymous.
    #[serde(default)]
    pub token: Option<String>,
}
