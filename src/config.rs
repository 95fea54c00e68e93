use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::client::DEFAULT_BASE_URL;

/// What happens when a fetch is issued while another is still pending
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Cancel pending fetches; only the newest may update the display
    #[default]
    Supersede,
    /// Let fetches overlap; whichever completes last is displayed
    LastWriteWins,
}

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Root of the meal API, e.g. `https://www.themealdb.com/api/json/v1/1/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub overlap: OverlapPolicy,
    /// Hide the shown recipe while the query does not match its name
    #[serde(default)]
    pub live_filter: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            overlap: OverlapPolicy::default(),
            live_filter: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("recipe-finder/{}", env!("CARGO_PKG_VERSION"))
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with RECIPE_FINDER__ prefix
/// 2. recipe-finder.toml file in current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_FINDER__BASE_URL
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("recipe-finder").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
