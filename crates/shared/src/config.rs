//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Document store configuration.
    pub database: DatabaseConfig,
    /// Tenant export configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection URL.
    pub url: String,
    /// Database holding the board collections.
    #[serde(default = "default_database_name")]
    pub name: String,
    /// Deadline applied to a single aggregation round trip.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_database_name() -> String {
    "wekan".to_string()
}

fn default_query_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    /// Returns the aggregation deadline as a `Duration`.
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Tenant export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Default slug pattern used when none is given explicitly.
    #[serde(default = "default_slug_pattern")]
    pub slug_pattern: String,
}

fn default_slug_pattern() -> String {
    "^tableau-".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            slug_pattern: default_slug_pattern(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TABLEAU").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
