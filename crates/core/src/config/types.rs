use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote driver API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the driver list endpoint, relative to `base_url`.
    #[serde(default = "default_list_path")]
    pub list_path: String,
    /// Path of the detail endpoint; the driver id is appended as a segment.
    #[serde(default = "default_details_path")]
    pub details_path: String,
    /// Static partner identifier sent as `partnerId` on detail lookups.
    #[serde(default = "default_partner_id")]
    pub partner_id: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_path: default_list_path(),
            details_path: default_details_path(),
            partner_id: default_partner_id(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://test.baas.batterypool.com/driver/api/".to_string()
}

fn default_list_path() -> String {
    "drivers/getListOfDriverIds".to_string()
}

fn default_details_path() -> String {
    "getDriverDetailsProxy".to_string()
}

fn default_partner_id() -> String {
    "tp4_id".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Batching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Number of driver ids per window.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Maximum detail requests in flight within one window.
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    /// Pause between windows in milliseconds.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl BatchConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            worker_pool_size: default_worker_pool_size(),
            pause_ms: default_pause_ms(),
        }
    }
}

fn default_window_size() -> usize {
    4
}

fn default_worker_pool_size() -> usize {
    4
}

fn default_pause_ms() -> u64 {
    1000
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(
            config.api.base_url,
            "https://test.baas.batterypool.com/driver/api/"
        );
        assert_eq!(config.api.list_path, "drivers/getListOfDriverIds");
        assert_eq!(config.api.details_path, "getDriverDetailsProxy");
        assert_eq!(config.api.partner_id, "tp4_id");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.batch.window_size, 4);
        assert_eq!(config.batch.worker_pool_size, 4);
        assert_eq!(config.batch.pause(), Duration::from_secs(1));
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml = r#"
[api]
partner_id = "other"

[batch]
worker_pool_size = 2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.partner_id, "other");
        assert_eq!(config.api.list_path, "drivers/getListOfDriverIds");
        assert_eq!(config.batch.worker_pool_size, 2);
        assert_eq!(config.batch.window_size, 4);
    }

    #[test]
    fn test_deserialize_unknown_format_fails() {
        let toml = r#"
[output]
format = "csv"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.batch.pause_ms, 1000);
        assert_eq!(parsed.output.format, OutputFormat::Table);
    }
}
