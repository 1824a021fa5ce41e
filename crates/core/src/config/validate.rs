use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Window and worker pool sizes are at least 1
/// - Request timeout is at least 1 second
/// - Partner id is not empty
/// - Base URL is an absolute http(s) URL
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch.window_size == 0 {
        return Err(ConfigError::ValidationError(
            "batch.window_size cannot be 0".to_string(),
        ));
    }

    if config.batch.worker_pool_size == 0 {
        return Err(ConfigError::ValidationError(
            "batch.worker_pool_size cannot be 0".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.api.partner_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.partner_id cannot be empty".to_string(),
        ));
    }

    let url = reqwest::Url::parse(&config.api.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "api.base_url '{}' is not a valid URL: {}",
            config.api.base_url, e
        ))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}
