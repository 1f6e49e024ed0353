use crate::config::types::{BotConfig, Config, DedupConfig, PortalConfig};
use crate::ConfigError;
use url::Url;

/// Telegram rejects long-poll timeouts above this
const MAX_POLL_TIMEOUT_SECS: u64 = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_portal_config(&config.portal)?;
    validate_bot_config(&config.bot)?;
    validate_dedup_config(&config.dedup)?;
    Ok(())
}

/// Validates portal configuration
fn validate_portal_config(config: &PortalConfig) -> Result<(), ConfigError> {
    validate_http_url("endpoint", &config.endpoint)?;

    if config.query_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "query-param cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates bot configuration
fn validate_bot_config(config: &BotConfig) -> Result<(), ConfigError> {
    validate_http_url("api-url", &config.api_url)?;

    if config.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "poll-timeout-secs must be <= {}, got {}",
            MAX_POLL_TIMEOUT_SECS, config.poll_timeout_secs
        )));
    }

    if let Some(token) = &config.token {
        if token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "token cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates dedup configuration
fn validate_dedup_config(config: &DedupConfig) -> Result<(), ConfigError> {
    if config.window_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "window-ms must be <= 60000, got {}",
            config.window_ms
        )));
    }
    Ok(())
}

/// Checks that `value` parses as an http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
