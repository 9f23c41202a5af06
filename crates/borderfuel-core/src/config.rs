use crate::app_config::{AppConfig, DEFAULT_RATES_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed, or if a
/// min/max pair is inverted.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let store_path = PathBuf::from(or_default("BORDERFUEL_STORE_PATH", "./border_data.json"));
    let sources_path = PathBuf::from(or_default(
        "BORDERFUEL_SOURCES_PATH",
        "./config/sources.yaml",
    ));
    let log_level = or_default("BORDERFUEL_LOG_LEVEL", "info");
    let rates_url = or_default("BORDERFUEL_RATES_URL", DEFAULT_RATES_URL);

    let request_timeout_secs = parse_u64("BORDERFUEL_REQUEST_TIMEOUT_SECS", "30")?;
    let max_attempts = parse_u32("BORDERFUEL_MAX_ATTEMPTS", "3")?;
    let retry_backoff_min_ms = parse_u64("BORDERFUEL_RETRY_BACKOFF_MIN_MS", "2000")?;
    let retry_backoff_max_ms = parse_u64("BORDERFUEL_RETRY_BACKOFF_MAX_MS", "6000")?;
    let politeness_delay_min_ms = parse_u64("BORDERFUEL_POLITENESS_DELAY_MIN_MS", "1000")?;
    let politeness_delay_max_ms = parse_u64("BORDERFUEL_POLITENESS_DELAY_MAX_MS", "3000")?;

    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BORDERFUEL_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    check_range(
        "BORDERFUEL_RETRY_BACKOFF",
        retry_backoff_min_ms,
        retry_backoff_max_ms,
    )?;
    check_range(
        "BORDERFUEL_POLITENESS_DELAY",
        politeness_delay_min_ms,
        politeness_delay_max_ms,
    )?;

    Ok(AppConfig {
        store_path,
        sources_path,
        log_level,
        rates_url,
        request_timeout_secs,
        max_attempts,
        retry_backoff_min_ms,
        retry_backoff_max_ms,
        politeness_delay_min_ms,
        politeness_delay_max_ms,
    })
}

fn check_range(prefix: &str, min: u64, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::Validation(format!(
            "{prefix}_MIN_MS ({min}) must not exceed {prefix}_MAX_MS ({max})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
