use crate::app_config::{AppConfig, Environment, MAX_CONCURRENT_VIDEOS_CEILING};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the current process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses and validates configuration through `lookup`, so tests can feed a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let twelvelabs_api_key = require("TWELVELABS_API_KEY")?;
    let twelvelabs_index_id = require("TWELVELABS_INDEX_ID")?;
    let openai_api_key = require("OPENAI_API_KEY")?;

    let env = parse_environment(&or_default("SPONSORLENS_ENV", "development"))?;
    let bind_addr: SocketAddr = parse_as(
        "SPONSORLENS_BIND_ADDR",
        &or_default("SPONSORLENS_BIND_ADDR", "0.0.0.0:5000"),
    )?;
    let log_level = or_default("SPONSORLENS_LOG_LEVEL", "info");

    let twelvelabs_base_url = or_default("TWELVELABS_BASE_URL", "https://api.twelvelabs.io/v1.3");
    let openai_base_url = or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");
    let openai_model = or_default("OPENAI_MODEL", "gpt-4");
    let rules_path = lookup("SPONSORLENS_RULES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let job_retention_hours: u64 = parse_as(
        "SPONSORLENS_JOB_RETENTION_HOURS",
        &or_default("SPONSORLENS_JOB_RETENTION_HOURS", "24"),
    )?;
    let job_purge_cron = or_default("SPONSORLENS_JOB_PURGE_CRON", "0 0 * * * *");

    let max_concurrent_videos: usize = parse_as(
        "SPONSORLENS_MAX_CONCURRENT_VIDEOS",
        &or_default("SPONSORLENS_MAX_CONCURRENT_VIDEOS", "4"),
    )?;
    if max_concurrent_videos == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SPONSORLENS_MAX_CONCURRENT_VIDEOS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_concurrent_videos = max_concurrent_videos.min(MAX_CONCURRENT_VIDEOS_CEILING);

    let video_timeout_secs: u64 = parse_as(
        "SPONSORLENS_VIDEO_TIMEOUT_SECS",
        &or_default("SPONSORLENS_VIDEO_TIMEOUT_SECS", "900"),
    )?;
    if video_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SPONSORLENS_VIDEO_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let request_timeout_secs: u64 = parse_as(
        "SPONSORLENS_REQUEST_TIMEOUT_SECS",
        &or_default("SPONSORLENS_REQUEST_TIMEOUT_SECS", "60"),
    )?;
    let max_retries: u32 = parse_as(
        "SPONSORLENS_MAX_RETRIES",
        &or_default("SPONSORLENS_MAX_RETRIES", "2"),
    )?;
    let retry_backoff_base_ms: u64 = parse_as(
        "SPONSORLENS_RETRY_BACKOFF_BASE_MS",
        &or_default("SPONSORLENS_RETRY_BACKOFF_BASE_MS", "1000"),
    )?;
    let enable_web_search: bool = parse_as(
        "SPONSORLENS_ENABLE_WEB_SEARCH",
        &or_default("SPONSORLENS_ENABLE_WEB_SEARCH", "true"),
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        twelvelabs_api_key,
        twelvelabs_index_id,
        twelvelabs_base_url,
        openai_api_key,
        openai_base_url,
        openai_model,
        rules_path,
        job_retention_hours,
        job_purge_cron,
        max_concurrent_videos,
        video_timeout_secs,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        enable_web_search,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SPONSORLENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
