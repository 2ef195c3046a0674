use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub twelvelabs_api_key: String,
    pub twelvelabs_index_id: String,
    pub twelvelabs_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    /// Optional YAML classification ruleset; built-in defaults when unset.
    pub rules_path: Option<PathBuf>,
    pub job_retention_hours: u64,
    pub job_purge_cron: String,
    /// Worker cap for multi-video jobs, never above [`MAX_CONCURRENT_VIDEOS_CEILING`].
    pub max_concurrent_videos: usize,
    pub video_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub enable_web_search: bool,
}

/// Hard upper bound on parallel per-video pipelines.
pub const MAX_CONCURRENT_VIDEOS_CEILING: usize = 4;

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("twelvelabs_api_key", &"[redacted]")
            .field("twelvelabs_index_id", &self.twelvelabs_index_id)
            .field("twelvelabs_base_url", &self.twelvelabs_base_url)
            .field("openai_api_key", &"[redacted]")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("rules_path", &self.rules_path)
            .field("job_retention_hours", &self.job_retention_hours)
            .field("job_purge_cron", &self.job_purge_cron)
            .field("max_concurrent_videos", &self.max_concurrent_videos)
            .field("video_timeout_secs", &self.video_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("enable_web_search", &self.enable_web_search)
            .finish()
    }
}
