//! 编辑器运行配置加载。

use std::env;
use std::time::Duration;

use domain::{DownstreamPolicy, TabIndex};

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 编辑器运行配置。
#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub http_addr: String,
    pub historian_url: String,
    pub historian_token: Option<String>,
    pub historian_timeout_ms: u64,
    pub debounce_ms: u64,
    pub extended_operators_version: String,
    pub duration_filter_version: String,
    pub downstream_policy: DownstreamPolicy,
    pub default_series_limit: u32,
    pub default_tab: TabIndex,
    pub alerting: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8090".to_string(),
            historian_url: "http://127.0.0.1:8000".to_string(),
            historian_token: None,
            historian_timeout_ms: 10_000,
            debounce_ms: 500,
            extended_operators_version: "v7.2.0".to_string(),
            duration_filter_version: "v7.3.0".to_string(),
            downstream_policy: DownstreamPolicy::Sticky,
            default_series_limit: 50,
            default_tab: TabIndex::Assets,
            alerting: false,
        }
    }
}

impl EditorConfig {
    /// 从环境变量读取配置，未设置的项使用默认值。
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let http_addr = env::var("EDITOR_HTTP_ADDR").unwrap_or(defaults.http_addr);
        let historian_url = env::var("HISTORIAN_URL").unwrap_or(defaults.historian_url);
        let historian_token = read_optional("HISTORIAN_TOKEN");
        let historian_timeout_ms =
            read_u64_with_default("HISTORIAN_TIMEOUT_MS", defaults.historian_timeout_ms)?;
        let debounce_ms = read_u64_with_default("EDITOR_DEBOUNCE_MS", defaults.debounce_ms)?;
        let extended_operators_version = read_optional("EDITOR_EXTENDED_OPERATORS_VERSION")
            .unwrap_or(defaults.extended_operators_version);
        let duration_filter_version = read_optional("EDITOR_DURATION_FILTER_VERSION")
            .unwrap_or(defaults.duration_filter_version);
        let downstream_policy = match read_optional("EDITOR_DOWNSTREAM_POLICY") {
            Some(value) => DownstreamPolicy::parse(&value).ok_or_else(|| {
                ConfigError::Invalid("EDITOR_DOWNSTREAM_POLICY".to_string(), value)
            })?,
            None => defaults.downstream_policy,
        };
        let default_series_limit =
            read_u32_with_default("EDITOR_DEFAULT_SERIES_LIMIT", defaults.default_series_limit)?;
        let default_tab = match read_optional("EDITOR_DEFAULT_TAB") {
            Some(value) => TabIndex::from_name(&value)
                .ok_or_else(|| ConfigError::Invalid("EDITOR_DEFAULT_TAB".to_string(), value))?,
            None => defaults.default_tab,
        };
        let alerting = read_bool_with_default("EDITOR_ALERTING", defaults.alerting);

        Ok(Self {
            http_addr,
            historian_url,
            historian_token,
            historian_timeout_ms,
            debounce_ms,
            extended_operators_version,
            duration_filter_version,
            downstream_policy,
            default_series_limit,
            default_tab,
            alerting,
        })
    }

    pub fn historian_timeout(&self) -> Duration {
        Duration::from_millis(self.historian_timeout_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u32_with_default(key: &str, default: u32) -> Result<u32, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
