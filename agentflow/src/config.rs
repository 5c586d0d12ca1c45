//! Process-wide settings.
//!
//! [`Settings`] is loaded once at start-up from the environment and an
//! optional `.env` file (falling back to defaults) and is read-only
//! afterwards. Variable names are matched case-insensitively.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Dotenv file read by [`Settings::from_env`], relative to the working directory.
pub const ENV_FILE: &str = ".env";

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Credential for the completion API.
    #[serde(skip_serializing, default)]
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Project label reported in start-up logs.
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Model identifier.
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum output tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whether the binary installs a tracing subscriber at all.
    #[serde(default = "default_true")]
    pub enable_logging: bool,
    /// Log level filter (e.g. `INFO`, `debug`, or a full `EnvFilter` directive).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether metrics events are forwarded by the logging sink.
    #[serde(default = "default_true")]
    pub enable_metrics: bool,
    /// Declared retry budget. Not consulted: a failing completion aborts the run.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// HTTP request timeout for the completion client.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Optional cap on stage and run histories; `None` keeps everything.
    #[serde(default)]
    pub history_capacity: Option<usize>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_project_name() -> String {
    "agent-project".to_string()
}

fn default_model_name() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            base_url: default_base_url(),
            project_name: default_project_name(),
            model_name: default_model_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            enable_logging: default_true(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            enable_metrics: default_true(),
            max_retries: default_max_retries(),
            timeout_seconds: default_timeout_seconds(),
            history_capacity: None,
        }
    }
}

impl Settings {
    /// Creates settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from the process environment and [`ENV_FILE`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_file(Path::new(ENV_FILE))
    }

    /// Loads settings from the process environment and a dotenv file.
    ///
    /// Process variables take precedence over file entries. A missing file
    /// is ignored; an unreadable or malformed one is an error. The process
    /// environment itself is not modified.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let file_vars = read_env_file(path)?;
        Self::from_vars(file_vars, std::env::vars())
    }

    /// Loads settings from dotenv entries overlaid with environment variables.
    ///
    /// Names are upper-cased before lookup, so `openai_api_key` and
    /// `OPENAI_API_KEY` are the same setting. Within one source an exact
    /// upper-case name wins over a differently cased duplicate.
    pub fn from_vars<F, E>(file_vars: F, env_vars: E) -> Result<Self, ConfigError>
    where
        F: IntoIterator<Item = (String, String)>,
        E: IntoIterator<Item = (String, String)>,
    {
        let mut vars = fold_keys(file_vars);
        vars.extend(fold_keys(env_vars));
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Loads settings through an arbitrary key lookup.
    ///
    /// Missing or blank keys keep their defaults; present keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(v) = get("OPENAI_API_KEY") {
            settings.openai_api_key = v;
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            settings.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("PROJECT_NAME") {
            settings.project_name = v;
        }
        if let Some(v) = get("MODEL_NAME") {
            settings.model_name = v;
        }
        if let Some(v) = get("TEMPERATURE") {
            settings.temperature = parse_value("TEMPERATURE", &v)?;
        }
        if let Some(v) = get("MAX_TOKENS") {
            settings.max_tokens = parse_value("MAX_TOKENS", &v)?;
        }
        if let Some(v) = get("ENABLE_LOGGING") {
            settings.enable_logging = parse_bool("ENABLE_LOGGING", &v)?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            settings.log_level = v;
        }
        if let Some(v) = get("LOG_FORMAT") {
            settings.log_format = v
                .parse()
                .map_err(|reason: String| ConfigError::invalid_value("LOG_FORMAT", &v, reason))?;
        }
        if let Some(v) = get("ENABLE_METRICS") {
            settings.enable_metrics = parse_bool("ENABLE_METRICS", &v)?;
        }
        if let Some(v) = get("MAX_RETRIES") {
            settings.max_retries = parse_value("MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("TIMEOUT_SECONDS") {
            settings.timeout_seconds = parse_value("TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = get("HISTORY_CAPACITY") {
            let capacity: usize = parse_value("HISTORY_CAPACITY", &v)?;
            settings.history_capacity = (capacity > 0).then_some(capacity);
        }

        Ok(settings)
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = key.into();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the history capacity.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: Option<usize>) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Gets the timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Reads `KEY=value` pairs from a dotenv file; a missing file yields none.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(err) if err.not_found() => return Ok(Vec::new()),
        Err(err) => return Err(ConfigError::env_file(path.display().to_string(), err.to_string())),
    };

    entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ConfigError::env_file(path.display().to_string(), err.to_string()))
}

fn fold_keys<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut folded = HashMap::new();
    for (key, value) in vars {
        let upper = key.to_ascii_uppercase();
        if key == upper {
            folded.insert(upper, value);
        } else {
            folded.entry(upper).or_insert(value);
        }
    }
    folded
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid_value(key, raw, e.to_string()))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(key, raw, "expected a boolean")),
    }
}
