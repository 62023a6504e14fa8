//! Configuration management for searchsh
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,

    /// Result browsing and pagination configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Line editor history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Bookmark and request history store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Default cluster URL
    #[serde(default = "default_url")]
    pub default_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Named datasources (name -> URL)
    #[serde(default)]
    pub datasources: BTreeMap<String, String>,

    /// Datasource used when neither a URL nor `-d` is given
    #[serde(default)]
    pub default_datasource: Option<String>,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[serde(default)]
    pub password: Option<String>,

    /// API key, either already encoded or in `id:key` form
    #[serde(default)]
    pub api_key: Option<String>,

    /// Skip TLS certificate validation
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

/// Display and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output format (json, json-pretty, table, compact)
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color_output: bool,

    /// Enable syntax highlighting
    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,

    /// Show execution time
    #[serde(default = "default_true")]
    pub show_timing: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Compact JSON format (single-line)
    ///
    /// Suitable for: logging, piping to other tools
    Json,

    /// Pretty-printed JSON format (multi-line)
    ///
    /// Human-readable JSON with indentation and newlines.
    JsonPretty,

    /// Table format
    ///
    /// Displays hits and listings as a table with columns.
    Table,

    /// Compact summary format
    ///
    /// Displays only summary information, not full document content.
    /// Example: "5 hit(s) of 1200"
    Compact,
}

/// Result browsing and pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of hits requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Rows from the end of loaded data at which the next page is prefetched
    #[serde(default = "default_prefetch_lookahead")]
    pub prefetch_lookahead: usize,

    /// Sort clause (JSON) used for cursor pagination when the query gives none
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

/// Line editor history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_true")]
    pub persist: bool,
}

/// Local store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// TOML file holding named bookmarks
    #[serde(default = "default_bookmarks_file")]
    pub bookmarks_file: PathBuf,

    /// Append-only JSON lines file with executed requests
    #[serde(default = "default_request_history_file")]
    pub request_history_file: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file (None for stderr)
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_format() -> OutputFormat {
    OutputFormat::JsonPretty
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    50
}

fn default_prefetch_lookahead() -> usize {
    10
}

fn default_sort() -> String {
    r#"[{"_doc": "asc"}]"#.to_string()
}

fn default_max_history_size() -> usize {
    1000
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".searchsh")
}

fn default_history_file() -> PathBuf {
    app_dir().join("line_history")
}

fn default_bookmarks_file() -> PathBuf {
    app_dir().join("bookmarks.toml")
}

fn default_request_history_file() -> PathBuf {
    app_dir().join("requests.jsonl")
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_url: default_url(),
            timeout: default_timeout(),
            datasources: BTreeMap::new(),
            default_datasource: None,
            username: None,
            password: None,
            api_key: None,
            accept_invalid_certs: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color_output: true,
            syntax_highlighting: true,
            show_timing: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            prefetch_lookahead: default_prefetch_lookahead(),
            default_sort: default_sort(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: true,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bookmarks_file: default_bookmarks_file(),
            request_history_file: default_request_history_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// When `path` is `None` the default location is used. A missing file
    /// yields the default configuration; an explicitly given missing file
    /// is an error.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let resolved = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !resolved.exists() {
            if path.is_some() {
                return Err(ConfigError::FileNotFound(resolved.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&resolved)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        app_dir().join("config.toml")
    }

    /// Save configuration to a file
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        self.connection.validate_url(&self.connection.default_url)?;
        for url in self.connection.datasources.values() {
            self.connection.validate_url(url)?;
        }

        if let Some(name) = &self.connection.default_datasource
            && !self.connection.datasources.contains_key(name)
        {
            return Err(ConfigError::InvalidValue {
                field: "connection.default_datasource".to_string(),
                value: name.clone(),
            }
            .into());
        }

        if self.search.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search.page_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        self.search.sort_clause()?;
        Ok(())
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout)
    }
}

impl ConnectionConfig {
    /// Check that a cluster URL is non-empty and uses http or https
    pub fn validate_url(&self, url: &str) -> Result<()> {
        let trimmed = url.trim();
        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));
        if let Some(host) = host
            && !host.is_empty()
        {
            return Ok(());
        }
        Err(ConfigError::InvalidValue {
            field: "connection.url".to_string(),
            value: url.to_string(),
        }
        .into())
    }

    /// Resolve a datasource URL
    ///
    /// With `Some(name)` the named datasource is looked up; with `None` the
    /// configured default datasource (if any) is used.
    pub fn get_datasource(&self, name: Option<&str>) -> Option<String> {
        let name = name.or(self.default_datasource.as_deref())?;
        self.datasources.get(name).cloned()
    }

    /// Names of all configured datasources, sorted
    pub fn list_datasources(&self) -> Vec<String> {
        self.datasources.keys().cloned().collect()
    }
}

impl SearchConfig {
    /// Parse the configured default sort clause
    pub fn sort_clause(&self) -> Result<serde_json::Value> {
        let value: serde_json::Value =
            serde_json::from_str(&self.default_sort).map_err(|e| ConfigError::InvalidValue {
                field: "search.default_sort".to_string(),
                value: format!("{} ({e})", self.default_sort),
            })?;

        if !value.is_array() {
            return Err(ConfigError::InvalidValue {
                field: "search.default_sort".to_string(),
                value: self.default_sort.clone(),
            }
            .into());
        }
        Ok(value)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl OutputFormat {
    /// Parse a user supplied format name
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" | "pretty" => Some(OutputFormat::JsonPretty),
            "table" => Some(OutputFormat::Table),
            "compact" => Some(OutputFormat::Compact),
            _ => None,
        }
    }

    /// Check if format requires pretty printing
    pub fn is_pretty(&self) -> bool {
        matches!(self, OutputFormat::JsonPretty | OutputFormat::Table)
    }

    /// Check if format is JSON-based
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonPretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.connection.default_url, "http://localhost:9200");
        assert_eq!(config.display.format, OutputFormat::JsonPretty);
        assert_eq!(config.search.page_size, 50);
        assert_eq!(config.search.prefetch_lookahead, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [connection]
            default_url = "https://es.internal:9200"

            [connection.datasources]
            prod = "https://es-prod:9200"

            [search]
            page_size = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.connection.default_url, "https://es.internal:9200");
        assert_eq!(config.connection.timeout, 30);
        assert_eq!(config.search.page_size, 200);
        assert_eq!(config.search.prefetch_lookahead, 10);
        assert_eq!(
            config.connection.get_datasource(Some("prod")).as_deref(),
            Some("https://es-prod:9200")
        );
        assert_eq!(config.connection.get_datasource(None), None);
        assert_eq!(config.connection.list_datasources(), vec!["prod".to_string()]);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::parse("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::parse("yaml"), None);
        assert!(OutputFormat::Table.is_pretty());
        assert!(!OutputFormat::Compact.is_json());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.search.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.connection.default_url = "localhost:9200".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.default_sort = r#"{"_doc": "asc"}"#.to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.connection.default_datasource = Some("missing".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sort_clause() {
        let config = Config::default();
        let sort = config.search.sort_clause().unwrap();
        assert_eq!(sort, serde_json::json!([{"_doc": "asc"}]));
    }

    #[test]
    fn test_request_timeout() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let missing = std::env::temp_dir().join(format!("searchsh-{}.toml", uuid::Uuid::new_v4()));
        assert!(Config::load_from_file(Some(&missing)).is_err());
    }
}
