use std::{fmt, io};

/// Crate-wide `Result` type using [`SearchshError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, SearchshError>;

/// Top-level error type for searchsh operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum SearchshError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Errors reported by the search service (transport, status, decoding).
    Service(ServiceError),

    /// Command parsing errors.
    Parse(ParseError),

    /// Command execution errors.
    Execution(ExecutionError),

    /// Configuration errors.
    Config(ConfigError),

    /// Bookmark and request history store errors.
    Store(StoreError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to build the HTTP client or reach the cluster.
    ConnectionFailed(String),

    /// Invalid cluster URL.
    InvalidUrl(String),

    /// Not currently connected to a cluster.
    NotConnected,
}

/// Errors returned by a search service call.
///
/// Every variant is recoverable: the caller keeps its state and may retry.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Request did not complete within the configured timeout.
    Timeout,

    /// The cluster answered with a non-success status code.
    Status { code: u16, body: String },

    /// The response body could not be decoded.
    Decode(String),

    /// Lower level transport failure (DNS, TLS, connection reset, ...).
    Transport(String),

    /// The request was cancelled by the user.
    Cancelled,
}

/// Parsing-specific errors.
#[derive(Debug)]
pub enum ParseError {
    /// Syntax error in command.
    SyntaxError(String),

    /// Invalid command format.
    InvalidCommand(String),

    /// A required argument is missing.
    MissingArgument(String),

    /// Request body is not valid JSON.
    InvalidBody(String),
}

/// Execution-specific errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// No index selected and none given.
    NoIndexSelected,

    /// Operation not supported.
    UnsupportedOperation(String),

    /// Invalid operation parameters.
    InvalidParameters(String),

    /// Terminal setup or rendering failed.
    Terminal(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },

    /// Free-form configuration error.
    Generic(String),
}

/// Local store errors.
#[derive(Debug)]
pub enum StoreError {
    /// Bookmark does not exist.
    BookmarkNotFound(String),

    /// Store file is corrupt or has an unexpected layout.
    Corrupt { path: String, reason: String },

    /// Nothing to save (no request has been executed yet).
    NothingToSave,
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for SearchshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchshError::Connection(e) => write!(f, "Connection error: {e}"),
            SearchshError::Service(e) => write!(f, "Search service error: {e}"),
            SearchshError::Parse(e) => write!(f, "{e}"),
            SearchshError::Execution(e) => write!(f, "Execution error: {e}"),
            SearchshError::Config(e) => write!(f, "Configuration error: {e}"),
            SearchshError::Store(e) => write!(f, "Store error: {e}"),
            SearchshError::Io(e) => write!(f, "I/O error: {e}"),
            SearchshError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUrl(url) => write!(f, "Invalid cluster URL: {url}"),
            ConnectionError::NotConnected => write!(f, "Not connected to a cluster"),
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Timeout => write!(f, "request timed out"),
            ServiceError::Status { code, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {code}")
                } else {
                    write!(f, "HTTP {code}: {body}")
                }
            }
            ServiceError::Decode(msg) => write!(f, "failed to decode response: {msg}"),
            ServiceError::Transport(msg) => write!(f, "transport failure: {msg}"),
            ServiceError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::SyntaxError(msg) => write!(f, "Syntax error: {msg}"),
            ParseError::InvalidCommand(cmd) => write!(f, "Invalid command: {cmd}"),
            ParseError::MissingArgument(arg) => write!(f, "Missing argument: {arg}"),
            ParseError::InvalidBody(msg) => write!(f, "Invalid request body: {msg}"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::NoIndexSelected => {
                write!(f, "No index selected (use `use <index>` first)")
            }
            ExecutionError::UnsupportedOperation(op) => {
                write!(f, "Unsupported operation: {op}")
            }
            ExecutionError::InvalidParameters(msg) => write!(f, "Invalid parameters: {msg}"),
            ExecutionError::Terminal(msg) => write!(f, "Terminal error: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
            ConfigError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::BookmarkNotFound(name) => write!(f, "Bookmark not found: {name}"),
            StoreError::Corrupt { path, reason } => write!(f, "Corrupt store {path}: {reason}"),
            StoreError::NothingToSave => write!(f, "No request has been executed yet"),
        }
    }
}

impl std::error::Error for SearchshError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ServiceError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for StoreError {}

/* ========================= Conversions ========================= */

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceError::Status {
                code: status.as_u16(),
                body: String::new(),
            }
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Decode(err.to_string())
    }
}

impl From<io::Error> for SearchshError {
    fn from(err: io::Error) -> Self {
        SearchshError::Io(err)
    }
}

impl From<reqwest::Error> for SearchshError {
    fn from(err: reqwest::Error) -> Self {
        SearchshError::Service(err.into())
    }
}

impl From<ConnectionError> for SearchshError {
    fn from(err: ConnectionError) -> Self {
        SearchshError::Connection(err)
    }
}

impl From<ServiceError> for SearchshError {
    fn from(err: ServiceError) -> Self {
        SearchshError::Service(err)
    }
}

impl From<ParseError> for SearchshError {
    fn from(err: ParseError) -> Self {
        SearchshError::Parse(err)
    }
}

impl From<ExecutionError> for SearchshError {
    fn from(err: ExecutionError) -> Self {
        SearchshError::Execution(err)
    }
}

impl From<ConfigError> for SearchshError {
    fn from(err: ConfigError) -> Self {
        SearchshError::Config(err)
    }
}

impl From<StoreError> for SearchshError {
    fn from(err: StoreError) -> Self {
        SearchshError::Store(err)
    }
}

impl From<toml::de::Error> for SearchshError {
    fn from(err: toml::de::Error) -> Self {
        SearchshError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<toml::ser::Error> for SearchshError {
    fn from(err: toml::ser::Error) -> Self {
        SearchshError::Config(ConfigError::InvalidFormat(err.to_string()))
    }
}

impl From<reedline::ReedlineError> for SearchshError {
    fn from(err: reedline::ReedlineError) -> Self {
        SearchshError::Generic(format!("Line editor error: {err}"))
    }
}

impl From<String> for SearchshError {
    fn from(msg: String) -> Self {
        SearchshError::Generic(msg)
    }
}

impl From<&str> for SearchshError {
    fn from(msg: &str) -> Self {
        SearchshError::Generic(msg.to_owned())
    }
}
