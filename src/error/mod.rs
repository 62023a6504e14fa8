//! Error handling module for searchsh.
//!
//! This module provides:
//! - A crate-wide error type wrapping more specific error kinds
//! - A recoverable [`ServiceError`] for everything the search cluster can fail with
//! - A crate-wide `Result` alias
//!
//! # Example
//!
//! ```rust,no_run
//! use searchsh::error::{Result, SearchshError, ServiceError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SearchshError::Service(ServiceError::Timeout))
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, ExecutionError, ParseError, Result, SearchshError,
    ServiceError, StoreError,
};
