//! searchsh library
//!
//! Core of the searchsh shell for Elasticsearch-compatible clusters. The
//! pieces can be used on their own, e.g. the body-aware completion or the
//! paginated result loader.
//!
//! # Modules
//!
//! - `browser`: full-screen result browser
//! - `cli`: command-line interface and argument parsing
//! - `config`: configuration management
//! - `error`: error types and handling
//! - `executor`: command execution
//! - `formatter`: output formatting and display
//! - `pagination`: incremental, cancellable result loading
//! - `parser`: shell command parsing
//! - `repl`: interactive line editor and completion
//! - `search`: search service trait and its HTTP implementation
//! - `store`: bookmarks and request history on disk
//!
//! # Example
//!
//! ```no_run
//! use searchsh::config::Config;
//! use searchsh::search::{HttpSearchService, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let service = HttpSearchService::new(
//!         "http://localhost:9200",
//!         &config.connection,
//!         config.search.sort_clause()?,
//!     )?;
//!
//!     let info = service.ping().await?;
//!     println!("Connected to {}", info.cluster_name);
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod pagination;
pub mod parser;
pub mod repl;
pub mod search;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SearchshError};
pub use executor::{CommandRouter, ExecutionContext, ExecutionResult};
pub use formatter::Formatter;
pub use parser::{Command, Parser};
pub use repl::{ReplEngine, SharedState};
pub use search::{HttpSearchService, SearchService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
