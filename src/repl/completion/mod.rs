//! Completion system for the searchsh REPL
//!
//! Completion works on half-typed input and never fails. A request body is
//! completed structurally, a shell command by keyword.
//!
//! # Architecture
//!
//! - **Context**: recovers the key path and key/value position at the cursor
//! - **Schema**: static table of keys and values per request-body position
//! - **Provider**: command keywords and cached index names
//! - **Engine**: picks the right source and builds editor replacements
//!
//! # Examples
//!
//! ```
//! use searchsh::repl::completion::{suggest, track};
//!
//! let context = track(r#"{"query":{"bool":{"#, usize::MAX);
//! assert_eq!(context.path, vec!["query", "bool"]);
//! assert!(context.in_key);
//!
//! let items = suggest(&context.path);
//! assert_eq!(items[0].text, "must");
//! ```

mod context;
mod engine;
mod provider;
mod schema;

pub use context::{Context, track};
pub use engine::{CompletionEngine, CompletionPair, suggest, suggest_in};
pub use provider::{COMMANDS, CandidateProvider, IndexCandidateProvider};
pub use schema::{CompletionItem, CompletionKind, SchemaTable};
