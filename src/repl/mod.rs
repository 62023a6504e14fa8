//! Interactive shell built on reedline
//!
//! - Line editing with persistent history
//! - Completion for commands, index names and request body keys
//! - Syntax highlighting of commands and JSON bodies
//! - Multi-line input until every brace and bracket is closed
//! - A prompt showing the cluster and the selected index

mod completer;
pub mod completion;
mod engine;
mod highlighter;
mod hinter;
mod prompt;
mod shared_state;
mod validator;

#[cfg(test)]
mod tests;

pub use completer::SearchCompleter;
pub use engine::ReplEngine;
pub use highlighter::SyntaxHighlighter;
pub use hinter::SearchHinter;
pub use prompt::SearchPrompt;
pub use shared_state::SharedState;
pub use validator::SearchValidator;
