//! Completer for reedline - provides completion suggestions

use std::sync::Arc;

use reedline::{Completer, Span, Suggestion};

use super::completion::{CompletionEngine, IndexCandidateProvider};
use crate::search::SearchService;

/// Command and request body completer for reedline
pub struct SearchCompleter {
    /// Completion engine for shell commands and request bodies
    completion_engine: CompletionEngine,
}

impl SearchCompleter {
    /// Create a new completer
    ///
    /// # Arguments
    /// * `service` - Service used to complete index names; `None` disables them
    ///
    /// # Returns
    /// * `Self` - New completer
    pub fn new(service: Option<Arc<dyn SearchService>>) -> Self {
        let provider = Arc::new(IndexCandidateProvider::new(service));
        Self {
            completion_engine: CompletionEngine::new(provider),
        }
    }
}

impl Completer for SearchCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - List of completion suggestions
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let (start, candidates) = self.completion_engine.complete(line, pos);

        candidates
            .into_iter()
            .map(|pair| Suggestion {
                value: pair.replacement,
                description: pair.description,
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}
