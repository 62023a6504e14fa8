//! Hinter for reedline - inline hints from history and the body schema

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

use super::completion::{CompletionKind, suggest, track};

/// Shows the rest of a matching history entry, or the only schema key
/// matching the key being typed
pub struct SearchHinter {
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl SearchHinter {
    pub fn new() -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// Most recent history entry extending `line`
    fn history_hint(line: &str, history: &dyn History) -> Option<String> {
        let item = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()?
            .into_iter()
            .next()?;

        let history_line = item.command_line.as_str();
        (history_line.len() > line.len() && history_line.starts_with(line))
            .then(|| history_line[line.len()..].to_string())
    }

    /// Completion of a quoted key when exactly one schema key matches
    fn schema_hint(line: &str) -> Option<String> {
        let context = track(line, line.len());
        let quoted = line
            .get(context.token_start..)
            .is_some_and(|token| token.starts_with('"'));
        if context.depth == 0 || !context.in_key || !quoted || context.partial.is_empty() {
            return None;
        }

        let mut matches = suggest(&context.path).into_iter().filter(|item| {
            item.kind == CompletionKind::Field && item.text.starts_with(&context.partial)
        });
        let only = matches.next()?;
        if matches.next().is_some() {
            return None;
        }

        Some(format!("{}\": ", &only.text[context.partial.len()..]))
    }
}

impl Default for SearchHinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hinter for SearchHinter {
    /// Provide a hint for the current line
    ///
    /// # Arguments
    /// * `line` - The current input line
    /// * `pos` - Cursor position
    /// * `history` - Command history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    ///
    /// # Returns
    /// * `String` - Hint text to display after the cursor
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let Some(hint) = Self::history_hint(line, history).or_else(|| Self::schema_hint(line))
        else {
            return String::new();
        };

        self.current_hint = hint;
        if use_ansi_coloring {
            self.style.paint(&self.current_hint).to_string()
        } else {
            self.current_hint.clone()
        }
    }

    fn next_hint_token(&self) -> String {
        self.current_hint
            .split_inclusive(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .to_string()
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }
}
