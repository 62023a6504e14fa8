//! Color output support for terminal formatting
//!
//! ANSI styling for messages around the formatted result: errors, notices
//! and statistics.

/// ANSI color codes for terminal output
pub struct AnsiColors;

impl AnsiColors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const DIM: &'static str = "\x1b[2m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
}

/// Color scheme for output highlighting
#[derive(Debug, Clone, Copy)]
pub struct Colorizer {
    /// Enable colors
    enabled: bool,
}

impl Colorizer {
    /// Create a new colorizer
    ///
    /// # Arguments
    /// * `enabled` - Enable color output
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", color, text, AnsiColors::RESET)
        } else {
            text.to_string()
        }
    }

    /// Colorize text as success (green)
    pub fn success(&self, text: &str) -> String {
        self.paint(AnsiColors::GREEN, text)
    }

    /// Prefix with `Error:` and colorize red
    pub fn error(&self, text: &str) -> String {
        self.paint(AnsiColors::RED, &format!("Error: {}", text))
    }

    /// Colorize text as warning (yellow)
    pub fn warning(&self, text: &str) -> String {
        self.paint(AnsiColors::YELLOW, text)
    }

    /// De-emphasize text, e.g. statistics
    pub fn dim(&self, text: &str) -> String {
        self.paint(AnsiColors::DIM, text)
    }
}
