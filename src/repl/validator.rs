//! Validator for reedline - keeps reading lines until a request body is closed

use reedline::{ValidationResult, Validator};

/// Multi-line input validator
pub struct SearchValidator;

impl SearchValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check that every `{` and `[` outside a JSON string is closed
    fn is_balanced(&self, input: &str) -> bool {
        let mut depth: i32 = 0;
        let mut in_string = false;
        let mut escape_next = false;

        for ch in input.chars() {
            if escape_next {
                escape_next = false;
                continue;
            }

            if in_string {
                match ch {
                    '\\' => escape_next = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }

            match ch {
                '"' => in_string = true,
                '{' | '[' => depth += 1,
                '}' | ']' => depth -= 1,
                _ => {}
            }
        }

        // Extra closers are a syntax error for the parser to report
        !in_string && depth <= 0
    }
}

impl Default for SearchValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for SearchValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        let trimmed = line.trim();

        if trimmed.is_empty() || self.is_balanced(trimmed) {
            ValidationResult::Complete
        } else {
            ValidationResult::Incomplete
        }
    }
}
