//! Syntax highlighter for shell commands and JSON request bodies

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use super::completion::COMMANDS;

/// Highlights the leading command keyword and the JSON body after it
pub struct SyntaxHighlighter {
    enabled: bool,
}

impl SyntaxHighlighter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn word_style(word: &str, first: bool) -> Style {
        let is_verb = matches!(
            word.to_ascii_uppercase().as_str(),
            "GET" | "POST" | "PUT" | "DELETE" | "HEAD"
        );
        if first && is_verb {
            Color::Green.bold()
        } else if first && COMMANDS.contains(&word) {
            Color::Blue.bold()
        } else if matches!(word, "true" | "false" | "null") {
            Color::Blue.into()
        } else if word.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
            Color::Magenta.into()
        } else {
            Style::default()
        }
    }

    /// True when the next non-blank character after `from` is `:`
    fn followed_by_colon(chars: &[char], from: usize) -> bool {
        chars[from..]
            .iter()
            .find(|c| !c.is_whitespace())
            .is_some_and(|&c| c == ':')
    }

    fn highlight_line(line: &str) -> StyledText {
        let mut styled = StyledText::new();
        let mut current_word = String::new();
        let mut string_buffer = String::new();
        let mut in_string = false;
        let mut escape_next = false;
        let mut seen_word = false;

        let chars: Vec<char> = line.chars().collect();

        let mut flush_word = |styled: &mut StyledText, word: &mut String, seen: &mut bool| {
            if !word.is_empty() {
                styled.push((Self::word_style(word, !*seen), std::mem::take(word)));
                *seen = true;
            }
        };

        for (i, &ch) in chars.iter().enumerate() {
            if in_string {
                string_buffer.push(ch);
                if escape_next {
                    escape_next = false;
                } else if ch == '\\' {
                    escape_next = true;
                } else if ch == '"' {
                    // Object keys and string values get different colors
                    let style = if Self::followed_by_colon(&chars, i + 1) {
                        Color::Cyan.into()
                    } else {
                        Color::Yellow.into()
                    };
                    styled.push((style, std::mem::take(&mut string_buffer)));
                    in_string = false;
                }
                continue;
            }

            if ch == '"' {
                flush_word(&mut styled, &mut current_word, &mut seen_word);
                in_string = true;
                string_buffer.push(ch);
                continue;
            }

            if ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/' | '*') {
                current_word.push(ch);
                continue;
            }

            flush_word(&mut styled, &mut current_word, &mut seen_word);
            let style = match ch {
                '{' | '}' | '[' | ']' => Color::Cyan.into(),
                ',' | ':' => Color::DarkGray.into(),
                _ => Style::default(),
            };
            styled.push((style, ch.to_string()));
        }

        flush_word(&mut styled, &mut current_word, &mut seen_word);
        if in_string {
            // Unclosed string
            styled.push((Color::Yellow.into(), string_buffer));
        }

        styled
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Highlighter for SyntaxHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        if !self.enabled {
            let mut styled = StyledText::new();
            styled.push((Style::default(), line.to_string()));
            return styled;
        }
        Self::highlight_line(line)
    }
}
