//! Parser for commands that carry a JSON body
//!
//! - `search [json]`
//! - `browse [index] [json]`
//! - `GET|POST|PUT|DELETE|HEAD <path> [json]`
//!
//! The body is everything after the leading words and may span lines.

use serde_json::Value;

use super::shell_commands::split_first;
use crate::error::{ParseError, Result};
use crate::parser::command::{Command, RequestCommand, SearchCommand};
use crate::search::HttpMethod;

pub struct RequestParser;

impl RequestParser {
    /// Check if input is a search or console request
    pub fn is_request(input: &str) -> bool {
        let (word, _) = split_first(input);
        matches!(word, "search" | "browse") || HttpMethod::parse(word).is_some()
    }

    pub fn parse(input: &str) -> Result<Command> {
        let (word, rest) = split_first(input);
        match word {
            "search" => Ok(Command::Search(SearchCommand::Query {
                body: parse_optional_body(rest)?,
            })),
            "browse" => Self::parse_browse(rest),
            verb => {
                let method = HttpMethod::parse(verb).ok_or_else(|| {
                    ParseError::InvalidCommand(format!("Unknown command: {}", verb))
                })?;
                Self::parse_console(method, rest)
            }
        }
    }

    fn parse_browse(rest: &str) -> Result<Command> {
        if rest.is_empty() || rest.starts_with(['{', '[']) {
            return Ok(Command::Search(SearchCommand::Browse {
                index: None,
                query: parse_optional_body(rest)?,
            }));
        }

        let (index, body) = split_first(rest);
        Ok(Command::Search(SearchCommand::Browse {
            index: Some(index.to_string()),
            query: parse_optional_body(body)?,
        }))
    }

    fn parse_console(method: HttpMethod, rest: &str) -> Result<Command> {
        let (path, body) = split_first(rest);
        if path.is_empty() {
            return Err(ParseError::MissingArgument(format!("{} needs a path", method)).into());
        }
        if path.starts_with(['{', '[']) {
            return Err(ParseError::SyntaxError(format!(
                "expected a path before the body: {} <path> [json]",
                method
            ))
            .into());
        }
        Ok(Command::Request(RequestCommand::new(
            method,
            path,
            parse_optional_body(body)?,
        )))
    }
}

/// Parse a JSON body; empty text means no body
pub fn parse_optional_body(text: &str) -> Result<Option<Value>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ParseError::InvalidBody(e.to_string()).into())
}
