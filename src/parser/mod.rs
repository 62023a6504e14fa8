//! Command parser for searchsh
//!
//! # Architecture
//!
//! - `command`: Command type definitions
//! - `shell_commands`: keyword commands (show, use, bookmark, ...)
//! - `request`: commands with a JSON body (search, browse, console requests)
//!
//! # Examples
//!
//! ```
//! use searchsh::parser::{Command, Parser};
//!
//! let mut parser = Parser::new();
//! let cmd = parser.parse("GET /_cluster/health").unwrap();
//! assert!(matches!(cmd, Command::Request(_)));
//! ```

mod command;
mod request;
mod shell_commands;

// Re-export public API
pub use command::*;
pub use request::parse_optional_body;

use crate::error::{ParseError, Result};

/// Main parser for searchsh commands
pub struct Parser {}

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse an input string into a Command
    ///
    /// # Arguments
    ///
    /// * `input` - The input string to parse, possibly spanning lines
    ///
    /// # Returns
    ///
    /// * `Result<Command>` - The parsed command or an error
    pub fn parse(&mut self, input: &str) -> Result<Command> {
        let trimmed = input.trim().trim_end_matches(';').trim();

        if trimmed.is_empty() {
            return Err(ParseError::InvalidCommand("Empty input".to_string()).into());
        }

        if shell_commands::ShellCommandParser::is_shell_command(trimmed) {
            return shell_commands::ShellCommandParser::parse(trimmed);
        }

        if request::RequestParser::is_request(trimmed) {
            return request::RequestParser::parse(trimmed);
        }

        Err(ParseError::InvalidCommand(format!(
            "{} (type 'help' for a list of commands)",
            trimmed
        ))
        .into())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::HttpMethod;

    #[test]
    fn test_parse_exit() {
        let mut parser = Parser::new();
        assert!(matches!(parser.parse("exit").unwrap(), Command::Exit));
        assert!(matches!(parser.parse("quit;").unwrap(), Command::Exit));
    }

    #[test]
    fn test_parse_empty_and_unknown() {
        let mut parser = Parser::new();
        assert!(parser.parse("   ").is_err());
        assert!(parser.parse("db.users.find()").is_err());
    }

    #[test]
    fn test_parse_routes_requests() {
        let mut parser = Parser::new();
        match parser.parse("delete /old-logs").unwrap() {
            Command::Request(req) => {
                assert_eq!(req.method, HttpMethod::Delete);
                assert_eq!(req.path, "/old-logs");
                assert!(req.body.is_none());
            }
            other => panic!("Expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_routes_shell_commands() {
        let mut parser = Parser::new();
        assert_eq!(
            parser.parse("use logs").unwrap(),
            Command::Admin(AdminCommand::UseIndex("logs".to_string()))
        );
    }
}
