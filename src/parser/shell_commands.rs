//! Shell command parser
//!
//! Handles the keyword commands:
//! - show indices, show collections
//! - use <index>, mapping [index]
//! - bookmark save|run|rm <name>, bookmark list
//! - history [n], format [name]
//! - help [topic], exit, quit
//!
//! These are parsed with simple word matching.

use crate::config::OutputFormat;
use crate::error::{ParseError, Result};
use crate::parser::command::{AdminCommand, BookmarkCommand, Command, ConfigCommand};

/// Parser for shell keyword commands
pub struct ShellCommandParser;

impl ShellCommandParser {
    /// Check if input starts with a shell keyword
    pub fn is_shell_command(input: &str) -> bool {
        matches!(
            first_word(input),
            "show" | "use" | "mapping" | "bookmark" | "history" | "format" | "help" | "exit" | "quit"
        )
    }

    /// Parse a shell command
    pub fn parse(input: &str) -> Result<Command> {
        let trimmed = input.trim();
        let (keyword, rest) = split_first(trimmed);

        match keyword {
            "exit" | "quit" => Ok(Command::Exit),
            "help" => Ok(Command::Help(non_empty(rest))),
            "show" => Self::parse_show(rest),
            "use" => Self::parse_use(rest),
            "mapping" => Ok(Command::Admin(AdminCommand::Mapping(non_empty(rest)))),
            "bookmark" => Self::parse_bookmark(rest),
            "history" => Self::parse_history(rest),
            "format" => Self::parse_format(rest),
            _ => Err(ParseError::InvalidCommand(format!("Unknown shell command: {}", input)).into()),
        }
    }

    fn parse_show(rest: &str) -> Result<Command> {
        match rest {
            "indices" | "collections" => Ok(Command::Admin(AdminCommand::ShowIndices)),
            "" => Err(ParseError::MissingArgument("show what? (indices)".to_string()).into()),
            other => Err(ParseError::InvalidCommand(format!(
                "Unknown show command: show {}",
                other
            ))
            .into()),
        }
    }

    fn parse_use(rest: &str) -> Result<Command> {
        if rest.is_empty() {
            return Err(ParseError::MissingArgument("index name".to_string()).into());
        }
        if !Self::is_valid_index_name(rest) {
            return Err(ParseError::InvalidCommand(format!("Invalid index name: {}", rest)).into());
        }
        Ok(Command::Admin(AdminCommand::UseIndex(rest.to_string())))
    }

    fn parse_bookmark(rest: &str) -> Result<Command> {
        let (action, name) = split_first(rest);
        let require_name = || -> Result<String> {
            if name.is_empty() {
                Err(ParseError::MissingArgument("bookmark name".to_string()).into())
            } else if name.contains(char::is_whitespace) {
                Err(ParseError::InvalidCommand(format!("Invalid bookmark name: {}", name)).into())
            } else {
                Ok(name.to_string())
            }
        };

        let cmd = match action {
            "" | "list" | "ls" => BookmarkCommand::List,
            "save" => BookmarkCommand::Save(require_name()?),
            "run" => BookmarkCommand::Run(require_name()?),
            "rm" | "remove" | "delete" => BookmarkCommand::Remove(require_name()?),
            other => {
                return Err(ParseError::InvalidCommand(format!(
                    "Unknown bookmark command: bookmark {}",
                    other
                ))
                .into());
            }
        };
        Ok(Command::Bookmark(cmd))
    }

    fn parse_history(rest: &str) -> Result<Command> {
        if rest.is_empty() {
            return Ok(Command::History(None));
        }
        rest.parse::<usize>()
            .map(|n| Command::History(Some(n)))
            .map_err(|_| ParseError::InvalidCommand(format!("Invalid history count: {}", rest)).into())
    }

    fn parse_format(rest: &str) -> Result<Command> {
        if rest.is_empty() {
            return Ok(Command::Config(ConfigCommand::GetFormat));
        }
        OutputFormat::parse(rest)
            .map(|format| Command::Config(ConfigCommand::SetFormat(format)))
            .ok_or_else(|| {
                ParseError::InvalidCommand(format!(
                    "Unknown format: {} (json, json-pretty, table, compact)",
                    rest
                ))
                .into()
            })
    }

    /// Index names: lowercase, no path or wildcard characters, not `.`/`..`
    fn is_valid_index_name(name: &str) -> bool {
        if name.is_empty() || name.len() > 255 || name == "." || name == ".." {
            return false;
        }
        if name.starts_with(['-', '_', '+']) {
            return false;
        }
        !name.chars().any(|ch| {
            ch.is_uppercase()
                || ch.is_whitespace()
                || matches!(ch, '\\' | '/' | '*' | '?' | '"' | '<' | '>' | '|' | ',' | '#' | ':')
        })
    }
}

fn first_word(input: &str) -> &str {
    input.split_whitespace().next().unwrap_or_default()
}

/// Split off the first word; the remainder is trimmed
pub(crate) fn split_first(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (input, ""),
    }
}

fn non_empty(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}
