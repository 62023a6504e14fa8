//! Command type definitions for searchsh
//!
//! This module defines all command types that can be parsed and executed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::OutputFormat;
use crate::search::HttpMethod;

/// Represents a parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Cluster and index administration (show, use, mapping)
    Admin(AdminCommand),

    /// Searching an index
    Search(SearchCommand),

    /// Raw console request against the cluster
    Request(RequestCommand),

    /// Saved request management
    Bookmark(BookmarkCommand),

    /// Session settings
    Config(ConfigCommand),

    /// Show the most recent requests, newest last
    History(Option<usize>),

    /// Help command with optional topic
    Help(Option<String>),

    /// Exit/quit command
    Exit,
}

/// Administrative commands
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    /// List indices with health and size
    ShowIndices,

    /// Select the index later commands default to
    UseIndex(String),

    /// Show the field mapping of an index, or of the selected one
    Mapping(Option<String>),
}

/// Search commands
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCommand {
    /// Open the result browser
    Browse {
        index: Option<String>,
        /// Query clause or request body with `query`/`sort`
        query: Option<Value>,
    },

    /// One `_search` request against the selected index
    Query { body: Option<Value> },
}

/// A console request; also the unit saved as a bookmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestCommand {
    pub method: HttpMethod,

    /// Path relative to the cluster root, with a leading `/`
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestCommand {
    pub fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        Self { method, path, body }
    }
}

/// Bookmark commands
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkCommand {
    /// Save the last executed request under a name
    Save(String),

    /// Execute a saved request
    Run(String),

    /// Delete a saved request
    Remove(String),

    /// List saved requests
    List,
}

/// Session configuration commands
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigCommand {
    /// Set output format
    SetFormat(OutputFormat),

    /// Show output format
    GetFormat,
}
