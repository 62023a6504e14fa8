//! Execution result types
//!
//! This module defines the data structures for representing command execution results:
//! - ExecutionResult: Overall result of a command execution
//! - ResultData: Various types of data that can be returned
//! - ExecutionStats: Statistics about the execution

use serde_json::Value;

use crate::search::{CollectionInfo, SearchPage};
use crate::store::{Bookmark, HistoryEntry};

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Success status
    pub success: bool,

    /// Result data (response body, listings, etc.)
    pub data: ResultData,

    /// Execution statistics
    pub stats: ExecutionStats,

    /// Error message if failed
    pub error: Option<String>,
}

/// Data returned from command execution
#[derive(Debug, Clone)]
pub enum ResultData {
    /// Raw response body of a console request
    Json(Value),

    /// Response of a `_search` request, decoded into hits
    Search { page: SearchPage, raw: Value },

    /// Index listing
    Indices(Vec<CollectionInfo>),

    /// Flattened field mapping of one index
    Mapping {
        index: String,
        fields: Vec<(String, String)>,
    },

    /// Saved requests
    Bookmarks(Vec<Bookmark>),

    /// Recently executed requests, oldest first
    History(Vec<HistoryEntry>),

    /// Text message
    Message(String),

    /// No data
    None,
}

/// Execution statistics
#[derive(Debug, Clone, Default)]
pub struct ExecutionStats {
    /// Execution time in milliseconds
    pub execution_time_ms: u64,

    /// Number of documents returned
    pub documents_returned: usize,

    /// Server-reported number of matching documents
    pub total_hits: Option<u64>,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn success(data: ResultData, stats: ExecutionStats) -> Self {
        Self {
            success: true,
            data,
            stats,
            error: None,
        }
    }

    /// Successful result carrying only a message
    pub fn message(text: impl Into<String>) -> Self {
        Self::success(ResultData::Message(text.into()), ExecutionStats::default())
    }

    /// Create a failed result
    pub fn error(error: String) -> Self {
        Self {
            success: false,
            data: ResultData::None,
            stats: ExecutionStats::default(),
            error: Some(error),
        }
    }
}
