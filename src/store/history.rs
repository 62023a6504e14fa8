//! Append-only log of executed console requests (JSON lines)

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::parser::RequestCommand;
use crate::search::HttpMethod;

/// One executed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// `ok`, or the error the request failed with
    pub status: String,
}

impl HistoryEntry {
    /// Record `request` as executed now
    pub fn new(request: &RequestCommand, status: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            method: request.method,
            path: request.path.clone(),
            body: request.body.clone(),
            status: status.into(),
        }
    }

    pub fn request(&self) -> RequestCommand {
        RequestCommand::new(self.method, self.path.clone(), self.body.clone())
    }
}

/// Request history file accessor
#[derive(Debug, Clone)]
pub struct RequestHistory {
    path: PathBuf,
}

impl RequestHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(entry)
            .map_err(|e| format!("Failed to serialize history entry: {e}"))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        debug!("Recorded {} {} ({})", entry.method, entry.path, entry.status);
        Ok(())
    }

    /// The last `limit` entries, oldest first
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut entries: Vec<HistoryEntry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(number, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping history line {}: {}", number + 1, e);
                    None
                }
            })
            .collect();

        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        Ok(entries)
    }
}
