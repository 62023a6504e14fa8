//! Named request templates kept in a TOML file
//!
//! The file is edited in place with `toml_edit`, so comments and entries
//! written by hand survive a `bookmark save`. Each bookmark is a table under
//! `[bookmarks]`:
//!
//! ```toml
//! [bookmarks.errors]
//! method = "POST"
//! path = "/logs/_search"
//! body = '{"query":{"term":{"level":"error"}}}'
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, Item, Table, TableLike};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::parser::RequestCommand;
use crate::search::HttpMethod;

const BOOKMARKS_TABLE: &str = "bookmarks";

/// A saved request and its name
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub name: String,
    pub request: RequestCommand,
}

/// Bookmark file accessor
///
/// Every operation reads the file again so that several shells can share it.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
}

impl BookmarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save or overwrite a bookmark
    ///
    /// # Arguments
    /// * `name` - Bookmark name
    /// * `request` - Request to store
    pub fn save(&self, name: &str, request: &RequestCommand) -> Result<()> {
        let mut doc = self.load()?;

        let bookmarks = doc
            .entry(BOOKMARKS_TABLE)
            .or_insert(toml_edit::table())
            .as_table_mut()
            .ok_or_else(|| self.corrupt("`bookmarks` is not a table"))?;

        let mut entry = Table::new();
        entry["method"] = toml_edit::value(request.method.as_str());
        entry["path"] = toml_edit::value(request.path.as_str());
        if let Some(body) = &request.body {
            entry["body"] = toml_edit::value(body.to_string());
        }
        bookmarks.insert(name, Item::Table(entry));

        self.write(&doc)?;
        info!("Saved bookmark '{}' to {}", name, self.path.display());
        Ok(())
    }

    /// Look up a bookmark by name
    pub fn get(&self, name: &str) -> Result<RequestCommand> {
        let doc = self.load()?;
        let entry = self
            .table(&doc)?
            .and_then(|bookmarks| bookmarks.get(name))
            .ok_or_else(|| StoreError::BookmarkNotFound(name.to_string()))?;
        self.decode(name, entry)
    }

    /// Delete a bookmark
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut doc = self.load()?;
        let removed = doc
            .get_mut(BOOKMARKS_TABLE)
            .and_then(Item::as_table_like_mut)
            .and_then(|bookmarks| bookmarks.remove(name));

        if removed.is_none() {
            return Err(StoreError::BookmarkNotFound(name.to_string()).into());
        }

        self.write(&doc)?;
        info!("Removed bookmark '{}'", name);
        Ok(())
    }

    /// All bookmarks, sorted by name
    pub fn list(&self) -> Result<Vec<Bookmark>> {
        let doc = self.load()?;
        let Some(bookmarks) = self.table(&doc)? else {
            return Ok(Vec::new());
        };

        let mut list = bookmarks
            .iter()
            .map(|(name, entry)| {
                Ok(Bookmark {
                    name: name.to_string(),
                    request: self.decode(name, entry)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Parse the file; a missing file is an empty document
    fn load(&self) -> Result<DocumentMut> {
        if !self.path.exists() {
            debug!("Bookmark file {} does not exist yet", self.path.display());
            return Ok(DocumentMut::new());
        }
        let content = fs::read_to_string(&self.path)?;
        content
            .parse::<DocumentMut>()
            .map_err(|e| self.corrupt(e.to_string()).into())
    }

    fn write(&self, doc: &DocumentMut) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, doc.to_string())?;
        Ok(())
    }

    fn table<'a>(&self, doc: &'a DocumentMut) -> Result<Option<&'a dyn TableLike>> {
        match doc.get(BOOKMARKS_TABLE) {
            None => Ok(None),
            Some(item) => item
                .as_table_like()
                .map(Some)
                .ok_or_else(|| self.corrupt("`bookmarks` is not a table").into()),
        }
    }

    fn decode(&self, name: &str, entry: &Item) -> Result<RequestCommand> {
        let fields = entry
            .as_table_like()
            .ok_or_else(|| self.corrupt(format!("bookmark '{name}' is not a table")))?;

        let field = |key: &str| fields.get(key).and_then(Item::as_str);

        let method = field("method")
            .and_then(HttpMethod::parse)
            .ok_or_else(|| self.corrupt(format!("bookmark '{name}' has no valid method")))?;
        let path = field("path")
            .ok_or_else(|| self.corrupt(format!("bookmark '{name}' has no path")))?;
        let body = field("body")
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|e| self.corrupt(format!("bookmark '{name}' body: {e}")))?;

        Ok(RequestCommand::new(method, path, body))
    }

    fn corrupt(&self, reason: impl Into<String>) -> StoreError {
        StoreError::Corrupt {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }
}
