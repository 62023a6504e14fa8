//! Local persistence: named bookmarks and the request history

mod bookmarks;
mod history;

pub use bookmarks::{Bookmark, BookmarkStore};
pub use history::{HistoryEntry, RequestHistory};

use crate::config::StoreConfig;

/// Both local stores, opened from configuration
#[derive(Debug, Clone)]
pub struct LocalStore {
    pub bookmarks: BookmarkStore,
    pub history: RequestHistory,
}

impl LocalStore {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            bookmarks: BookmarkStore::new(&config.bookmarks_file),
            history: RequestHistory::new(&config.request_history_file),
        }
    }
}
