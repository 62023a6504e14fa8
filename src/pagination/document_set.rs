use crate::search::{Hit, Scope, SortCursor};

/// Ordered hits loaded so far for one scope
///
/// Only [`PaginationController`](super::PaginationController) mutates a
/// document set. It grows by appending pages and shrinks only through
/// [`DocumentSet::reset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSet {
    /// Hits in arrival order
    hits: Vec<Hit>,

    /// Total reported with the most recent page; `None` until one arrives
    total: Option<u64>,

    /// Sort values of the last appended hit
    cursor: SortCursor,

    /// Collection and filter this set belongs to
    scope: Scope,
}

impl DocumentSet {
    /// Create an empty set for a scope
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Drop all hits, the cursor and the total, and switch to `scope`
    pub fn reset(&mut self, scope: Scope) {
        self.hits.clear();
        self.total = None;
        self.cursor = SortCursor::start();
        self.scope = scope;
    }

    /// Append a page in server order
    ///
    /// `total` replaces the previous total verbatim. The cursor moves to the
    /// last appended hit and stays put when the page is empty.
    pub fn append(&mut self, hits: Vec<Hit>, total: u64) {
        if let Some(last) = hits.last() {
            self.cursor = last.sort.clone();
        }
        self.hits.extend(hits);
        self.total = Some(total);
    }

    /// Whether the server reported more hits than are loaded
    ///
    /// Unknown totals (nothing fetched yet) count as "more".
    pub fn has_more(&self) -> bool {
        self.total.is_none_or(|total| (self.hits.len() as u64) < total)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Hit> {
        self.hits.get(index)
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn cursor(&self) -> &SortCursor {
        &self.cursor
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
