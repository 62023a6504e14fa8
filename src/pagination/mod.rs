//! Streaming a server-paged result set into a scrollable view
//!
//! - **DocumentSet**: hits loaded so far, the continuation cursor and the
//!   server-reported total
//! - **PaginationController**: single-flight fetching with scope tagging, so
//!   pages from a superseded scope are dropped instead of merged
//!
//! Pagination is not snapshot-consistent: the collection may change between
//! pages, and a retried fetch resumes from the last successful cursor, which
//! can skip or repeat documents under concurrent writes.

mod controller;
mod document_set;

pub use controller::{ArrivalOutcome, FetchState, PageArrival, PaginationController, ScopeTag};
pub use document_set::DocumentSet;
