//! Search service abstraction
//!
//! The rest of the crate talks to the cluster only through [`SearchService`].
//! [`HttpSearchService`] implements it over the cluster's REST API; tests
//! substitute a scripted in-memory service.

mod http;
#[cfg(test)]
pub(crate) mod mock;
mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;

pub use http::{
    HttpSearchService, build_search_body, mapping_fields, parse_cat_indices, parse_search_response,
};
pub use types::{ClusterInfo, CollectionInfo, Hit, HttpMethod, Scope, SearchPage, SortCursor};

/// Result of a search service call
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Operations the shell needs from a search cluster
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Fetch the page following `cursor` for the given scope
    ///
    /// # Arguments
    /// * `scope` - Index and filter being browsed
    /// * `cursor` - Sort values of the last seen hit (empty for the first page)
    /// * `page_size` - Maximum number of hits to return
    async fn search(
        &self,
        scope: &Scope,
        cursor: &SortCursor,
        page_size: usize,
    ) -> ServiceResult<SearchPage>;

    /// List collections (indices) with their metadata
    async fn list(&self) -> ServiceResult<Vec<CollectionInfo>>;

    /// Fetch the raw mapping of an index
    async fn mapping(&self, index: &str) -> ServiceResult<Value>;

    /// Send an arbitrary request, as typed in the console
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> ServiceResult<Value>;

    /// Check connectivity and identify the cluster
    async fn ping(&self) -> ServiceResult<ClusterInfo>;
}
