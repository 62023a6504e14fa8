//! Scripted in-memory search service for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::types::{ClusterInfo, CollectionInfo, Hit, HttpMethod, Scope, SearchPage, SortCursor};
use super::{SearchService, ServiceResult};
use crate::error::ServiceError;

/// A recorded `search` call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub scope: Scope,
    pub cursor: SortCursor,
    pub page_size: usize,
}

/// Answers `search` calls from a queue of scripted pages
#[derive(Default)]
pub struct ScriptedService {
    pages: Mutex<VecDeque<ServiceResult<SearchPage>>>,
    calls: Mutex<Vec<SearchCall>>,
    indices: Vec<String>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(indices: &[&str]) -> Self {
        Self {
            indices: indices.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Queue the result of the next `search` call
    pub fn push_page(&self, page: ServiceResult<SearchPage>) {
        self.pages.lock().unwrap().push_back(page);
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Build `count` hits numbered from `first`, each carrying its number as sort value
pub fn hits(first: usize, count: usize) -> Vec<Hit> {
    (first..first + count)
        .map(|n| Hit {
            id: format!("doc-{n}"),
            index: "test".to_string(),
            source: json!({ "n": n }),
            sort: SortCursor::new(vec![json!(n)]),
        })
        .collect()
}

pub fn page(first: usize, count: usize, total: u64) -> ServiceResult<SearchPage> {
    Ok(SearchPage {
        hits: hits(first, count),
        total,
    })
}

#[async_trait]
impl SearchService for ScriptedService {
    async fn search(
        &self,
        scope: &Scope,
        cursor: &SortCursor,
        page_size: usize,
    ) -> ServiceResult<SearchPage> {
        self.calls.lock().unwrap().push(SearchCall {
            scope: scope.clone(),
            cursor: cursor.clone(),
            page_size,
        });
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted page".to_string())))
    }

    async fn list(&self) -> ServiceResult<Vec<CollectionInfo>> {
        Ok(self
            .indices
            .iter()
            .map(|name| CollectionInfo {
                name: name.clone(),
                health: Some("green".to_string()),
                status: Some("open".to_string()),
                docs_count: Some(0),
                store_size: None,
            })
            .collect())
    }

    async fn mapping(&self, index: &str) -> ServiceResult<Value> {
        Ok(json!({ index: { "mappings": { "properties": { "title": { "type": "text" } } } } }))
    }

    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> ServiceResult<Value> {
        Ok(json!({ "method": method.as_str(), "path": path, "body": body }))
    }

    async fn ping(&self) -> ServiceResult<ClusterInfo> {
        Ok(ClusterInfo {
            cluster_name: "scripted".to_string(),
            version: Some("8.0.0".to_string()),
        })
    }
}
