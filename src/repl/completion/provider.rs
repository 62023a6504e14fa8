//! Candidate provider for shell-level completion
//!
//! Supplies command keywords, their subcommands and index names. Index names
//! come from the cluster and are cached for a short time so that completion
//! does not issue a request per keystroke.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::runtime::{Handle, RuntimeFlavor};

use crate::search::SearchService;

/// Trait for providing completion candidates
pub trait CandidateProvider: Send + Sync {
    /// Get index names matching the prefix
    fn indices(&self, prefix: &str) -> Vec<String>;

    /// Get top-level commands matching the prefix
    fn commands(&self, prefix: &str) -> Vec<String>;

    /// Get the subcommands of `command` matching the prefix
    fn subcommands(&self, command: &str, prefix: &str) -> Vec<String>;
}

/// Commands accepted at the start of a line
pub const COMMANDS: &[&str] = &[
    "show", "use", "mapping", "browse", "search", "GET", "POST", "PUT", "DELETE", "HEAD",
    "bookmark", "history", "format", "help", "exit", "quit",
];

/// Commands whose first argument is an index name
pub const INDEX_COMMANDS: &[&str] = &["use", "browse", "mapping"];

/// Cache for index names
struct IndexCache {
    indices: Vec<String>,
    last_fetch: Option<Instant>,
    ttl: Duration,
}

impl IndexCache {
    fn new(ttl: Duration) -> Self {
        Self {
            indices: Vec::new(),
            last_fetch: None,
            ttl,
        }
    }

    fn is_valid(&self) -> bool {
        self.last_fetch
            .is_some_and(|fetched| fetched.elapsed() < self.ttl)
    }

    fn update(&mut self, indices: Vec<String>) {
        self.indices = indices;
        self.last_fetch = Some(Instant::now());
    }
}

/// Candidate provider backed by the search service
pub struct IndexCandidateProvider {
    cache: Arc<RwLock<IndexCache>>,
    service: Option<Arc<dyn SearchService>>,
}

impl IndexCandidateProvider {
    /// Create a new candidate provider
    ///
    /// # Arguments
    /// * `service` - Service used to list indices; `None` offers no index names
    pub fn new(service: Option<Arc<dyn SearchService>>) -> Self {
        Self {
            cache: Arc::new(RwLock::new(IndexCache::new(Duration::from_secs(30)))),
            service,
        }
    }

    /// Get cached index names or fetch them from the cluster
    fn cached_indices(&self) -> Vec<String> {
        {
            let cache = self.cache.read().unwrap();
            if cache.is_valid() {
                return cache.indices.clone();
            }
        }

        let Some(service) = &self.service else {
            return Vec::new();
        };

        // block_in_place needs the multi-threaded runtime
        let indices = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                let service = service.clone();
                tokio::task::block_in_place(|| {
                    handle.block_on(async move {
                        match service.list().await {
                            Ok(list) => list.into_iter().map(|info| info.name).collect(),
                            Err(e) => {
                                tracing::debug!("Index listing for completion failed: {}", e);
                                Vec::new()
                            }
                        }
                    })
                })
            }
            _ => return Vec::new(),
        };

        self.cache.write().unwrap().update(indices.clone());
        indices
    }
}

/// Filter by prefix, then order exact match first, shorter names next, then alphabetically
pub fn filter_by_prefix<S: AsRef<str>>(items: &[S], prefix: &str) -> Vec<String> {
    let mut filtered: Vec<String> = items
        .iter()
        .map(|item| -> &str { item.as_ref() })
        .filter(|item| item.starts_with(prefix))
        .map(str::to_string)
        .collect();

    filtered.sort_by(|a, b| {
        (a != prefix)
            .cmp(&(b != prefix))
            .then(a.len().cmp(&b.len()))
            .then_with(|| a.cmp(b))
    });
    filtered
}

impl CandidateProvider for IndexCandidateProvider {
    fn indices(&self, prefix: &str) -> Vec<String> {
        // Hidden system indices only when asked for explicitly
        let cached = self.cached_indices();
        let visible: Vec<&String> = cached
            .iter()
            .filter(|name| !name.starts_with('.') || prefix.starts_with('.'))
            .collect();
        filter_by_prefix(&visible, prefix)
    }

    fn commands(&self, prefix: &str) -> Vec<String> {
        // Keep declaration order so frequent commands come first
        COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix) || cmd.to_lowercase().starts_with(prefix))
            .map(|cmd| cmd.to_string())
            .collect()
    }

    fn subcommands(&self, command: &str, prefix: &str) -> Vec<String> {
        let subs: &[&str] = match command {
            "show" => &["indices", "collections"],
            "bookmark" => &["list", "save", "run", "rm"],
            "format" => &["json", "json-pretty", "table", "compact"],
            _ => &[],
        };
        filter_by_prefix(subs, prefix)
    }
}
