//! Execution context management
//!
//! This module provides the ExecutionContext which maintains state across
//! command executions: the search service, the local store and the last
//! console request (the one `bookmark save` stores).

use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::Result;
use crate::parser::{Command, RequestCommand};
use crate::repl::SharedState;
use crate::search::SearchService;
use crate::store::LocalStore;

use super::result::ExecutionResult;
use super::router::CommandRouter;

/// Execution context that maintains state across commands
#[derive(Clone)]
pub struct ExecutionContext {
    /// Cluster access
    service: Arc<dyn SearchService>,

    /// Shared state with REPL
    pub(crate) shared_state: SharedState,

    /// Bookmarks and request history
    store: LocalStore,

    /// Paging settings for the result browser
    search: SearchConfig,

    /// Most recent console request
    last_request: Arc<RwLock<Option<RequestCommand>>>,

    /// Cancelled by Ctrl+C while a command runs
    cancel_token: CancellationToken,
}

impl ExecutionContext {
    /// Create a new execution context
    ///
    /// # Arguments
    /// * `service` - Search service used by every command
    /// * `shared_state` - Shared state with REPL
    /// * `store` - Bookmark and history store
    /// * `search` - Result browser settings
    ///
    /// # Returns
    /// * `Self` - New execution context
    pub fn new(
        service: Arc<dyn SearchService>,
        shared_state: SharedState,
        store: LocalStore,
        search: SearchConfig,
    ) -> Self {
        Self {
            service,
            shared_state,
            store,
            search,
            last_request: Arc::new(RwLock::new(None)),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Execute a parsed command
    ///
    /// # Arguments
    /// * `command` - Parsed command
    ///
    /// # Returns
    /// * `Result<ExecutionResult>` - Execution result or error
    pub async fn execute(&self, command: Command) -> Result<ExecutionResult> {
        CommandRouter::new(self.clone()).route(command).await
    }

    pub fn service(&self) -> Arc<dyn SearchService> {
        self.service.clone()
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Remember the request `bookmark save` will store
    pub async fn set_last_request(&self, request: RequestCommand) {
        *self.last_request.write().await = Some(request);
    }

    pub async fn get_last_request(&self) -> Option<RequestCommand> {
        self.last_request.read().await.clone()
    }

    /// Replace the cancellation token before running the next command
    pub fn reset_cancel_token(&mut self) {
        self.cancel_token = CancellationToken::new();
    }

    pub fn get_cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::search::HttpMethod;
    use crate::search::mock::ScriptedService;

    fn create_context() -> ExecutionContext {
        let dir = std::env::temp_dir().join(format!("searchsh-test-{}", uuid::Uuid::new_v4()));
        let store = LocalStore::from_config(&StoreConfig {
            bookmarks_file: dir.join("bookmarks.toml"),
            request_history_file: dir.join("requests.jsonl"),
        });
        ExecutionContext::new(
            Arc::new(ScriptedService::new()),
            SharedState::new(None),
            store,
            SearchConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_last_request_shared_between_clones() {
        let context = create_context();
        let clone = context.clone();
        assert!(context.get_last_request().await.is_none());

        let request = RequestCommand::new(HttpMethod::Get, "/_cat/health", None);
        clone.set_last_request(request.clone()).await;
        assert_eq!(context.get_last_request().await, Some(request));
    }

    #[test]
    fn test_execute_routes_command() {
        let context = create_context();
        let result = tokio_test::block_on(context.execute(Command::Help(None))).unwrap();
        assert!(result.success);
        assert!(matches!(result.data, crate::executor::ResultData::Message(_)));
    }

    #[test]
    fn test_reset_cancel_token() {
        let mut context = create_context();
        let token = context.get_cancel_token();
        token.cancel();
        assert!(context.get_cancel_token().is_cancelled());

        context.reset_cancel_token();
        assert!(!context.get_cancel_token().is_cancelled());
    }
}
