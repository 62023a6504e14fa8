//! Command router for dispatching commands
//!
//! This module provides the CommandRouter which runs each parsed command
//! against the execution context:
//! - Admin commands → index listing, selection and mappings
//! - Search commands → `_search` requests or the result browser
//! - Console requests and bookmarks → the search service, recorded in history

use std::time::Instant;
use tracing::{debug, warn};

use crate::browser;
use crate::config::OutputFormat;
use crate::error::{ExecutionError, Result, ServiceError, StoreError};
use crate::parser::{
    AdminCommand, BookmarkCommand, Command, ConfigCommand, RequestCommand, SearchCommand,
};
use crate::search::{HttpMethod, Scope, mapping_fields, parse_search_response};
use crate::store::HistoryEntry;

use super::context::ExecutionContext;
use super::progress::RequestSpinner;
use super::result::{ExecutionResult, ExecutionStats, ResultData};

/// Default number of entries shown by `history`
const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Command router that dispatches commands to the search service and stores
pub struct CommandRouter {
    /// Execution context
    context: ExecutionContext,

    /// Show a spinner while requests run
    show_progress: bool,
}

impl CommandRouter {
    /// Create a new command router
    ///
    /// # Arguments
    /// * `context` - Execution context
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            show_progress: true,
        }
    }

    /// Route command to appropriate handler
    ///
    /// # Arguments
    /// * `command` - Parsed command
    ///
    /// # Returns
    /// * `Result<ExecutionResult>` - Execution result or error
    pub async fn route(&self, command: Command) -> Result<ExecutionResult> {
        debug!("Routing command: {:?}", command);

        let start = Instant::now();

        let result = match command {
            Command::Admin(admin_cmd) => self.execute_admin(admin_cmd).await,
            Command::Search(search_cmd) => self.execute_search(search_cmd).await,
            Command::Request(request) => self.execute_request(request).await,
            Command::Bookmark(bookmark_cmd) => self.execute_bookmark(bookmark_cmd).await,
            Command::Config(config_cmd) => self.execute_config(config_cmd),
            Command::History(limit) => self.execute_history(limit),
            Command::Help(topic) => Ok(self.execute_help(topic)),
            Command::Exit => Ok(ExecutionResult::message("Exiting...")),
        };

        let elapsed = start.elapsed().as_millis() as u64;
        debug!("Command executed in {}ms", elapsed);

        result.map(|mut result| {
            result.stats.execution_time_ms = elapsed;
            result
        })
    }

    async fn execute_admin(&self, cmd: AdminCommand) -> Result<ExecutionResult> {
        let service = self.context.service();
        match cmd {
            AdminCommand::ShowIndices => {
                let indices = self.cancellable(service.list()).await?;
                let stats = ExecutionStats {
                    documents_returned: indices.len(),
                    ..ExecutionStats::default()
                };
                Ok(ExecutionResult::success(ResultData::Indices(indices), stats))
            }
            AdminCommand::UseIndex(index) => {
                self.context.shared_state.set_index(index.clone());
                Ok(ExecutionResult::message(format!("switched to index {}", index)))
            }
            AdminCommand::Mapping(index) => {
                let index = self.resolve_index(index)?;
                let mapping = self.cancellable(service.mapping(&index)).await?;
                let fields = mapping_fields(&mapping);
                let stats = ExecutionStats {
                    documents_returned: fields.len(),
                    ..ExecutionStats::default()
                };
                Ok(ExecutionResult::success(
                    ResultData::Mapping { index, fields },
                    stats,
                ))
            }
        }
    }

    async fn execute_search(&self, cmd: SearchCommand) -> Result<ExecutionResult> {
        match cmd {
            SearchCommand::Query { body } => {
                let index = self.resolve_index(None)?;
                let request =
                    RequestCommand::new(HttpMethod::Post, format!("{}/_search", index), body);
                self.execute_request(request).await
            }
            SearchCommand::Browse { index, query } => {
                let index = self.resolve_index(index)?;
                let scope = match query {
                    Some(query) => Scope::from_request_json(index, query),
                    None => Scope::new(index),
                };
                browser::run(self.context.service(), scope, self.context.search_config()).await?;
                Ok(ExecutionResult::success(ResultData::None, ExecutionStats::default()))
            }
        }
    }

    /// Run a console request, record it and decode search responses
    async fn execute_request(&self, request: RequestCommand) -> Result<ExecutionResult> {
        let service = self.context.service();
        let outcome = {
            let _spinner = RequestSpinner::start(
                format!("{} {}", request.method, request.path),
                self.show_progress,
            );
            self.cancellable(service.request(request.method, &request.path, request.body.as_ref()))
                .await
        };

        let status = match &outcome {
            Ok(_) => "ok".to_string(),
            Err(e) => e.to_string(),
        };
        let entry = HistoryEntry::new(&request, status);
        if let Err(e) = self.context.store().history.append(&entry) {
            warn!("Failed to record request history: {}", e);
        }
        let is_search = is_search_path(&request.path);
        self.context.set_last_request(request).await;

        let raw = outcome?;
        if is_search && let Ok(page) = parse_search_response(&raw) {
            let stats = ExecutionStats {
                documents_returned: page.hits.len(),
                total_hits: Some(page.total),
                ..ExecutionStats::default()
            };
            return Ok(ExecutionResult::success(ResultData::Search { page, raw }, stats));
        }
        Ok(ExecutionResult::success(ResultData::Json(raw), ExecutionStats::default()))
    }

    async fn execute_bookmark(&self, cmd: BookmarkCommand) -> Result<ExecutionResult> {
        let bookmarks = &self.context.store().bookmarks;
        match cmd {
            BookmarkCommand::Save(name) => {
                let request = self
                    .context
                    .get_last_request()
                    .await
                    .ok_or(StoreError::NothingToSave)?;
                bookmarks.save(&name, &request)?;
                Ok(ExecutionResult::message(format!(
                    "saved bookmark {}: {} {}",
                    name, request.method, request.path
                )))
            }
            BookmarkCommand::Run(name) => {
                let request = bookmarks.get(&name)?;
                debug!("Running bookmark '{}': {} {}", name, request.method, request.path);
                self.execute_request(request).await
            }
            BookmarkCommand::Remove(name) => {
                bookmarks.remove(&name)?;
                Ok(ExecutionResult::message(format!("removed bookmark {}", name)))
            }
            BookmarkCommand::List => {
                let list = bookmarks.list()?;
                let stats = ExecutionStats {
                    documents_returned: list.len(),
                    ..ExecutionStats::default()
                };
                Ok(ExecutionResult::success(ResultData::Bookmarks(list), stats))
            }
        }
    }

    fn execute_history(&self, limit: Option<usize>) -> Result<ExecutionResult> {
        let entries = self
            .context
            .store()
            .history
            .recent(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))?;
        let stats = ExecutionStats {
            documents_returned: entries.len(),
            ..ExecutionStats::default()
        };
        Ok(ExecutionResult::success(ResultData::History(entries), stats))
    }

    /// Execute configuration command
    fn execute_config(&self, cmd: ConfigCommand) -> Result<ExecutionResult> {
        let shared_state = &self.context.shared_state;
        let message = match cmd {
            ConfigCommand::SetFormat(format) => {
                shared_state.set_format(format);
                format!("Output format set to: {}", format_name(format))
            }
            ConfigCommand::GetFormat => {
                format!("Current output format: {}", format_name(shared_state.get_format()))
            }
        };
        Ok(ExecutionResult::message(message))
    }

    /// Execute help command
    ///
    /// # Arguments
    /// * `topic` - Optional help topic
    fn execute_help(&self, topic: Option<String>) -> ExecutionResult {
        let help_text = match topic.as_deref() {
            Some("browse") => r#"browse [index] [query]

Opens a scrollable view over every hit of the query, loading further pages
as you scroll. The query is either a query clause ({"term": {...}}) or a
request body with "query" and "sort".

Keys:
  Up/Down, j/k        Move one row
  PgUp/PgDn           Move one screen
  g/G, Home/End       First/last loaded row
  /                   Edit the filter (Tab completes, Enter applies, Esc cancels)
  r                   Retry after a failed page
  q, Esc              Leave the browser"#
                .to_string(),
            Some("bookmark") | Some("bookmarks") => r#"bookmark list             - List saved requests
bookmark save <name>      - Save the last console request
bookmark run <name>       - Execute a saved request
bookmark rm <name>        - Delete a saved request"#
                .to_string(),
            Some(other) => format!("No help for '{}'. Type 'help' for a list of commands.", other),
            None => r#"Search Shell Commands:

Cluster Operations:
  show indices                      - List indices with health and size
  use <index>                       - Select the index later commands default to
  mapping [index]                   - Show field names and types

Searching:
  search [body]                     - POST <index>/_search with a JSON body
  browse [index] [query]            - Scroll through all hits (help browse)

Console Requests:
  GET|POST|PUT|DELETE|HEAD <path> [body]

Saved Requests:
  bookmark list|save|run|rm <name>  - Manage bookmarks (help bookmark)
  history [n]                       - Show the last n requests

Settings:
  format [json|json-pretty|table|compact]

Other:
  help [topic]                      - Show help
  exit, quit                        - Exit shell

Press Tab inside a JSON body to complete query keys."#
                .to_string(),
        };

        ExecutionResult::message(help_text)
    }

    /// The given index, or the selected one
    fn resolve_index(&self, index: Option<String>) -> Result<String> {
        index
            .or_else(|| self.context.shared_state.get_index())
            .ok_or_else(|| ExecutionError::NoIndexSelected.into())
    }

    /// Race a service call against Ctrl+C
    async fn cancellable<T>(
        &self,
        call: impl Future<Output = std::result::Result<T, ServiceError>>,
    ) -> std::result::Result<T, ServiceError> {
        let cancel_token = self.context.get_cancel_token();
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                debug!("Command cancelled by user");
                Err(ServiceError::Cancelled)
            }
            result = call => result,
        }
    }
}

/// `_search` endpoint, with or without an index and query string
fn is_search_path(path: &str) -> bool {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    let path = path.trim_end_matches('/');
    path == "_search" || path.ends_with("/_search")
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::JsonPretty => "json-pretty",
        OutputFormat::Table => "table",
        OutputFormat::Compact => "compact",
    }
}
