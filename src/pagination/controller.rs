//! Cursor-based pagination over a search service
//!
//! The controller is owned by a single update loop. Fetches run on tokio
//! tasks and report back through the owner's message channel, so all
//! mutation of the [`DocumentSet`] happens on the owning task.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::document_set::DocumentSet;
use crate::browser::Message;
use crate::error::ServiceError;
use crate::search::{Scope, SearchPage, SearchService, ServiceResult};

/// Fetch state of a document set
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    /// Nothing in flight, more hits may be available
    Idle,

    /// A page request is outstanding
    Loading,

    /// Every reported hit is loaded
    Exhausted,

    /// The last fetch failed; loaded hits are untouched
    Error(ServiceError),
}

/// Identifies the reset generation a fetch was issued under
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeTag {
    scope: Scope,
    epoch: u64,
}

impl ScopeTag {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

/// A completed fetch, delivered to the owning loop
#[derive(Debug)]
pub struct PageArrival {
    pub tag: ScopeTag,
    pub result: ServiceResult<SearchPage>,
}

/// What [`PaginationController::on_page_arrived`] did with a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOutcome {
    /// Hits were appended (possibly zero)
    Appended { count: usize },

    /// The fetch failed and the controller is in [`FetchState::Error`]
    Failed,

    /// The page belonged to a superseded scope and was dropped
    Stale,
}

/// Drives one scrollable result set against a [`SearchService`]
pub struct PaginationController {
    documents: DocumentSet,
    state: FetchState,

    /// Bumped on every reset so that in-flight fetches become stale even
    /// when the new scope equals the old one
    epoch: u64,

    service: Arc<dyn SearchService>,
    outbox: UnboundedSender<Message>,
}

impl PaginationController {
    /// Create a controller for `scope` with nothing loaded
    ///
    /// # Arguments
    /// * `service` - Search service used for page fetches
    /// * `outbox` - Channel of the owning loop; page arrivals are sent here
    /// * `scope` - Initial scope
    pub fn new(
        service: Arc<dyn SearchService>,
        outbox: UnboundedSender<Message>,
        scope: Scope,
    ) -> Self {
        Self {
            documents: DocumentSet::new(scope),
            state: FetchState::Idle,
            epoch: 0,
            service,
            outbox,
        }
    }

    /// Start over with a new scope
    ///
    /// Any fetch still in flight is invalidated and its page will be
    /// discarded on arrival.
    pub fn reset(&mut self, scope: Scope) {
        debug!("pagination reset: scope={}", scope);
        self.epoch += 1;
        self.documents.reset(scope);
        self.state = FetchState::Idle;
    }

    /// Request the next page
    ///
    /// Does nothing while a fetch is outstanding or when everything is
    /// loaded. Otherwise the request continues from the current cursor.
    ///
    /// # Returns
    /// * `bool` - True if a request was issued
    pub fn fetch_next(&mut self, page_size: usize) -> bool {
        if self.state == FetchState::Loading || !self.documents.has_more() {
            return false;
        }

        let tag = ScopeTag {
            scope: self.documents.scope().clone(),
            epoch: self.epoch,
        };
        let cursor = self.documents.cursor().clone();
        let service = Arc::clone(&self.service);
        let outbox = self.outbox.clone();

        debug!(
            "fetching page: scope={}, loaded={}, page_size={}",
            tag.scope,
            self.documents.len(),
            page_size
        );
        self.state = FetchState::Loading;

        tokio::spawn(async move {
            let result = service.search(&tag.scope, &cursor, page_size).await;
            // The receiver is gone once the view has closed; nothing to deliver to
            let _ = outbox.send(Message::PageArrived(PageArrival { tag, result }));
        });

        true
    }

    /// Merge a completed fetch
    pub fn on_page_arrived(&mut self, arrival: PageArrival) -> ArrivalOutcome {
        if arrival.tag.epoch != self.epoch || &arrival.tag.scope != self.documents.scope() {
            debug!("discarding stale page for scope={}", arrival.tag.scope);
            return ArrivalOutcome::Stale;
        }

        match arrival.result {
            Err(err) => {
                warn!("page fetch failed: {}", err);
                self.state = FetchState::Error(err);
                ArrivalOutcome::Failed
            }
            Ok(page) => {
                let count = page.hits.len();
                if let Some(previous) = self.documents.total()
                    && previous != page.total
                {
                    debug!("total changed between pages: {} -> {}", previous, page.total);
                }

                self.documents.append(page.hits, page.total);
                self.state = if self.documents.has_more() {
                    FetchState::Idle
                } else {
                    FetchState::Exhausted
                };
                ArrivalOutcome::Appended { count }
            }
        }
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn has_more(&self) -> bool {
        self.documents.has_more()
    }

    /// Error of the last failed fetch, if the controller is in the error state
    pub fn last_error(&self) -> Option<&ServiceError> {
        match &self.state {
            FetchState::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortCursor;
    use crate::search::mock::{ScriptedService, page};
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn setup(
        service: Arc<ScriptedService>,
    ) -> (PaginationController, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = PaginationController::new(service, tx, Scope::new("idx"));
        (controller, rx)
    }

    async fn next_arrival(rx: &mut UnboundedReceiver<Message>) -> PageArrival {
        match rx.recv().await {
            Some(Message::PageArrived(arrival)) => arrival,
            other => panic!("expected a page arrival, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_first_page_then_partial_page() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 100, 450));
        service.push_page(page(100, 50, 450));
        let (mut controller, mut rx) = setup(service.clone());
        controller.reset(Scope::new("scope-x"));

        assert!(controller.fetch_next(100));
        assert!(controller.is_loading());
        let arrival = next_arrival(&mut rx).await;
        assert_eq!(
            controller.on_page_arrived(arrival),
            ArrivalOutcome::Appended { count: 100 }
        );
        assert_eq!(controller.documents().len(), 100);
        assert_eq!(
            controller.documents().cursor(),
            &SortCursor::new(vec![json!(99)])
        );
        assert!(controller.has_more());
        assert_eq!(controller.state(), &FetchState::Idle);

        assert!(controller.fetch_next(100));
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        assert_eq!(controller.documents().len(), 150);
        assert!(controller.has_more());

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].cursor.is_start());
        assert_eq!(calls[0].scope, Scope::new("scope-x"));
        assert_eq!(calls[1].cursor, SortCursor::new(vec![json!(99)]));
        assert_eq!(calls[1].page_size, 100);
    }

    #[tokio::test]
    async fn test_fetch_while_loading_is_noop() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 10, 100));
        let (mut controller, mut rx) = setup(service.clone());

        assert!(controller.fetch_next(10));
        assert!(!controller.fetch_next(10));
        assert!(!controller.fetch_next(10));
        assert!(controller.documents().is_empty());
        assert!(controller.documents().cursor().is_start());

        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_stops_fetching() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 5, 5));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(10);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);

        assert_eq!(controller.state(), &FetchState::Exhausted);
        assert!(!controller.fetch_next(10));
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_recomputes_has_more() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 20, 40));
        service.push_page(page(20, 0, 30));
        service.push_page(page(20, 0, 20));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(20);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        let cursor = controller.documents().cursor().clone();

        controller.fetch_next(20);
        let arrival = next_arrival(&mut rx).await;
        assert_eq!(
            controller.on_page_arrived(arrival),
            ArrivalOutcome::Appended { count: 0 }
        );
        assert_eq!(controller.documents().len(), 20);
        assert_eq!(controller.documents().total(), Some(30));
        assert_eq!(controller.documents().cursor(), &cursor);
        assert!(controller.has_more());

        controller.fetch_next(20);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        assert!(!controller.has_more());
        assert_eq!(controller.state(), &FetchState::Exhausted);
    }

    #[tokio::test]
    async fn test_shrinking_total_trusted_verbatim() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 10, 100));
        service.push_page(page(10, 10, 15));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(10);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        controller.fetch_next(10);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);

        assert_eq!(controller.documents().len(), 20);
        assert_eq!(controller.documents().total(), Some(15));
        assert!(!controller.has_more());
    }

    #[tokio::test]
    async fn test_error_preserves_documents_and_retry_resumes() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 10, 30));
        service.push_page(Err(ServiceError::Timeout));
        service.push_page(page(10, 10, 30));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(10);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        let before = controller.documents().clone();

        controller.fetch_next(10);
        let arrival = next_arrival(&mut rx).await;
        assert_eq!(controller.on_page_arrived(arrival), ArrivalOutcome::Failed);
        assert_eq!(controller.documents(), &before);
        assert_eq!(controller.last_error(), Some(&ServiceError::Timeout));

        assert!(controller.fetch_next(10));
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);
        assert_eq!(controller.documents().len(), 20);
        assert_eq!(controller.last_error(), None);

        let calls = service.calls();
        assert_eq!(calls[1].cursor, calls[2].cursor);
        assert_eq!(calls[2].cursor, SortCursor::new(vec![json!(9)]));
    }

    #[tokio::test]
    async fn test_stale_page_after_reset_is_discarded() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 10, 100));
        service.push_page(page(500, 3, 3));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(10);
        let stale = next_arrival(&mut rx).await;

        controller.reset(Scope::new("other"));
        assert_eq!(controller.on_page_arrived(stale), ArrivalOutcome::Stale);
        assert!(controller.documents().is_empty());
        assert_eq!(controller.state(), &FetchState::Idle);

        controller.fetch_next(10);
        let fresh = next_arrival(&mut rx).await;
        controller.on_page_arrived(fresh);
        assert_eq!(controller.documents().len(), 3);
        assert_eq!(controller.documents().scope(), &Scope::new("other"));
        assert_eq!(
            controller.documents().get(0).map(|h| h.id.as_str()),
            Some("doc-500")
        );
    }

    #[tokio::test]
    async fn test_stale_page_after_reset_to_same_scope() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 10, 100));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(10);
        let stale = next_arrival(&mut rx).await;
        controller.reset(Scope::new("idx"));

        assert_eq!(controller.on_page_arrived(stale), ArrivalOutcome::Stale);
        assert!(controller.documents().is_empty());
    }

    #[tokio::test]
    async fn test_reset_is_idempotent() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 10, 100));
        let (mut controller, mut rx) = setup(service.clone());

        controller.fetch_next(10);
        let arrival = next_arrival(&mut rx).await;
        controller.on_page_arrived(arrival);

        controller.reset(Scope::new("y"));
        let first = (controller.documents().clone(), controller.state().clone());
        controller.reset(Scope::new("y"));
        let second = (controller.documents().clone(), controller.state().clone());

        assert_eq!(first, second);
        assert!(controller.documents().is_empty());
        assert!(controller.has_more());
        assert_eq!(controller.documents().total(), None);
    }
}
