//! State of the result browser and its message dispatcher
//!
//! [`BrowserView::update`] is the only place where browser state changes.
//! Rendering reads the view and never mutates it.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde_json::{Map, Value};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::message::Message;
use crate::pagination::{ArrivalOutcome, FetchState, PageArrival, PaginationController};
use crate::repl::completion::{
    CompletionEngine, CompletionPair, Context, IndexCandidateProvider, track,
};
use crate::search::{Hit, Scope};

use std::sync::Arc;

/// Rows taken by the status and filter lines
pub const CHROME_ROWS: usize = 2;

/// Whether the view should ask for the next page
///
/// True when `position` is within `lookahead` rows of the last loaded hit
/// (row `loaded - 1`), and always while nothing is loaded.
pub fn should_prefetch(position: usize, loaded: usize, lookahead: usize) -> bool {
    position.saturating_add(lookahead).saturating_add(1) >= loaded
}

/// Line editor for the filter, with live structural context
#[derive(Debug)]
pub struct FilterEditor {
    text: String,

    /// Byte offset, always on a char boundary
    cursor: usize,

    context: Context,
    suggestions: Vec<CompletionPair>,
}

impl FilterEditor {
    fn new(text: String) -> Self {
        let cursor = text.len();
        let context = track(&text, cursor);
        Self {
            text,
            cursor,
            context,
            suggestions: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn suggestions(&self) -> &[CompletionPair] {
        &self.suggestions
    }

    fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.text.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    fn left(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    fn right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn replace(&mut self, start: usize, replacement: &str) {
        self.text.replace_range(start..self.cursor, replacement);
        self.cursor = start + replacement.len();
    }
}

/// Scrollable view over one paginated result set
pub struct BrowserView {
    controller: PaginationController,
    outbox: UnboundedSender<Message>,
    completion: CompletionEngine,

    page_size: usize,
    lookahead: usize,

    /// Selected row, an index into the loaded hits
    selected: usize,

    /// First visible row
    offset: usize,

    /// Rows available for hits
    height: usize,

    filter: Option<FilterEditor>,
    notice: Option<String>,
    quit: bool,
}

impl BrowserView {
    /// Create a view around a controller
    ///
    /// # Arguments
    /// * `controller` - Controller for the initial scope
    /// * `outbox` - Channel the update loop reads; used for context recomputation
    /// * `page_size` - Hits per page request
    /// * `lookahead` - Prefetch distance in rows
    /// * `terminal_rows` - Terminal height
    pub fn new(
        controller: PaginationController,
        outbox: UnboundedSender<Message>,
        page_size: usize,
        lookahead: usize,
        terminal_rows: u16,
    ) -> Self {
        Self {
            controller,
            outbox,
            completion: CompletionEngine::new(Arc::new(IndexCandidateProvider::new(None))),
            page_size,
            lookahead,
            selected: 0,
            offset: 0,
            height: list_height(terminal_rows),
            filter: None,
            notice: None,
            quit: false,
        }
    }

    /// Issue the first page request
    pub fn start(&mut self) {
        self.maybe_prefetch();
    }

    /// Dispatch one message
    pub fn update(&mut self, message: Message) {
        match message {
            Message::PageArrived(arrival) => self.on_page_arrived(arrival),
            Message::RecomputeContext { text, cursor } => self.recompute_context(&text, cursor),
            Message::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if self.filter.is_some() {
                    self.on_filter_key(key);
                } else {
                    self.on_browse_key(key);
                }
            }
            Message::Terminal(Event::Resize(_, rows)) => {
                self.height = list_height(rows);
                self.scroll_to_selection();
            }
            Message::Terminal(_) => {}
        }
    }

    fn on_page_arrived(&mut self, arrival: PageArrival) {
        match self.controller.on_page_arrived(arrival) {
            // An empty page does not chain another request
            ArrivalOutcome::Appended { count } if count > 0 => self.maybe_prefetch(),
            ArrivalOutcome::Appended { .. } | ArrivalOutcome::Stale => {}
            ArrivalOutcome::Failed => self.notice = Some("press r to retry".to_string()),
        }
    }

    fn recompute_context(&mut self, text: &str, cursor: usize) {
        let Some(filter) = self.filter.as_mut() else {
            return;
        };
        // Only the latest edit matters
        if filter.text != text || filter.cursor != cursor {
            return;
        }
        filter.context = track(text, cursor);
        filter.suggestions = if filter.context.depth > 0 {
            self.completion.complete(text, cursor).1
        } else {
            Vec::new()
        };
    }

    fn on_browse_key(&mut self, key: KeyEvent) {
        self.notice = None;
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::PageUp => self.select(self.selected.saturating_sub(self.height)),
            KeyCode::PageDown => self.select(self.selected + self.height),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            KeyCode::Char('r') => {
                if matches!(self.controller.state(), FetchState::Error(_)) {
                    self.controller.fetch_next(self.page_size);
                }
            }
            KeyCode::Char('/') => {
                let text = filter_text(self.controller.documents().scope());
                self.filter = Some(FilterEditor::new(text));
                self.request_context();
            }
            _ => {}
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        let Some(filter) = self.filter.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.filter = None;
                return;
            }
            KeyCode::Enter => {
                self.apply_filter();
                return;
            }
            KeyCode::Tab => {
                // Outside the body there is nothing but shell keywords
                if track(&filter.text, filter.cursor).depth == 0 {
                    return;
                }
                let (start, pairs) = self.completion.complete(&filter.text, filter.cursor);
                match pairs.first() {
                    Some(pair) => filter.replace(start, &pair.replacement),
                    None => return,
                }
            }
            KeyCode::Backspace => filter.backspace(),
            KeyCode::Delete => filter.delete(),
            KeyCode::Left => filter.left(),
            KeyCode::Right => filter.right(),
            KeyCode::Home => filter.cursor = 0,
            KeyCode::End => filter.cursor = filter.text.len(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => filter.insert(c),
            _ => return,
        }
        self.request_context();
    }

    /// Queue a context recomputation for the current filter text
    fn request_context(&self) {
        if let Some(filter) = &self.filter {
            // The loop owns the receiver for as long as the view exists
            let _ = self.outbox.send(Message::RecomputeContext {
                text: filter.text.clone(),
                cursor: filter.cursor,
            });
        }
    }

    fn apply_filter(&mut self) {
        let Some(filter) = &self.filter else {
            return;
        };
        let index = self.controller.documents().scope().index.clone();
        let scope = if filter.text.trim().is_empty() {
            Scope::new(index)
        } else {
            match serde_json::from_str::<Value>(&filter.text) {
                Ok(json) => Scope::from_request_json(index, json),
                Err(e) => {
                    self.notice = Some(format!("invalid filter: {}", e));
                    return;
                }
            }
        };

        debug!("applying filter: {}", scope);
        self.filter = None;
        self.notice = None;
        self.selected = 0;
        self.offset = 0;
        self.controller.reset(scope);
        self.maybe_prefetch();
    }

    /// Move the selection, clamped to the loaded hits
    fn select(&mut self, target: usize) {
        let loaded = self.controller.documents().len();
        self.selected = target.min(loaded.saturating_sub(1));
        self.scroll_to_selection();
        self.maybe_prefetch();
    }

    fn scroll_to_selection(&mut self) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + self.height {
            self.offset = self.selected + 1 - self.height;
        }
    }

    fn maybe_prefetch(&mut self) {
        // Failed fetches are retried on request only
        if matches!(self.controller.state(), FetchState::Error(_)) {
            return;
        }
        let loaded = self.controller.documents().len();
        if should_prefetch(self.selected, loaded, self.lookahead) {
            self.controller.fetch_next(self.page_size);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    pub fn filter(&self) -> Option<&FilterEditor> {
        self.filter.as_ref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Hits on screen, with their absolute row numbers
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &Hit)> {
        self.controller
            .documents()
            .hits()
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.height)
    }

    /// Text of the bottom status line
    pub fn status_line(&self) -> String {
        let documents = self.controller.documents();
        let total = documents
            .total()
            .map_or_else(|| "?".to_string(), |t| t.to_string());
        let state = match self.controller.state() {
            FetchState::Idle => "idle".to_string(),
            FetchState::Loading => "loading".to_string(),
            FetchState::Exhausted => "end".to_string(),
            FetchState::Error(e) => format!("error: {}", e),
        };

        let mut line = format!(
            " {} | {}/{} | {}",
            documents.scope(),
            documents.len(),
            total,
            state
        );
        if let Some(notice) = &self.notice {
            line.push_str(" | ");
            line.push_str(notice);
        }
        line
    }

    /// Text of the line above the status line
    ///
    /// Shows the filter being edited together with the key path at its
    /// cursor and the first suggestions, or the key help otherwise.
    pub fn hint_line(&self) -> String {
        let Some(filter) = &self.filter else {
            return " j/k move  PgUp/PgDn page  g/G top/bottom  / filter  r retry  q quit"
                .to_string();
        };

        let context = &filter.context;
        let position = if context.in_key {
            "key"
        } else if context.in_value {
            "value"
        } else {
            "string"
        };
        let suggestions: Vec<&str> = filter
            .suggestions
            .iter()
            .take(6)
            .map(|pair| pair.display.as_str())
            .collect();
        format!(
            " [{}] {} | {}",
            context.path.join("."),
            position,
            suggestions.join(" ")
        )
    }
}

fn list_height(terminal_rows: u16) -> usize {
    (terminal_rows as usize).saturating_sub(CHROME_ROWS).max(1)
}

/// Editable text for the current scope's query and sort
fn filter_text(scope: &Scope) -> String {
    match (&scope.query, &scope.sort) {
        (None, None) => String::new(),
        (Some(query), None) => query.to_string(),
        (query, Some(sort)) => {
            let mut body = Map::new();
            if let Some(query) = query {
                body.insert("query".to_string(), query.clone());
            }
            body.insert("sort".to_string(), sort.clone());
            Value::Object(body).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::mock::{ScriptedService, page};
    use crate::search::{SearchService, SortCursor};
    use serde_json::json;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn key(code: KeyCode) -> Message {
        Message::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn setup(
        service: Arc<ScriptedService>,
        page_size: usize,
        lookahead: usize,
    ) -> (BrowserView, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let service: Arc<dyn SearchService> = service;
        let controller = PaginationController::new(service, tx.clone(), Scope::new("logs"));
        // 10 terminal rows leave 8 for hits
        (BrowserView::new(controller, tx, page_size, lookahead, 10), rx)
    }

    async fn pump(view: &mut BrowserView, rx: &mut UnboundedReceiver<Message>) {
        let message = rx.recv().await.expect("channel open");
        view.update(message);
    }

    #[test]
    fn test_should_prefetch() {
        assert!(should_prefetch(0, 0, 10));
        assert!(!should_prefetch(0, 50, 10));
        assert!(!should_prefetch(38, 50, 10));
        assert!(should_prefetch(39, 50, 10));
        assert!(!should_prefetch(48, 50, 0));
        assert!(should_prefetch(49, 50, 0));
        assert!(should_prefetch(usize::MAX, 50, 10));
    }

    #[test]
    fn test_filter_text_for_scope() {
        assert_eq!(filter_text(&Scope::new("logs")), "");

        let scope = Scope::new("logs").with_query(json!({"term": {"a": 1}}));
        assert_eq!(filter_text(&scope), r#"{"term":{"a":1}}"#);

        let mut scope = Scope::new("logs");
        scope.sort = Some(json!([{"ts": "desc"}]));
        assert_eq!(filter_text(&scope), r#"{"sort":[{"ts":"desc"}]}"#);
    }

    #[test]
    fn test_filter_editor_multibyte() {
        let mut editor = FilterEditor::new("aé".to_string());
        editor.left();
        assert_eq!(editor.cursor(), 1);
        editor.insert('ß');
        assert_eq!(editor.text(), "aßé");
        editor.right();
        editor.backspace();
        assert_eq!(editor.text(), "aß");
        editor.cursor = 0;
        editor.delete();
        assert_eq!(editor.text(), "ß");
    }

    #[tokio::test]
    async fn test_start_loads_first_page() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 20, 100));
        let (mut view, mut rx) = setup(service.clone(), 20, 5);

        view.start();
        assert!(view.controller().is_loading());
        pump(&mut view, &mut rx).await;

        assert_eq!(view.controller().documents().len(), 20);
        assert_eq!(view.visible_rows().count(), 8);
        assert_eq!(service.calls().len(), 1);
        assert!(view.status_line().contains("20/100"));
    }

    #[tokio::test]
    async fn test_scrolling_near_end_prefetches_once() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 20, 100));
        service.push_page(page(20, 20, 100));
        let (mut view, mut rx) = setup(service.clone(), 20, 5);

        view.start();
        pump(&mut view, &mut rx).await;

        for _ in 0..13 {
            view.update(key(KeyCode::Down));
        }
        assert_eq!(service.calls().len(), 1);
        assert!(!view.controller().is_loading());

        // Row 14 is within 5 of the last loaded row
        view.update(key(KeyCode::Down));
        assert!(view.controller().is_loading());
        for _ in 0..5 {
            view.update(key(KeyCode::Char('j')));
        }
        assert_eq!(view.selected(), 19);

        pump(&mut view, &mut rx).await;
        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].cursor, SortCursor::new(vec![json!(19)]));
        assert_eq!(view.controller().documents().len(), 40);
    }

    #[tokio::test]
    async fn test_small_pages_chain_until_lookahead_satisfied() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 3, 100));
        service.push_page(page(3, 3, 100));
        let (mut view, mut rx) = setup(service.clone(), 3, 4);

        view.start();
        pump(&mut view, &mut rx).await;
        // Row 0 is within 4 of row 2 so the next page is requested right away
        assert!(view.controller().is_loading());
        pump(&mut view, &mut rx).await;
        assert_eq!(view.controller().documents().len(), 6);
        assert_eq!(service.calls().len(), 2);
        assert!(!view.controller().is_loading());
    }

    #[tokio::test]
    async fn test_empty_page_does_not_chain() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 0, 30));
        let (mut view, mut rx) = setup(service.clone(), 20, 5);

        view.start();
        pump(&mut view, &mut rx).await;

        assert!(view.controller().has_more());
        assert!(!view.controller().is_loading());
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_error_needs_explicit_retry() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(Err(crate::error::ServiceError::Timeout));
        service.push_page(page(0, 5, 5));
        let (mut view, mut rx) = setup(service.clone(), 20, 5);

        view.start();
        pump(&mut view, &mut rx).await;
        assert!(view.status_line().contains("error"));

        view.update(key(KeyCode::Down));
        assert_eq!(service.calls().len(), 1);

        view.update(key(KeyCode::Char('r')));
        pump(&mut view, &mut rx).await;
        assert_eq!(service.calls().len(), 2);
        assert_eq!(view.controller().documents().len(), 5);
        assert_eq!(view.controller().state(), &FetchState::Exhausted);
    }

    #[tokio::test]
    async fn test_filter_edit_recomputes_context() {
        let service = Arc::new(ScriptedService::new());
        let (mut view, mut rx) = setup(service, 20, 5);

        view.update(key(KeyCode::Char('/')));
        pump(&mut view, &mut rx).await;
        for c in r#"{"match":{"#.chars() {
            view.update(key(KeyCode::Char(c)));
        }
        // Only the last queued recomputation applies
        while let Ok(message) = rx.try_recv() {
            view.update(message);
        }

        let filter = view.filter().unwrap();
        assert_eq!(filter.context().path, vec!["match"]);
        assert!(filter.context().in_key);
        assert!(view.hint_line().starts_with(" [match] key"));
    }

    #[tokio::test]
    async fn test_filter_tab_accepts_first_suggestion() {
        let service = Arc::new(ScriptedService::new());
        let (mut view, _rx) = setup(service, 20, 5);

        view.update(key(KeyCode::Char('/')));
        for c in r#"{"query":{"ma"#.chars() {
            view.update(key(KeyCode::Char(c)));
        }
        view.update(key(KeyCode::Tab));
        assert_eq!(view.filter().unwrap().text(), r#"{"query":{"match": "#);
    }

    #[tokio::test]
    async fn test_filter_tab_outside_body_is_ignored() {
        let service = Arc::new(ScriptedService::new());
        let (mut view, _rx) = setup(service, 20, 5);

        view.update(key(KeyCode::Char('/')));
        for c in "ma".chars() {
            view.update(key(KeyCode::Char(c)));
        }
        view.update(key(KeyCode::Tab));
        assert_eq!(view.filter().unwrap().text(), "ma");
    }

    #[tokio::test]
    async fn test_zero_lookahead_fetches_at_last_row() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 5, 100));
        service.push_page(page(5, 5, 100));
        let (mut view, mut rx) = setup(service.clone(), 5, 0);

        view.start();
        pump(&mut view, &mut rx).await;
        for _ in 0..3 {
            view.update(key(KeyCode::Down));
        }
        assert!(!view.controller().is_loading());

        view.update(key(KeyCode::Char('G')));
        assert_eq!(view.selected(), 4);
        assert!(view.controller().is_loading());
        pump(&mut view, &mut rx).await;
        assert_eq!(service.calls().len(), 2);
        assert_eq!(view.controller().documents().len(), 10);
    }

    #[tokio::test]
    async fn test_apply_filter_resets_and_drops_stale_page() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(page(0, 20, 100));
        service.push_page(page(500, 2, 2));
        let (mut view, mut rx) = setup(service.clone(), 20, 5);

        view.start();
        view.update(key(KeyCode::Char('/')));
        for c in r#"{"term":{"level":"error"}}"#.chars() {
            view.update(key(KeyCode::Char(c)));
        }
        view.update(key(KeyCode::Enter));
        assert!(view.filter().is_none());

        let expected = Scope::new("logs").with_query(json!({"term": {"level": "error"}}));
        assert_eq!(view.controller().documents().scope(), &expected);

        // Drain until both pages have been delivered; the first is stale
        let mut arrivals = 0;
        while arrivals < 2 {
            let message = rx.recv().await.unwrap();
            if matches!(message, Message::PageArrived(_)) {
                arrivals += 1;
            }
            view.update(message);
        }

        let documents = view.controller().documents();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents.get(0).map(|h| h.id.as_str()), Some("doc-500"));
        assert_eq!(service.calls()[1].scope, expected);
    }

    #[tokio::test]
    async fn test_invalid_filter_stays_in_edit_mode() {
        let service = Arc::new(ScriptedService::new());
        let (mut view, _rx) = setup(service.clone(), 20, 5);

        view.update(key(KeyCode::Char('/')));
        view.update(key(KeyCode::Char('{')));
        view.update(key(KeyCode::Enter));

        assert!(view.filter().is_some());
        assert!(view.status_line().contains("invalid filter"));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let service = Arc::new(ScriptedService::new());
        let (mut view, _rx) = setup(service, 20, 5);
        view.update(key(KeyCode::Char('/')));
        view.update(key(KeyCode::Char('q')));
        assert!(!view.should_quit());

        view.update(key(KeyCode::Esc));
        assert!(view.filter().is_none());
        view.update(key(KeyCode::Char('q')));
        assert!(view.should_quit());
    }
}
