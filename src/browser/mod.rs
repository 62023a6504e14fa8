//! Full-screen result browser
//!
//! Shows one line per hit and streams further pages while scrolling. All
//! state changes go through [`BrowserView::update`], fed from one loop that
//! merges terminal events with page arrivals.

mod message;
mod render;
mod view;

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::event::EventStream;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{ExecutionError, Result};
use crate::pagination::PaginationController;
use crate::search::{Scope, SearchService};

pub use message::Message;
pub use render::{format_hit, truncate};
pub use view::{BrowserView, FilterEditor, should_prefetch};

/// Raw mode plus alternate screen, restored on drop
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().map_err(terminal_error)?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(terminal_error(e));
        }
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn terminal_error(e: io::Error) -> crate::error::SearchshError {
    ExecutionError::Terminal(e.to_string()).into()
}

/// Browse `scope` until the user quits
///
/// # Arguments
/// * `service` - Search service the pages come from
/// * `scope` - Index and filter to start with
/// * `config` - Page size and prefetch distance
pub async fn run(service: Arc<dyn SearchService>, scope: Scope, config: &SearchConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = PaginationController::new(service, tx.clone(), scope);
    let (_, rows) = terminal::size().map_err(terminal_error)?;
    let mut view = BrowserView::new(
        controller,
        tx,
        config.page_size,
        config.prefetch_lookahead,
        rows,
    );

    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();

    view.start();
    render::draw(&mut guard.stdout, &view).map_err(terminal_error)?;

    while !view.should_quit() {
        let message = tokio::select! {
            Some(message) = rx.recv() => message,
            event = events.next() => match event {
                Some(Ok(event)) => Message::Terminal(event),
                Some(Err(e)) => return Err(terminal_error(e)),
                None => break,
            },
        };
        view.update(message);
        render::draw(&mut guard.stdout, &view).map_err(terminal_error)?;
    }

    debug!(
        "browser closed with {} hits loaded",
        view.controller().documents().len()
    );
    Ok(())
}
