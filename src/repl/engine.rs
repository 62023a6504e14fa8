use std::sync::Arc;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::{debug, warn};

use crate::config::HistoryConfig;
use crate::error::Result;
use crate::parser::{Command, Parser};
use crate::search::SearchService;

use super::completer::SearchCompleter;
use super::highlighter::SyntaxHighlighter;
use super::hinter::SearchHinter;
use super::prompt::SearchPrompt;
use super::shared_state::SharedState;
use super::validator::SearchValidator;

const COMPLETION_MENU: &str = "completion_menu";

/// REPL engine for interactive command execution
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Shared state with execution context
    shared_state: SharedState,

    /// Parser for command parsing
    parser: Parser,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine with shared state
    ///
    /// # Arguments
    /// * `shared_state` - Shared state with execution context
    /// * `history_config` - History configuration
    /// * `highlighting_enabled` - Enable syntax highlighting
    /// * `service` - Optional search service for index name completion
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(
        shared_state: SharedState,
        history_config: &HistoryConfig,
        highlighting_enabled: bool,
        service: Option<Arc<dyn SearchService>>,
    ) -> Result<Self> {
        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let completion_menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU));

        let mut editor = Reedline::create()
            .with_completer(Box::new(SearchCompleter::new(service)))
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_hinter(Box::new(SearchHinter::new()))
            .with_highlighter(Box::new(SyntaxHighlighter::new(highlighting_enabled)))
            .with_validator(Box::new(SearchValidator::new()));

        if history_config.persist {
            if let Some(parent) = history_config.file_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let history =
                FileBackedHistory::with_file(history_config.max_size, history_config.file_path.clone())?;
            debug!("Line history at {}", history_config.file_path.display());
            editor = editor.with_history(Box::new(history));
        }

        Ok(Self {
            editor,
            shared_state,
            parser: Parser::new(),
            running: true,
        })
    }

    /// Read one (possibly multi-line) input
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input, an empty string on Ctrl+C, or `None` on Ctrl+D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let prompt = SearchPrompt::from_state(&self.shared_state);
        match self.editor.read_line(&prompt)? {
            Signal::Success(line) => Ok(Some(line)),
            Signal::CtrlC => Ok(Some(String::new())),
            Signal::CtrlD => {
                self.running = false;
                Ok(None)
            }
            #[allow(unreachable_patterns)]
            _ => {
                warn!("Ignoring unexpected editor signal");
                Ok(Some(String::new()))
            }
        }
    }

    /// Parse user input into a command
    pub fn process_input(&mut self, input: &str) -> Result<Command> {
        self.parser.parse(input)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn shared_state(&self) -> &SharedState {
        &self.shared_state
    }
}
