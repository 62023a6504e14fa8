//! Prompt showing the cluster and the selected index

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use super::shared_state::SharedState;

/// Custom prompt for the searchsh REPL
pub struct SearchPrompt {
    /// Cluster name from the last ping
    cluster: Option<String>,
    /// Index selected with `use`
    index: Option<String>,
    /// Whether the cluster answered
    connected: bool,
}

impl SearchPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `cluster` - Cluster name, if known
    /// * `index` - Selected index, if any
    /// * `connected` - Whether connected to the cluster
    pub fn new(cluster: Option<String>, index: Option<String>, connected: bool) -> Self {
        Self {
            cluster,
            index,
            connected,
        }
    }

    /// Snapshot the prompt fields from the session state
    pub fn from_state(state: &SharedState) -> Self {
        Self::new(state.get_cluster_name(), state.get_index(), state.is_connected())
    }

    fn label(&self) -> String {
        let cluster = self.cluster.as_deref().unwrap_or("searchsh");
        match &self.index {
            Some(index) => format!("{}/{}", cluster, index),
            None => cluster.to_string(),
        }
    }
}

impl Prompt for SearchPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        if self.connected {
            format!("{}> ", self.label()).into()
        } else {
            format!("{} (disconnected)> ", self.label()).into()
        }
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        "".into()
    }

    /// Empty since the indicator is part of the left prompt
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> std::borrow::Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
