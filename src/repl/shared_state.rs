use std::sync::{Arc, RwLock};

use crate::config::{DisplayConfig, OutputFormat};

/// Session state shared between the REPL, its helpers and the executor
#[derive(Debug, Clone)]
pub struct SharedState {
    /// Index selected with `use`
    current_index: Arc<RwLock<Option<String>>>,

    /// Cluster name reported by the last successful ping
    cluster_name: Arc<RwLock<Option<String>>>,

    /// Whether the cluster answered the last ping
    connected: Arc<RwLock<bool>>,

    /// Server version
    server_version: Arc<RwLock<Option<String>>>,

    /// Output format setting
    output_format: Arc<RwLock<OutputFormat>>,

    /// Color output setting
    color_enabled: Arc<RwLock<bool>>,
}

impl SharedState {
    /// Create a new shared state.
    ///
    /// * `index` - Initially selected index, if any
    pub fn new(index: Option<String>) -> Self {
        Self::with_config(index, &DisplayConfig::default())
    }

    /// Create a new shared state with display configuration.
    ///
    /// * `index` - Initially selected index, if any
    /// * `display_config` - Display configuration settings
    pub fn with_config(index: Option<String>, display_config: &DisplayConfig) -> Self {
        Self {
            current_index: Arc::new(RwLock::new(index)),
            cluster_name: Arc::new(RwLock::new(None)),
            connected: Arc::new(RwLock::new(false)),
            server_version: Arc::new(RwLock::new(None)),
            output_format: Arc::new(RwLock::new(display_config.format)),
            color_enabled: Arc::new(RwLock::new(display_config.color_output)),
        }
    }

    /// Get the selected index.
    pub fn get_index(&self) -> Option<String> {
        self.current_index.read().unwrap().clone()
    }

    /// Select an index.
    pub fn set_index(&self, index: impl Into<String>) {
        *self.current_index.write().unwrap() = Some(index.into());
    }

    /// Get current output format.
    pub fn get_format(&self) -> OutputFormat {
        *self.output_format.read().unwrap()
    }

    /// Set output format.
    pub fn set_format(&self, format: OutputFormat) {
        *self.output_format.write().unwrap() = format;
    }

    /// Get current color setting.
    pub fn get_color_enabled(&self) -> bool {
        *self.color_enabled.read().unwrap()
    }

    /// Set color output.
    pub fn set_color_enabled(&self, enabled: bool) {
        *self.color_enabled.write().unwrap() = enabled;
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        *self.connected.read().unwrap()
    }

    /// Mark as connected and record what the cluster reported.
    pub fn set_connected(&self, cluster_name: String, version: Option<String>) {
        *self.connected.write().unwrap() = true;
        *self.cluster_name.write().unwrap() = Some(cluster_name);
        *self.server_version.write().unwrap() = version;
    }

    /// Mark as disconnected, keeping the last known cluster name.
    pub fn set_disconnected(&self) {
        *self.connected.write().unwrap() = false;
    }

    /// Get the cluster name.
    pub fn get_cluster_name(&self) -> Option<String> {
        self.cluster_name.read().unwrap().clone()
    }

    /// Get server version.
    pub fn get_server_version(&self) -> Option<String> {
        self.server_version.read().unwrap().clone()
    }
}
