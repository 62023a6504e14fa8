//! Spinner shown while a console request is in flight

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner on stderr, hidden when stderr is not a terminal
pub struct RequestSpinner {
    /// Progress bar (optional, can be disabled)
    bar: Option<ProgressBar>,
}

impl RequestSpinner {
    /// Start spinning
    ///
    /// # Arguments
    /// * `message` - Text shown next to the spinner, usually `METHOD path`
    /// * `enable` - Whether to display anything at all
    ///
    /// # Returns
    /// * `Self` - Running spinner
    pub fn start(message: impl Into<String>, enable: bool) -> Self {
        let bar = (enable && std::io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed}") {
                bar.set_style(style);
            }
            bar.set_message(message.into());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self { bar }
    }

    /// Finish and clear the spinner
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for RequestSpinner {
    fn drop(&mut self) {
        self.finish();
    }
}
