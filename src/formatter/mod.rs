//! Output formatting and colorization for searchsh
//!
//! This module provides formatting functionality for command execution results:
//! - JSON formatting (plain and pretty-printed, optionally colored)
//! - Table formatting for hits and listings
//! - Compact summaries
//! - Execution statistics

mod colorizer;
mod json;
mod stats;
mod table;

pub use colorizer::Colorizer;
pub use json::JsonFormatter;
pub use stats::StatsFormatter;
pub use table::{TableFormatter, TableStyle};

use crate::config::{DisplayConfig, OutputFormat};
use crate::error::Result;
use crate::executor::{ExecutionResult, ResultData};

/// Main formatter for execution results
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Colorizer for output highlighting
    colorizer: Colorizer,

    /// Enable colored output
    use_colors: bool,

    /// Append execution statistics
    show_timing: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            colorizer: Colorizer::new(use_colors),
            use_colors,
            show_timing: true,
        }
    }

    /// Create a formatter from display configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self {
            show_timing: config.show_timing,
            ..Self::new(config.format, config.color_output)
        }
    }

    /// Format execution result according to configured format
    ///
    /// # Arguments
    /// * `result` - Execution result to format
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or error
    pub fn format(&self, result: &ExecutionResult) -> Result<String> {
        if !result.success {
            let unknown_error = String::from("Unknown error");
            let error_msg = result.error.as_ref().unwrap_or(&unknown_error);
            return Ok(self.colorizer.error(error_msg));
        }

        let output = match self.format_type {
            OutputFormat::Json => JsonFormatter::new(false, false, 2).format(&result.data)?,
            OutputFormat::JsonPretty => {
                JsonFormatter::new(true, self.use_colors, 2).format(&result.data)?
            }
            OutputFormat::Table => TableFormatter::with_colors(self.use_colors).format(&result.data)?,
            OutputFormat::Compact => self.format_compact(&result.data),
        };

        // Messages and empty results carry no statistics
        if matches!(result.data, ResultData::Message(_) | ResultData::None) {
            return Ok(output);
        }

        // Compact output already is the hit count
        let show_count = self.format_type != OutputFormat::Compact;
        let stats = StatsFormatter::new(self.show_timing, show_count).format(result);
        if stats.is_empty() {
            Ok(output)
        } else {
            Ok(format!("{}\n{}", output, self.colorizer.dim(&stats)))
        }
    }

    /// Format result data in compact form
    ///
    /// # Arguments
    /// * `data` - Result data to format
    ///
    /// # Returns
    /// * `String` - One-line summary
    pub fn format_compact(&self, data: &ResultData) -> String {
        match data {
            ResultData::Search { page, .. } => {
                format!("{} hit(s) of {}", page.hits.len(), page.total)
            }
            ResultData::Json(value) => value.to_string(),
            ResultData::Indices(indices) => {
                let names: Vec<&str> = indices.iter().map(|i| i.name.as_str()).collect();
                format!("{} index(es): {}", names.len(), names.join(", "))
            }
            ResultData::Mapping { index, fields } => {
                format!("{}: {} field(s)", index, fields.len())
            }
            ResultData::Bookmarks(bookmarks) => {
                let names: Vec<&str> = bookmarks.iter().map(|b| b.name.as_str()).collect();
                format!("{} bookmark(s): {}", names.len(), names.join(", "))
            }
            ResultData::History(entries) => format!("{} request(s)", entries.len()),
            ResultData::Message(msg) => msg.clone(),
            ResultData::None => String::new(),
        }
    }

    /// Set output format
    pub fn set_format(&mut self, format_type: OutputFormat) {
        self.format_type = format_type;
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputFormat::JsonPretty, true)
    }
}
