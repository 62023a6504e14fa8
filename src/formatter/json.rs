//! JSON formatting for execution results
//!
//! This module provides JSON output for every result type:
//! - Pretty-printed and compact JSON output
//! - Listings (indices, mappings, bookmarks, history) rendered as JSON values
//! - Optional color highlighting for pretty output

use colored_json::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::executor::ResultData;

/// JSON formatter with pretty printing support
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Indentation level
    indent: usize,

    /// Enable colored output
    use_colors: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    /// * `use_colors` - Enable colored output
    /// * `indent` - Spaces per indentation level
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(pretty: bool, use_colors: bool, indent: usize) -> Self {
        Self {
            pretty,
            indent,
            use_colors,
        }
    }

    /// Format result data as JSON
    ///
    /// # Arguments
    /// * `data` - Result data to format
    ///
    /// # Returns
    /// * `Result<String>` - JSON string or error
    pub fn format(&self, data: &ResultData) -> Result<String> {
        match data {
            ResultData::Json(value) => self.format_value(value),
            ResultData::Search { raw, .. } => self.format_value(raw),
            ResultData::Indices(indices) => self.format_value(&to_value(indices)?),
            ResultData::Mapping { fields, .. } => {
                let object: Map<String, Value> = fields
                    .iter()
                    .map(|(field, kind)| (field.clone(), Value::String(kind.clone())))
                    .collect();
                self.format_value(&Value::Object(object))
            }
            ResultData::Bookmarks(bookmarks) => {
                let list: Vec<Value> = bookmarks
                    .iter()
                    .map(|bookmark| {
                        json!({
                            "name": bookmark.name,
                            "method": bookmark.request.method,
                            "path": bookmark.request.path,
                            "body": bookmark.request.body,
                        })
                    })
                    .collect();
                self.format_value(&Value::Array(list))
            }
            ResultData::History(entries) => self.format_value(&to_value(entries)?),
            ResultData::Message(msg) => Ok(msg.clone()),
            ResultData::None => Ok(String::new()),
        }
    }

    /// Format a single JSON value
    ///
    /// # Arguments
    /// * `value` - Value to format
    ///
    /// # Returns
    /// * `Result<String>` - JSON string
    pub fn format_value(&self, value: &Value) -> Result<String> {
        let json_str = if self.pretty {
            self.to_pretty_string(value)
                .unwrap_or_else(|_| value.to_string())
        } else {
            value.to_string()
        };

        // Only apply colors for pretty-printed JSON
        // Compact JSON should remain as-is for piping/logging
        if self.use_colors && self.pretty {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }

    /// Convert a value to pretty-printed JSON with custom indentation
    ///
    /// # Arguments
    /// * `value` - The value to serialize
    ///
    /// # Returns
    /// * `Result<String, serde_json::Error>` - Pretty JSON string with custom indent
    fn to_pretty_string<T: Serialize>(
        &self,
        value: &T,
    ) -> std::result::Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| format!("Failed to serialize result: {e}").into())
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true, false, 2)
    }
}
