//! Table formatting for search results and listings using tabled
//!
//! This module provides table-style formatting:
//! - Builder pattern for dynamic schema support
//! - Hit tables with `_id` first and one column per top-level source field
//! - Fixed-column tables for indices, mappings, bookmarks and history
//! - Configurable styles and width limits

use std::collections::BTreeSet;

use serde_json::Value;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::error::Result;
use crate::executor::ResultData;
use crate::search::{CollectionInfo, Hit};
use crate::store::{Bookmark, HistoryEntry};

use super::json::JsonFormatter;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter for hits and listings
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,

    /// Enable colored output
    use_colors: bool,
}

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Modern style with box-drawing characters
    Modern,
    /// Psql style
    Psql,
}

impl TableFormatter {
    /// Create a new table formatter with color support
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    ///
    /// # Returns
    /// * `Self` - New table formatter
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
            use_colors,
        }
    }

    /// Set the table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// Format result data as table
    ///
    /// # Arguments
    /// * `data` - Result data to format
    ///
    /// # Returns
    /// * `Result<String>` - Table string or error
    pub fn format(&self, data: &ResultData) -> Result<String> {
        match data {
            ResultData::Search { page, .. } => {
                if page.hits.is_empty() {
                    return Ok("(no hits)".to_string());
                }
                Ok(self.format_hits(&page.hits))
            }
            ResultData::Indices(indices) => Ok(self.format_indices(indices)),
            ResultData::Mapping { fields, .. } => Ok(self.render(
                &["field", "type"],
                fields
                    .iter()
                    .map(|(field, kind)| vec![field.clone(), kind.clone()])
                    .collect(),
            )),
            ResultData::Bookmarks(bookmarks) => Ok(self.format_bookmarks(bookmarks)),
            ResultData::History(entries) => Ok(self.format_history(entries)),
            ResultData::Json(value) => match value.as_array() {
                Some(rows) if !rows.is_empty() && rows.iter().all(Value::is_object) => {
                    Ok(self.format_objects(rows))
                }
                _ => JsonFormatter::new(true, self.use_colors, 2).format_value(value),
            },
            ResultData::Message(msg) => Ok(msg.clone()),
            ResultData::None => Ok(String::new()),
        }
    }

    /// Format hits with `_id` first and one column per source field
    ///
    /// # Arguments
    /// * `hits` - Hits to format
    ///
    /// # Returns
    /// * `String` - Table string
    fn format_hits(&self, hits: &[Hit]) -> String {
        let fields = extract_field_names(hits.iter().map(|hit| &hit.source));

        let mut header = vec!["_id".to_string()];
        header.extend(fields.iter().cloned());

        let rows = hits
            .iter()
            .map(|hit| {
                let mut row = vec![hit.id.clone()];
                row.extend(
                    fields
                        .iter()
                        .map(|field| hit.source.get(field).map(format_cell).unwrap_or_default()),
                );
                row
            })
            .collect();

        self.render(&header, rows)
    }

    /// Format an array of plain objects (e.g. `_cat` output)
    fn format_objects(&self, rows: &[Value]) -> String {
        let fields = extract_field_names(rows.iter());
        let body = rows
            .iter()
            .map(|row| {
                fields
                    .iter()
                    .map(|field| row.get(field).map(format_cell).unwrap_or_default())
                    .collect()
            })
            .collect();
        self.render(&fields, body)
    }

    fn format_indices(&self, indices: &[CollectionInfo]) -> String {
        let rows = indices
            .iter()
            .map(|info| {
                vec![
                    info.name.clone(),
                    info.health.clone().unwrap_or_default(),
                    info.status.clone().unwrap_or_default(),
                    info.docs_count.map(|n| n.to_string()).unwrap_or_default(),
                    info.store_size.clone().unwrap_or_default(),
                ]
            })
            .collect();
        self.render(&["index", "health", "status", "docs", "size"], rows)
    }

    fn format_bookmarks(&self, bookmarks: &[Bookmark]) -> String {
        let rows = bookmarks
            .iter()
            .map(|bookmark| {
                vec![
                    bookmark.name.clone(),
                    bookmark.request.method.to_string(),
                    bookmark.request.path.clone(),
                    bookmark
                        .request
                        .body
                        .as_ref()
                        .map(Value::to_string)
                        .unwrap_or_default(),
                ]
            })
            .collect();
        self.render(&["name", "method", "path", "body"], rows)
    }

    fn format_history(&self, entries: &[HistoryEntry]) -> String {
        let rows = entries
            .iter()
            .map(|entry| {
                vec![
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    entry.method.to_string(),
                    entry.path.clone(),
                    entry.status.clone(),
                ]
            })
            .collect();
        self.render(&["time", "method", "path", "status"], rows)
    }

    /// Build and style a table from a header and rows
    fn render<H: AsRef<str>>(&self, header: &[H], rows: Vec<Vec<String>>) -> String {
        if rows.is_empty() {
            return "(empty result set)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(header.iter().map(|h| h.as_ref().to_string()));
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        // Wrap long values instead of truncating them
        for i in 0..header.len() {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        table.to_string()
    }

    /// Apply table style
    ///
    /// # Arguments
    /// * `table` - Table to style
    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Psql => table.with(Style::psql()),
        };
    }
}

/// Union of top-level keys of all objects, sorted
fn extract_field_names<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<String> {
    let mut fields = BTreeSet::new();
    for value in values {
        if let Some(object) = value.as_object() {
            fields.extend(object.keys().cloned());
        }
    }
    fields.into_iter().collect()
}

/// Format a JSON value for a table cell
///
/// Small arrays and objects are shown inline, larger ones as a size marker.
fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(arr) => {
            if arr.is_empty() {
                String::from("[]")
            } else if arr.len() <= 3 {
                let items: Vec<String> = arr.iter().map(format_cell).collect();
                format!("[{}]", items.join(", "))
            } else {
                format!("[Array({})]", arr.len())
            }
        }
        Value::Object(object) => {
            if object.is_empty() {
                String::from("{}")
            } else if object.len() <= 2 {
                let fields: Vec<String> = object
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_cell(v)))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            } else {
                format!("{{Object({})}}", object.len())
            }
        }
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::with_colors(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchPage, SortCursor};
    use serde_json::json;

    fn hit(id: &str, source: Value) -> Hit {
        Hit {
            id: id.to_string(),
            index: "logs".to_string(),
            source,
            sort: SortCursor::start(),
        }
    }

    #[test]
    fn test_hits_table_id_first() {
        let formatter = TableFormatter::default();
        let page = SearchPage {
            hits: vec![
                hit("a1", json!({"level": "error", "code": 500})),
                hit("a2", json!({"level": "info", "host": "web-1"})),
            ],
            total: 2,
        };
        let output = formatter
            .format(&ResultData::Search {
                page,
                raw: Value::Null,
            })
            .unwrap();

        let header = output.lines().nth(1).unwrap();
        let id = header.find("_id").unwrap();
        let code = header.find("code").unwrap();
        let host = header.find("host").unwrap();
        let level = header.find("level").unwrap();
        assert!(id < code && code < host && host < level);
        assert!(output.contains("web-1"));
    }

    #[test]
    fn test_empty_hits() {
        let formatter = TableFormatter::default();
        let output = formatter
            .format(&ResultData::Search {
                page: SearchPage {
                    hits: Vec::new(),
                    total: 0,
                },
                raw: Value::Null,
            })
            .unwrap();
        assert_eq!(output, "(no hits)");
    }

    #[test]
    fn test_mapping_table() {
        let formatter = TableFormatter::default().with_style(TableStyle::Psql);
        let output = formatter
            .format(&ResultData::Mapping {
                index: "logs".to_string(),
                fields: vec![("title".to_string(), "text".to_string())],
            })
            .unwrap();
        assert!(output.contains("field"));
        assert!(output.contains("title"));
        assert!(output.contains("text"));
    }

    #[test]
    fn test_json_array_of_objects_as_table() {
        let formatter = TableFormatter::default();
        let output = formatter
            .format(&ResultData::Json(json!([
                {"index": "logs", "health": "green"},
                {"index": "metrics", "health": "yellow"}
            ])))
            .unwrap();
        assert!(output.contains("metrics"));
        assert!(output.contains("yellow"));

        // Anything else falls back to JSON
        let output = formatter
            .format(&ResultData::Json(json!({"acknowledged": true})))
            .unwrap();
        assert!(output.contains("\"acknowledged\": true"));
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&json!("x")), "x");
        assert_eq!(format_cell(&json!([1, 2])), "[1, 2]");
        assert_eq!(format_cell(&json!([1, 2, 3, 4])), "[Array(4)]");
        assert_eq!(format_cell(&json!({"a": 1})), "{a: 1}");
        assert_eq!(format_cell(&json!({"a": 1, "b": 2, "c": 3})), "{Object(3)}");
    }

    #[test]
    fn test_narrow_columns_wrap() {
        let formatter = TableFormatter::default().with_max_column_width(5);
        let output = formatter
            .format(&ResultData::Mapping {
                index: "logs".to_string(),
                fields: vec![("a_very_long_field".to_string(), "keyword".to_string())],
            })
            .unwrap();
        assert!(!output.contains("a_very_long_field"));
    }
}
