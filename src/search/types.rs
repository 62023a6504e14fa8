//! Records exchanged with the search service
//!
//! The pagination core only looks at [`Hit::sort`] and [`SearchPage::total`];
//! everything else is carried opaquely for display.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque continuation cursor: the sort values of the last seen hit.
///
/// An empty cursor means "from the start".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortCursor(Vec<Value>);

impl SortCursor {
    /// Cursor pointing before the first hit
    pub fn start() -> Self {
        Self(Vec::new())
    }

    /// Wrap the sort values returned with a hit
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// True when this cursor requests the first page
    pub fn is_start(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw sort values
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

/// A single search hit
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Document identifier
    pub id: String,

    /// Index the document lives in
    pub index: String,

    /// Raw document payload
    pub source: Value,

    /// Sort values, used as the continuation cursor
    pub sort: SortCursor,
}

/// Identifies which collection and filter a result set belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    /// Index (or index pattern) being browsed
    pub index: String,

    /// Query clause; `None` matches all documents
    pub query: Option<Value>,

    /// Sort clause; `None` uses the configured default
    pub sort: Option<Value>,
}

impl Scope {
    /// Scope covering every document of an index
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            query: None,
            sort: None,
        }
    }

    /// Replace the query clause
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Build a scope from user supplied JSON
    ///
    /// A full request body (an object with a top-level `query` or `sort`)
    /// contributes both; anything else is taken as the query clause itself.
    pub fn from_request_json(index: impl Into<String>, json: Value) -> Self {
        let mut scope = Self::new(index);
        match json {
            Value::Object(mut body) if body.contains_key("query") || body.contains_key("sort") => {
                scope.query = body.remove("query");
                scope.sort = body.remove("sort").filter(is_sort_clause);
            }
            Value::Object(ref body) if body.is_empty() => {}
            other => scope.query = Some(other),
        }
        scope
    }
}

/// False for `null` and `[]`, which leave hits without sort values
pub(crate) fn is_sort_clause(sort: &Value) -> bool {
    !(sort.is_null() || sort.as_array().is_some_and(Vec::is_empty))
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{} {}", self.index, query),
            None => write!(f, "{}", self.index),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// Hits in server order
    pub hits: Vec<Hit>,

    /// Server-reported total for the query
    pub total: u64,
}

/// Collection (index) metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub health: Option<String>,
    pub status: Option<String>,
    pub docs_count: Option<u64>,
    pub store_size: Option<String>,
}

/// Basic cluster identification returned by a ping
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: Option<String>,
}

/// HTTP verbs accepted by console requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    /// Parse a verb, case-insensitively
    pub fn parse(verb: &str) -> Option<Self> {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_cursor_start() {
        assert!(SortCursor::start().is_start());
        assert!(SortCursor::default().is_start());
        let cursor = SortCursor::new(vec![json!(17), json!("abc")]);
        assert!(!cursor.is_start());
        assert_eq!(cursor.values().len(), 2);
    }

    #[test]
    fn test_scope_from_query_clause() {
        let scope = Scope::from_request_json("logs", json!({"match": {"level": "error"}}));
        assert_eq!(scope.index, "logs");
        assert_eq!(scope.query, Some(json!({"match": {"level": "error"}})));
        assert_eq!(scope.sort, None);
    }

    #[test]
    fn test_scope_from_full_body() {
        let scope = Scope::from_request_json(
            "logs",
            json!({"query": {"term": {"host": "a"}}, "sort": [{"@timestamp": "desc"}], "size": 5}),
        );
        assert_eq!(scope.query, Some(json!({"term": {"host": "a"}})));
        assert_eq!(scope.sort, Some(json!([{"@timestamp": "desc"}])));
    }

    #[test]
    fn test_scope_empty_or_null_sort_uses_default() {
        let query = json!({"match": {"level": "error"}});
        let scope = Scope::from_request_json("logs", json!({"query": query.clone(), "sort": []}));
        assert_eq!(scope.query, Some(query));
        assert_eq!(scope.sort, None);

        let scope = Scope::from_request_json("logs", json!({"sort": null}));
        assert_eq!(scope, Scope::new("logs"));
    }

    #[test]
    fn test_scope_from_empty_object() {
        assert_eq!(Scope::from_request_json("logs", json!({})), Scope::new("logs"));
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::new("logs").to_string(), "logs");
        let scope = Scope::new("logs").with_query(json!({"match_all": {}}));
        assert_eq!(scope.to_string(), r#"logs {"match_all":{}}"#);
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("Delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("PATCH"), None);
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }
}
