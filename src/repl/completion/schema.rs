//! Static completion schema for search request bodies
//!
//! Maps a normalized path (`.`-joined keys, `*` for caller-chosen names) to
//! the items offered at that position, most frequently used first. The
//! built-in table is created on first use and never changes afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

/// How a completion item is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    /// An object key
    Field,
    /// A literal value, inserted verbatim
    Value,
}

/// One entry of a schema position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub text: String,
    pub kind: CompletionKind,
}

impl CompletionItem {
    pub fn field(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CompletionKind::Field,
        }
    }

    pub fn value(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CompletionKind::Value,
        }
    }
}

/// Read-only lookup from normalized path to completion items
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
    entries: HashMap<String, Vec<CompletionItem>>,
}

impl SchemaTable {
    /// Build a table from `(normalized path, items)` pairs
    ///
    /// A later pair for the same path replaces an earlier one.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<CompletionItem>)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// The process-wide table for search request bodies
    pub fn builtin() -> &'static SchemaTable {
        &BUILTIN
    }

    /// Items registered for an exact normalized path
    pub fn get(&self, path: &str) -> Option<&[CompletionItem]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join path segments into the key format used by [`SchemaTable`]
pub fn normalize<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<&str>>()
        .join(".")
}

static BUILTIN: LazyLock<SchemaTable> = LazyLock::new(|| SchemaTable::from_entries(builtin_entries()));

const ROOT_KEYS: &[&str] = &[
    "query",
    "size",
    "sort",
    "aggs",
    "_source",
    "from",
    "track_total_hits",
    "post_filter",
    "highlight",
    "search_after",
    "aggregations",
    "min_score",
    "timeout",
];

const QUERY_CLAUSES: &[&str] = &[
    "match",
    "term",
    "bool",
    "range",
    "match_all",
    "terms",
    "match_phrase",
    "multi_match",
    "exists",
    "query_string",
    "prefix",
    "wildcard",
    "ids",
    "simple_query_string",
    "fuzzy",
    "regexp",
    "nested",
    "match_phrase_prefix",
];

const AGGREGATIONS: &[&str] = &[
    "terms",
    "date_histogram",
    "avg",
    "sum",
    "min",
    "max",
    "cardinality",
    "value_count",
    "stats",
    "histogram",
    "range",
    "filter",
    "filters",
    "top_hits",
    "percentiles",
    "composite",
    "aggs",
];

fn fields(names: &[&str]) -> Vec<CompletionItem> {
    names.iter().copied().map(CompletionItem::field).collect()
}

fn values(texts: &[&str]) -> Vec<CompletionItem> {
    texts.iter().copied().map(CompletionItem::value).collect()
}

fn builtin_entries() -> Vec<(&'static str, Vec<CompletionItem>)> {
    vec![
        ("", fields(ROOT_KEYS)),
        ("query", fields(QUERY_CLAUSES)),
        (
            "query.bool",
            fields(&["must", "filter", "should", "must_not", "minimum_should_match", "boost"]),
        ),
        ("query.bool.must", fields(QUERY_CLAUSES)),
        ("query.bool.filter", fields(QUERY_CLAUSES)),
        ("query.bool.should", fields(QUERY_CLAUSES)),
        ("query.bool.must_not", fields(QUERY_CLAUSES)),
        ("query.bool.minimum_should_match", values(&["1", "\"75%\""])),
        (
            "query.match",
            fields(&[
                "query",
                "operator",
                "fuzziness",
                "minimum_should_match",
                "analyzer",
                "zero_terms_query",
                "boost",
            ]),
        ),
        ("query.match_phrase", fields(&["query", "slop", "analyzer", "boost"])),
        (
            "query.match_phrase_prefix",
            fields(&["query", "max_expansions", "slop", "analyzer"]),
        ),
        ("query.match_all", fields(&["boost"])),
        ("query.term", fields(&["value", "boost", "case_insensitive"])),
        ("query.terms", fields(&["boost"])),
        (
            "query.range",
            fields(&["gte", "lte", "gt", "lt", "format", "time_zone", "boost"]),
        ),
        (
            "query.multi_match",
            fields(&["query", "fields", "type", "operator", "fuzziness", "tie_breaker"]),
        ),
        (
            "query.multi_match.type",
            values(&[
                "\"best_fields\"",
                "\"most_fields\"",
                "\"cross_fields\"",
                "\"phrase\"",
                "\"phrase_prefix\"",
                "\"bool_prefix\"",
            ]),
        ),
        ("query.multi_match.operator", values(&["\"or\"", "\"and\""])),
        ("query.exists", fields(&["field"])),
        (
            "query.query_string",
            fields(&[
                "query",
                "default_field",
                "fields",
                "default_operator",
                "analyze_wildcard",
                "lenient",
            ]),
        ),
        (
            "query.simple_query_string",
            fields(&["query", "fields", "default_operator", "flags"]),
        ),
        ("query.prefix", fields(&["value", "case_insensitive"])),
        ("query.wildcard", fields(&["value", "case_insensitive", "boost"])),
        ("query.ids", fields(&["values"])),
        ("query.fuzzy", fields(&["value", "fuzziness", "max_expansions", "prefix_length"])),
        ("query.regexp", fields(&["value", "flags", "case_insensitive"])),
        ("query.nested", fields(&["path", "query", "score_mode", "ignore_unmapped"])),
        ("query.nested.query", fields(QUERY_CLAUSES)),
        ("query.nested.score_mode", values(&["\"avg\"", "\"max\"", "\"min\"", "\"sum\"", "\"none\""])),
        ("post_filter", fields(QUERY_CLAUSES)),
        // Aggregation names are chosen by the caller
        ("aggs", Vec::new()),
        ("aggs.*", fields(AGGREGATIONS)),
        ("aggregations", Vec::new()),
        ("aggregations.*", fields(AGGREGATIONS)),
        (
            "sort",
            [fields(&["_score", "_doc"]), values(&["\"_score\"", "\"_doc\""])].concat(),
        ),
        (
            "sort.*",
            [
                values(&["\"asc\"", "\"desc\""]),
                fields(&["order", "mode", "missing", "unmapped_type"]),
            ]
            .concat(),
        ),
        (
            "_source",
            [values(&["true", "false"]), fields(&["includes", "excludes"])].concat(),
        ),
        ("track_total_hits", values(&["true", "false"])),
        ("size", values(&["10", "50", "100"])),
        ("from", values(&["0"])),
        (
            "highlight",
            fields(&["fields", "pre_tags", "post_tags", "fragment_size", "number_of_fragments"]),
        ),
        ("highlight.fields", Vec::new()),
        ("highlight.fields.*", fields(&["fragment_size", "number_of_fragments", "type"])),
        ("timeout", values(&["\"10s\"", "\"1m\""])),
    ]
}
