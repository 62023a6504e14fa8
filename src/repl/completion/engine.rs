//! Completion engine - turns the cursor context into editor suggestions
//!
//! Inside a request body the structural context from [`track`] selects a
//! schema position through [`suggest`]. Outside any container the line is a
//! shell command and the candidate provider supplies keywords and index names.

use std::sync::Arc;

use super::context::{Context, track};
use super::provider::{CandidateProvider, INDEX_COMMANDS};
use super::schema::{CompletionItem, CompletionKind, SchemaTable, normalize};

/// Completion pair representing a candidate suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPair {
    /// Display text for the candidate
    pub display: String,
    /// Replacement text to insert
    pub replacement: String,
    /// Optional description for the candidate
    pub description: Option<String>,
}

/// Items offered at `path` by the built-in schema
pub fn suggest<S: AsRef<str>>(path: &[S]) -> Vec<CompletionItem> {
    suggest_in(SchemaTable::builtin(), path)
}

/// Resolve `path` against `table`
///
/// Lookup order, first hit wins: the exact path, then the path with its last
/// segment replaced by `*`, then the same two steps for each shorter prefix,
/// and finally the root entry. A table without a root entry yields nothing.
pub fn suggest_in<S: AsRef<str>>(table: &SchemaTable, path: &[S]) -> Vec<CompletionItem> {
    for len in (0..=path.len()).rev() {
        let prefix = &path[..len];
        if let Some(items) = table.get(&normalize(prefix)) {
            return items.to_vec();
        }
        if len > 0 {
            let parent = normalize(&prefix[..len - 1]);
            let wildcard = if parent.is_empty() {
                "*".to_string()
            } else {
                format!("{parent}.*")
            };
            if let Some(items) = table.get(&wildcard) {
                return items.to_vec();
            }
        }
    }
    Vec::new()
}

/// Main completion engine
pub struct CompletionEngine {
    /// Candidate provider for shell-level suggestions
    provider: Arc<dyn CandidateProvider>,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    pub fn new(provider: Arc<dyn CandidateProvider>) -> Self {
        Self { provider }
    }

    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `(usize, Vec<CompletionPair>)` - Start of the replaced span and candidate pairs
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<CompletionPair>) {
        let context = track(line, pos);
        if context.depth > 0 {
            let typed = line.get(context.token_start..pos).unwrap_or_default();
            (context.token_start, body_candidates(&context, typed))
        } else {
            self.command_candidates(line, pos)
        }
    }

    /// Keywords, subcommands and index names for the shell command at the cursor
    fn command_candidates(&self, line: &str, pos: usize) -> (usize, Vec<CompletionPair>) {
        let before = line.get(..pos).unwrap_or(line);
        // A closed request body leaves nothing to complete
        if before.contains(['{', '[']) {
            return (pos, Vec::new());
        }

        let ends_with_space = before.ends_with(char::is_whitespace);
        let mut words: Vec<&str> = before.split_whitespace().collect();
        let current = if ends_with_space {
            ""
        } else {
            words.pop().unwrap_or_default()
        };
        let start = before.len() - current.len();

        let candidates = match words.as_slice() {
            [] => self.provider.commands(current),
            [command] if INDEX_COMMANDS.contains(command) => self.provider.indices(current),
            [command] => self.provider.subcommands(command, current),
            _ => Vec::new(),
        };

        let pairs = candidates
            .into_iter()
            .filter(|c| c != current)
            .map(|c| CompletionPair {
                display: c.clone(),
                replacement: c,
                description: None,
            })
            .collect();
        (start, pairs)
    }
}

/// Schema suggestions at a position inside a request body
///
/// Keys are inserted with their quotes and colon. In value position literal
/// values go in verbatim and keys open a nested object.
fn body_candidates(context: &Context, typed: &str) -> Vec<CompletionPair> {
    let items = suggest(&context.path);
    let quoted = typed.starts_with('"');

    items
        .into_iter()
        .filter_map(|item| {
            let replacement = match item.kind {
                CompletionKind::Field if context.in_key && item.text.starts_with(&context.partial) => {
                    format!("\"{}\": ", item.text)
                }
                CompletionKind::Field if context.in_value && !quoted && item.text.starts_with(&context.partial) => {
                    format!("{{\"{}\": ", item.text)
                }
                CompletionKind::Value if !context.in_key && item.text.starts_with(typed) => item.text.clone(),
                _ => return None,
            };
            Some(CompletionPair {
                display: item.text,
                replacement,
                description: Some(
                    match item.kind {
                        CompletionKind::Field => "field",
                        CompletionKind::Value => "value",
                    }
                    .to_string(),
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::completion::provider::IndexCandidateProvider;

    fn create_test_engine() -> CompletionEngine {
        CompletionEngine::new(Arc::new(IndexCandidateProvider::new(None)))
    }

    fn replacements(pairs: &[CompletionPair]) -> Vec<&str> {
        pairs.iter().map(|p| p.replacement.as_str()).collect()
    }

    fn table() -> SchemaTable {
        SchemaTable::from_entries([
            ("", vec![CompletionItem::field("root")]),
            ("a", vec![CompletionItem::field("a-items")]),
            ("a.*", vec![CompletionItem::field("any-under-a")]),
            ("a.b", vec![CompletionItem::field("a-b-items")]),
            ("*", vec![CompletionItem::field("any-top")]),
        ])
    }

    #[test]
    fn test_suggest_exact() {
        assert_eq!(suggest_in(&table(), &["a", "b"]), vec![CompletionItem::field("a-b-items")]);
        assert_eq!(suggest_in(&table(), &["a"]), vec![CompletionItem::field("a-items")]);
    }

    #[test]
    fn test_suggest_wildcard_last_segment() {
        assert_eq!(suggest_in(&table(), &["a", "x"]), vec![CompletionItem::field("any-under-a")]);
        assert_eq!(suggest_in(&table(), &["z"]), vec![CompletionItem::field("any-top")]);
    }

    #[test]
    fn test_suggest_drops_segments() {
        // a.x.y: no exact, no a.x.*, then a.x resolves through a.*
        assert_eq!(
            suggest_in(&table(), &["a", "x", "y"]),
            vec![CompletionItem::field("any-under-a")]
        );
        assert_eq!(
            suggest_in(&table(), &["a", "b", "c", "d"]),
            vec![CompletionItem::field("a-b-items")]
        );
    }

    #[test]
    fn test_suggest_root_fallback_and_missing_root() {
        let table = SchemaTable::from_entries([("", vec![CompletionItem::field("root")])]);
        assert_eq!(suggest_in(&table, &["q", "r"]), suggest_in(&table, &[] as &[&str]));

        let no_root = SchemaTable::from_entries([("a", vec![CompletionItem::field("x")])]);
        assert!(suggest_in(&no_root, &["zzz"]).is_empty());
    }

    #[test]
    fn test_unmatched_builtin_path_equals_root() {
        let root = suggest::<&str>(&[]);
        assert!(!root.is_empty());
        assert_eq!(suggest(&["nonsense", "deeper"]), root);
    }

    #[test]
    fn test_scenario_a_falls_back_to_query_match() {
        let context = track(r#"{"query":{"match":{"title":"#, usize::MAX);
        assert_eq!(context.path, vec!["query", "match", "title"]);
        assert!(context.in_value);

        let expected = SchemaTable::builtin().get("query.match").unwrap().to_vec();
        assert_eq!(suggest(&context.path), expected);
    }

    #[test]
    fn test_suggest_wildcard_aggregation_name() {
        let items = suggest(&["aggs", "by_host"]);
        assert_eq!(items[0], CompletionItem::field("terms"));
        assert!(suggest(&["aggs"]).is_empty());
    }

    #[test]
    fn test_complete_key_inserts_quoted_key() {
        let engine = create_test_engine();
        let line = r#"{"query":{"#;
        let (start, pairs) = engine.complete(line, line.len());
        assert_eq!(start, line.len());
        assert_eq!(pairs[0].replacement, r#""match": "#);
        assert_eq!(pairs[0].display, "match");
    }

    #[test]
    fn test_complete_partial_key() {
        let engine = create_test_engine();
        let line = r#"{"query":{"match_"#;
        let (start, pairs) = engine.complete(line, line.len());
        assert_eq!(start, line.rfind('"').unwrap());
        assert_eq!(
            replacements(&pairs),
            vec![r#""match_all": "#, r#""match_phrase": "#, r#""match_phrase_prefix": "#]
        );
    }

    #[test]
    fn test_complete_value_literals() {
        let engine = create_test_engine();
        let line = r#"{"track_total_hits": "#;
        let (_, pairs) = engine.complete(line, line.len());
        assert_eq!(replacements(&pairs), vec!["true", "false"]);

        let line = r#"{"track_total_hits": f"#;
        let (start, pairs) = engine.complete(line, line.len());
        assert_eq!(start, line.len() - 1);
        assert_eq!(replacements(&pairs), vec!["false"]);
    }

    #[test]
    fn test_complete_value_position_opens_object() {
        let engine = create_test_engine();
        let line = r#"{"query": "#;
        let (_, pairs) = engine.complete(line, line.len());
        assert_eq!(pairs[0].replacement, r#"{"match": "#);
    }

    #[test]
    fn test_complete_inside_value_string() {
        let engine = create_test_engine();
        let line = r#"{"sort":[{"ts":"de"#;
        let (start, pairs) = engine.complete(line, line.len());
        assert_eq!(start, line.rfind('"').unwrap());
        assert_eq!(replacements(&pairs), vec![r#""desc""#]);
    }

    #[test]
    fn test_complete_commands() {
        let engine = create_test_engine();
        let (start, pairs) = engine.complete("sh", 2);
        assert_eq!(start, 0);
        assert_eq!(replacements(&pairs), vec!["show"]);

        let (start, pairs) = engine.complete("show ", 5);
        assert_eq!(start, 5);
        assert_eq!(replacements(&pairs), vec!["indices", "collections"]);

        let (start, pairs) = engine.complete("bookmark ru", 11);
        assert_eq!(start, 9);
        assert_eq!(replacements(&pairs), vec!["run"]);
    }

    #[test]
    fn test_complete_exact_command_removed() {
        let engine = create_test_engine();
        let (_, pairs) = engine.complete("format json", 11);
        assert_eq!(replacements(&pairs), vec!["json-pretty"]);
    }

    #[test]
    fn test_complete_after_closed_body_is_empty() {
        let engine = create_test_engine();
        let line = r#"search {"size": 1} "#;
        let (_, pairs) = engine.complete(line, line.len());
        assert!(pairs.is_empty());
    }
}
