//! Structural context of the cursor inside a structured query
//!
//! [`track`] scans the text before the cursor with an explicit stack of open
//! containers and reports which object keys enclose the cursor and whether a
//! key or a value is expected next. The input is usually half-typed, so the
//! scan is tolerant: unbalanced brackets, stray characters and unterminated
//! strings never fail, they only make the result less specific.

/// Where the cursor sits inside a structured query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Keys from the root to the innermost open container with a key set
    pub path: Vec<String>,

    /// An object key is expected (or is being typed)
    pub in_key: bool,

    /// A value is expected
    pub in_value: bool,

    /// Number of open containers
    pub depth: usize,

    /// Token being typed at the cursor, without its opening quote
    pub partial: String,

    /// Byte offset where the token being typed starts
    pub token_start: usize,
}

/// One open container
#[derive(Debug)]
enum Frame {
    /// `Some(key)` once `"key":` has been seen; the object then awaits a value
    Object { key: Option<String> },
    Array,
}

/// Last token scanned, kept to recover the partial word at the cursor
struct Token {
    start: usize,
    end: usize,
    text: String,
}

/// Compute the structural context at `cursor`
///
/// Only `text[..cursor]` is examined. Offsets past the end are clamped and an
/// offset inside a multi-byte character is moved back to its start. The scan
/// is linear in the prefix length and allocates one frame per open container.
pub fn track(text: &str, cursor: usize) -> Context {
    let mut end = cursor.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let prefix = &text[..end];
    let bytes = prefix.as_bytes();

    let mut stack: Vec<Frame> = Vec::new();
    // A complete string that may turn into a key if a ':' follows
    let mut pending_key: Option<String> = None;
    let mut last: Option<Token> = None;
    let mut open_string: Option<usize> = None;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => match closing_quote(bytes, i + 1) {
                Some(close) => {
                    let raw = &prefix[i + 1..close];
                    let text = decode_string(raw);
                    pending_key = Some(text.clone());
                    last = Some(Token {
                        start: i,
                        end: close + 1,
                        text,
                    });
                    i = close + 1;
                    continue;
                }
                None => {
                    open_string = Some(i);
                    break;
                }
            },
            b'{' => {
                stack.push(Frame::Object { key: None });
                pending_key = None;
                last = None;
            }
            b'[' => {
                stack.push(Frame::Array);
                pending_key = None;
                last = None;
            }
            b'}' | b']' => {
                stack.pop();
                pending_key = None;
                last = None;
            }
            b':' => {
                if let Some(Frame::Object { key }) = stack.last_mut()
                    && key.is_none()
                    && let Some(name) = pending_key.take()
                {
                    *key = Some(name);
                }
                pending_key = None;
                last = None;
            }
            b',' => {
                if let Some(Frame::Object { key }) = stack.last_mut() {
                    *key = None;
                }
                pending_key = None;
                last = None;
            }
            b if b.is_ascii_whitespace() => {}
            _ => {
                // Bare word: literal value, number, or an unquoted key being typed
                let start = i;
                while i < bytes.len() && !is_delimiter(bytes[i]) {
                    i += 1;
                }
                pending_key = None;
                last = Some(Token {
                    start,
                    end: i,
                    text: prefix[start..i].to_string(),
                });
                continue;
            }
        }
        i += 1;
    }

    let path = stack
        .iter()
        .filter_map(|frame| match frame {
            Frame::Object { key } => key.clone(),
            Frame::Array => None,
        })
        .collect();

    let awaiting_key = match stack.last() {
        None => true,
        Some(Frame::Object { key }) => key.is_none(),
        Some(Frame::Array) => false,
    };

    let (partial, token_start) = match (open_string, last) {
        (Some(start), _) => (prefix[start + 1..].to_string(), start),
        (None, Some(token)) if token.end == end => (token.text, token.start),
        _ => (String::new(), end),
    };

    Context {
        path,
        in_key: awaiting_key,
        in_value: !awaiting_key && open_string.is_none(),
        depth: stack.len(),
        partial,
        token_start,
    }
}

/// Index of the quote closing a string whose content starts at `from`
fn closing_quote(bytes: &[u8], from: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Decode JSON escapes; malformed escapes are kept verbatim
fn decode_string(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'{' | b'}' | b'[' | b']' | b':' | b',' | b'"') || b.is_ascii_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(text: &str) -> Context {
        track(text, text.len())
    }

    fn path(ctx: &Context) -> Vec<&str> {
        ctx.path.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_empty_input() {
        let ctx = at_end("");
        assert!(ctx.path.is_empty());
        assert!(ctx.in_key);
        assert!(!ctx.in_value);
        assert_eq!(ctx.depth, 0);
    }

    #[test]
    fn test_nested_value_position() {
        let ctx = at_end(r#"{"query":{"match":{"title":"#);
        assert_eq!(path(&ctx), vec!["query", "match", "title"]);
        assert!(ctx.in_value);
        assert!(!ctx.in_key);
        assert_eq!(ctx.depth, 3);
    }

    #[test]
    fn test_after_key_and_colon_expects_value() {
        for text in [r#"{"size":"#, r#"{"size" : "#, r#"{"a":1, "size":"#] {
            let ctx = at_end(text);
            assert!(ctx.in_value, "{text}");
            assert!(!ctx.in_key, "{text}");
            assert_eq!(ctx.path.last().map(String::as_str), Some("size"), "{text}");
        }
    }

    #[test]
    fn test_after_brace_or_comma_expects_key() {
        for text in ["{", r#"{"query":{"#, r#"{"size":10,"#, r#"{"a":{"b":1},"#] {
            let ctx = at_end(text);
            assert!(ctx.in_key, "{text}");
            assert!(!ctx.in_value, "{text}");
        }
        assert_eq!(path(&at_end(r#"{"query":{"bool":{"must":[],"#)), vec!["query", "bool"]);
    }

    #[test]
    fn test_arrays_do_not_extend_path() {
        let ctx = at_end(r#"{"query":{"bool":{"must":["#);
        assert_eq!(path(&ctx), vec!["query", "bool", "must"]);
        assert!(ctx.in_value);

        let ctx = at_end(r#"{"query":{"bool":{"must":[{"#);
        assert_eq!(path(&ctx), vec!["query", "bool", "must"]);
        assert!(ctx.in_key);
        assert_eq!(ctx.depth, 5);

        let ctx = at_end(r#"{"sort":[{"ts":"desc"},"#);
        assert_eq!(path(&ctx), vec!["sort"]);
        assert!(ctx.in_value);
    }

    #[test]
    fn test_closed_container_keeps_enclosing_key_until_comma() {
        let ctx = at_end(r#"{"query":{"match_all":{}}"#);
        assert_eq!(path(&ctx), vec!["query"]);
        assert!(ctx.in_value);

        let ctx = at_end(r#"{"query":{"match_all":{}},"#);
        assert!(ctx.path.is_empty());
        assert!(ctx.in_key);
    }

    #[test]
    fn test_path_length_counts_keyed_objects() {
        let ctx = at_end(r#"{"aggs":{"by_host":{"terms":{"#);
        assert_eq!(path(&ctx), vec!["aggs", "by_host", "terms"]);
        assert_eq!(ctx.depth, 4);
    }

    #[test]
    fn test_unterminated_key_string() {
        let text = r#"{"query":{"ma"#;
        let ctx = at_end(text);
        assert!(ctx.in_key);
        assert!(!ctx.in_value);
        assert_eq!(path(&ctx), vec!["query"]);
        assert_eq!(ctx.partial, "ma");
        assert_eq!(ctx.token_start, text.rfind('"').unwrap());
    }

    #[test]
    fn test_unterminated_value_string() {
        let ctx = at_end(r#"{"query":{"match":{"title":"hel"#);
        assert!(!ctx.in_key);
        assert!(!ctx.in_value);
        assert_eq!(ctx.partial, "hel");
    }

    #[test]
    fn test_complete_key_without_colon_is_key_position() {
        let text = r#"{"query"#;
        let ctx = at_end(&format!("{text}\""));
        assert!(ctx.in_key);
        assert_eq!(ctx.partial, "query");
        assert_eq!(ctx.token_start, 1);
    }

    #[test]
    fn test_bare_word_partial() {
        let text = r#"{"track_total_hits": tr"#;
        let ctx = at_end(text);
        assert!(ctx.in_value);
        assert_eq!(ctx.partial, "tr");
        assert_eq!(ctx.token_start, text.len() - 2);

        let ctx = at_end(r#"{"size": 10 "#);
        assert_eq!(ctx.partial, "");
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let ctx = at_end(r#"{"q":"{[not]}", "#);
        assert!(ctx.path.is_empty());
        assert!(ctx.in_key);
        assert_eq!(ctx.depth, 1);
    }

    #[test]
    fn test_escaped_quotes_in_keys() {
        let ctx = at_end(r#"{"a\"b":"#);
        assert_eq!(path(&ctx), vec!["a\"b"]);
        assert!(ctx.in_value);
    }

    #[test]
    fn test_suffix_ignored() {
        let text = r#"{"query":{"match":{}}}"#;
        let cursor = r#"{"query":{"#.len();
        let ctx = track(text, cursor);
        assert_eq!(path(&ctx), vec!["query"]);
        assert!(ctx.in_key);
    }

    #[test]
    fn test_malformed_input_never_fails() {
        for text in ["}}}]]", "{]", ":::", ",,,{", "[[[", r#"{"a":"b":"c""#, "\\", "\"\\"] {
            let ctx = at_end(text);
            assert!(!(ctx.in_key && ctx.in_value), "{text}");
        }
        let ctx = at_end("}}{");
        assert_eq!(ctx.depth, 1);
        assert!(ctx.in_key);
    }

    #[test]
    fn test_cursor_clamped_and_char_boundary() {
        let text = r#"{"naïve":"#;
        let ctx = track(text, 1000);
        assert_eq!(path(&ctx), vec!["naïve"]);

        // Cursor inside the two-byte 'ï' moves back to its start
        let inside = text.find('ï').unwrap() + 1;
        let ctx = track(text, inside);
        assert!(ctx.in_key);
        assert_eq!(ctx.partial, "na");
    }

    #[test]
    fn test_command_prefix_before_json() {
        let ctx = at_end(r#"search {"query":"#);
        assert_eq!(path(&ctx), vec!["query"]);
        assert!(ctx.in_value);

        let ctx = at_end("use lo");
        assert_eq!(ctx.depth, 0);
        assert_eq!(ctx.partial, "lo");
    }

    #[test]
    fn test_deep_nesting_is_iterative() {
        let text = "[".repeat(100_000);
        let ctx = at_end(&text);
        assert_eq!(ctx.depth, 100_000);
        assert!(ctx.path.is_empty());
    }
}
