//! Rendering of nested JSON values for terminal display.
//!
//! API responses are heterogeneous: an attribute may hold a scalar, a list or
//! a mapping, nested to any depth. These functions flatten such values into a
//! single display string. They never fail: if a value cannot be rendered the
//! original value is handed back untouched (see [`Formatted::Raw`]).

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::trace;

/// Rendering of an empty list or mapping
pub const EMPTY: &str = "[]";

/// Nesting deeper than this is not rendered
pub const MAX_DEPTH: usize = 32;

/// Outcome of formatting a value
#[derive(Debug, Clone, PartialEq)]
pub enum Formatted<'a> {
    /// The input was `null`
    Absent,
    Text(String),
    /// Rendering failed; this is the original input
    Raw(&'a Value),
}

impl Formatted<'_> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Formatted::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Display string for a table cell: empty for `Absent`, JSON for `Raw`.
    pub fn into_cell(self) -> String {
        match self {
            Formatted::Absent => String::new(),
            Formatted::Text(text) => text,
            Formatted::Raw(value) => value.to_string(),
        }
    }
}

impl std::fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Formatted::Absent => Ok(()),
            Formatted::Text(text) => write!(f, "{}", text),
            Formatted::Raw(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Error)]
enum RenderError {
    #[error("value is nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
    #[error("expected {0}")]
    UnexpectedShape(&'static str),
}

/// Render any value.
///
/// With `list_it` the outermost container is written one entry per line;
/// otherwise it is written inline as `[a, b, c]`. Nested containers are
/// always inline. A list holding a single scalar renders as that scalar.
pub fn format_value(value: &Value, list_it: bool) -> Formatted<'_> {
    finish(value, render(value, list_it, 0))
}

/// Render a mapping as `key: value` lines.
pub fn format_dict(value: &Value) -> Formatted<'_> {
    let result = match value {
        Value::Object(map) => render_mapping(map, true, 0),
        _ => Err(RenderError::UnexpectedShape("a mapping")),
    };
    finish(value, result)
}

/// Render a top-level list whose elements may be mappings.
///
/// A single element renders as that element. Otherwise runs of scalars are
/// comma-joined and every other element becomes its own block; blocks are
/// separated by a blank line.
pub fn format_list(value: &Value) -> Formatted<'_> {
    let result = match value {
        Value::Array(items) => render_blocks(items),
        _ => Err(RenderError::UnexpectedShape("a list")),
    };
    finish(value, result)
}

/// Render a list of `{rel, href}` links as `rel-> href` lines.
pub fn format_links(value: &Value) -> Formatted<'_> {
    finish(value, render_links(value))
}

fn finish(value: &Value, result: Result<String, RenderError>) -> Formatted<'_> {
    if value.is_null() {
        return Formatted::Absent;
    }
    match result {
        Ok(text) => Formatted::Text(text),
        Err(e) => {
            trace!("Displaying raw value: {}", e);
            Formatted::Raw(value)
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn render(value: &Value, list_it: bool, depth: usize) -> Result<String, RenderError> {
    if depth > MAX_DEPTH {
        return Err(RenderError::TooDeep);
    }
    match value {
        Value::Array(items) => render_sequence(items, list_it, depth),
        Value::Object(map) => render_mapping(map, list_it, depth),
        scalar => Ok(scalar_text(scalar)),
    }
}

fn render_sequence(items: &[Value], list_it: bool, depth: usize) -> Result<String, RenderError> {
    match items {
        [] => Ok(EMPTY.to_string()),
        [single] if is_scalar(single) => Ok(scalar_text(single)),
        _ => {
            let parts = items
                .iter()
                .map(|item| render(item, false, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(join(parts, list_it))
        }
    }
}

fn render_mapping(
    map: &Map<String, Value>,
    list_it: bool,
    depth: usize,
) -> Result<String, RenderError> {
    if map.is_empty() {
        return Ok(EMPTY.to_string());
    }
    let parts = map
        .iter()
        .map(|(key, value)| render(value, false, depth + 1).map(|text| format!("{}: {}", key, text)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join(parts, list_it))
}

fn join(parts: Vec<String>, list_it: bool) -> String {
    if list_it {
        parts.join("\n")
    } else {
        format!("[{}]", parts.join(", "))
    }
}

fn render_blocks(items: &[Value]) -> Result<String, RenderError> {
    match items {
        [] => Ok(EMPTY.to_string()),
        [single] => render(single, true, 1),
        _ => {
            let mut blocks = Vec::new();
            let mut scalars = Vec::new();
            for item in items {
                if is_scalar(item) {
                    scalars.push(scalar_text(item));
                    continue;
                }
                if !scalars.is_empty() {
                    blocks.push(scalars.join(", "));
                    scalars.clear();
                }
                blocks.push(render(item, true, 1)?);
            }
            if !scalars.is_empty() {
                blocks.push(scalars.join(", "));
            }
            Ok(blocks.join("\n\n"))
        }
    }
}

fn render_links(value: &Value) -> Result<String, RenderError> {
    let links = value
        .as_array()
        .ok_or(RenderError::UnexpectedShape("a list of links"))?;
    let lines = links
        .iter()
        .map(|link| {
            let rel = link.get("rel").and_then(Value::as_str);
            let href = link.get("href").and_then(Value::as_str);
            match (rel, href) {
                (Some(rel), Some(href)) => Ok(format!("{}-> {}", rel, href)),
                _ => Err(RenderError::UnexpectedShape("a link with rel and href")),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(formatted: Formatted<'_>) -> String {
        match formatted {
            Formatted::Text(text) => text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_containers() {
        for list_it in [true, false] {
            assert_eq!(text(format_value(&json!([]), list_it)), "[]");
            assert_eq!(text(format_value(&json!({}), list_it)), "[]");
        }
        assert_eq!(text(format_dict(&json!({}))), "[]");
        assert_eq!(text(format_list(&json!([]))), "[]");
    }

    #[test]
    fn test_single_key_mapping() {
        assert_eq!(text(format_value(&json!({"k": "v"}), true)), "k: v");
        assert_eq!(text(format_value(&json!({"k": "v"}), false)), "[k: v]");
    }

    #[test]
    fn test_scalar_sequence() {
        assert_eq!(text(format_value(&json!(["a", "b", "c"]), false)), "[a, b, c]");
        assert_eq!(text(format_value(&json!(["a", "b", "c"]), true)), "a\nb\nc");
        assert_eq!(text(format_value(&json!([1, 2.5, true]), false)), "[1, 2.5, true]");
    }

    #[test]
    fn test_single_scalar_sequence_has_no_trailing_separator() {
        assert_eq!(text(format_value(&json!(["only"]), false)), "only");
        assert_eq!(text(format_value(&json!([42]), true)), "42");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(text(format_value(&json!("plain"), false)), "plain");
        assert_eq!(text(format_value(&json!(7), true)), "7");
        assert_eq!(text(format_value(&json!(false), true)), "false");
    }

    #[test]
    fn test_nested_values_are_inline() {
        let value = json!({
            "name": "vm-1",
            "addresses": {"private": ["10.0.0.5", "10.0.0.6"]},
            "tags": [{"k": "v"}, ["x", "y"]]
        });
        assert_eq!(
            text(format_value(&value, true)),
            "name: vm-1\naddresses: [private: [10.0.0.5, 10.0.0.6]]\ntags: [[k: v], [x, y]]"
        );
        assert_eq!(
            text(format_value(&value, false)),
            "[name: vm-1, addresses: [private: [10.0.0.5, 10.0.0.6]], tags: [[k: v], [x, y]]]"
        );
    }

    #[test]
    fn test_null_is_absent() {
        assert_eq!(format_value(&Value::Null, true), Formatted::Absent);
        assert_eq!(format_dict(&Value::Null), Formatted::Absent);
        assert_eq!(format_list(&Value::Null), Formatted::Absent);
        assert_eq!(format_links(&Value::Null), Formatted::Absent);
        assert_eq!(text(format_value(&json!({"gone": null}), true)), "gone: null");
    }

    #[test]
    fn test_failures_return_the_input() {
        let input = json!(["not", "a", "mapping"]);
        assert_eq!(format_dict(&input), Formatted::Raw(&input));

        let input = json!({"not": "a list"});
        assert_eq!(format_list(&input), Formatted::Raw(&input));
    }

    #[test]
    fn test_excessive_nesting_returns_the_input() {
        let mut value = json!("leaf");
        for _ in 0..(MAX_DEPTH + 5) {
            value = json!([value, "sibling"]);
        }
        assert_eq!(format_value(&value, true), Formatted::Raw(&value));
    }

    #[test]
    fn test_format_dict_lines() {
        let value = json!({"a": 1, "b": {"c": [1, 2]}, "d": []});
        assert_eq!(text(format_dict(&value)), "a: 1\nb: [c: [1, 2]]\nd: []");
    }

    #[test]
    fn test_format_list_single_element_unwraps() {
        assert_eq!(text(format_list(&json!([{"a": 1, "b": 2}]))), "a: 1\nb: 2");
        assert_eq!(text(format_list(&json!(["x"]))), "x");
    }

    #[test]
    fn test_format_list_blocks() {
        let value = json!(["a", "b", {"k": "v", "n": 1}, "c", {"x": [1, 2]}]);
        assert_eq!(
            text(format_list(&value)),
            "a, b\n\nk: v\nn: 1\n\nc\n\nx: [1, 2]"
        );
        assert_eq!(
            text(format_list(&json!([{"a": 1}, {"b": 2}]))),
            "a: 1\n\nb: 2"
        );
    }

    #[test]
    fn test_format_links() {
        let links = json!([{"rel": "self", "href": "http://x"}]);
        assert_eq!(text(format_links(&links)), "self-> http://x");

        let links = json!([
            {"rel": "self", "href": "http://x/v1/servers/1"},
            {"rel": "bookmark", "href": "http://x/servers/1"}
        ]);
        assert_eq!(
            text(format_links(&links)),
            "self-> http://x/v1/servers/1\nbookmark-> http://x/servers/1"
        );
    }

    #[test]
    fn test_malformed_links_return_the_input() {
        let input = json!([{"rel": "self"}]);
        assert_eq!(format_links(&input), Formatted::Raw(&input));
        let input = json!("http://x");
        assert_eq!(format_links(&input), Formatted::Raw(&input));
    }

    #[test]
    fn test_cells() {
        assert_eq!(format_value(&Value::Null, false).into_cell(), "");
        let input = json!([{"rel": 1}]);
        assert_eq!(format_links(&input).into_cell(), r#"[{"rel":1}]"#);
        assert_eq!(format_value(&json!(["a", "b"]), false).to_string(), "[a, b]");
    }
}
