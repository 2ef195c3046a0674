//! Best-effort extraction of JSON from model prose.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid regex"));
static ARRAY_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));
static OBJECT_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Returns the contents of the first fenced code block, if any.
fn fenced_block(text: &str) -> Option<&str> {
    FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

fn widest_span<'a>(text: &'a str, re: &Regex) -> Option<&'a str> {
    re.find(text).map(|m| m.as_str())
}

/// Extracts the outermost JSON array embedded in `text`.
///
/// Tries a fenced code block first, then the widest `[ ... ]` span.
/// Returns `None` when no span parses as an array.
#[must_use]
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let candidates = [
        fenced_block(text).and_then(|b| widest_span(b, &ARRAY_SPAN_RE)),
        widest_span(text, &ARRAY_SPAN_RE),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|span| match serde_json::from_str::<Value>(span) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        })
}

/// Extracts the outermost JSON object embedded in `text`.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let candidates = [
        fenced_block(text).and_then(|b| widest_span(b, &OBJECT_SPAN_RE)),
        widest_span(text, &OBJECT_SPAN_RE),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|span| match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        })
}

/// Splits a comma-separated brand list, trimming whitespace, quotes and
/// list markers and dropping empty entries.
#[must_use]
pub fn parse_brand_list(text: &str) -> Vec<String> {
    text.split([',', '\n'])
        .map(|s| {
            s.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .trim_matches(['"', '\'', '.'])
                .trim()
        })
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_inside_prose() {
        let text = r#"Here are the results:
[{"brand": "Nike", "timeline": [1, 2]}]
Let me know if you need more."#;
        let items = extract_json_array(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["brand"], "Nike");
    }

    #[test]
    fn array_inside_fenced_block() {
        let text = "```json\n[{\"brand\": \"Ford\"}]\n```\nNote: timestamps [approx].";
        let items = extract_json_array(text).unwrap();
        assert_eq!(items[0]["brand"], "Ford");
    }

    #[test]
    fn missing_or_broken_array_is_none() {
        assert!(extract_json_array("no brands found").is_none());
        assert!(extract_json_array("[{\"brand\": ").is_none());
    }

    #[test]
    fn object_inside_prose() {
        let text = "Sure! {\"placement_effectiveness_score\": 72.5} Hope this helps.";
        let map = extract_json_object(text).unwrap();
        assert_eq!(map["placement_effectiveness_score"], 72.5);
    }

    #[test]
    fn brand_list_is_trimmed_and_drops_blanks() {
        let brands = parse_brand_list("Ford, Nike ,, \"Coca-Cola\".\n- Gatorade");
        assert_eq!(brands, vec!["Ford", "Nike", "Coca-Cola", "Gatorade"]);
    }
}
