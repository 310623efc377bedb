//! Plain-text projection, CJK-aware word counting, and guarded dot-path JSON
//! traversal (spec.md §4.1).

use scraper::Html;
use serde_json::Value;

/// Parse `fragment` and return its root text content, trimmed.
pub fn html_to_text(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }
    let document = Html::parse_fragment(fragment);
    document.root_element().text().collect::<String>().trim().to_string()
}

/// CJK code-point ranges that don't use whitespace as a word separator
/// (spec.md §4.1).
fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7AF
        | 0xFF00..=0xFFEF
    )
}

/// Count words in `text`, inserting implicit word boundaries around CJK
/// characters so `count_words("这是一个测试")` counts each character as its
/// own token (spec.md §8.5).
pub fn count_words(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let mut spaced = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if is_cjk(c) {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }
    spaced.split_whitespace().filter(|s| !s.is_empty()).count()
}

/// Segments that may never appear in a dot-path, guarding against prototype
/// pollution (spec.md §3, §8.2).
const FORBIDDEN_SEGMENTS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Step through `path` (dot-separated) inside `obj`. Returns `None` if any
/// intermediate value isn't a JSON object, or if any segment is a forbidden
/// dunder name.
pub fn get_nested_value<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = obj;
    for segment in path.split('.') {
        if FORBIDDEN_SEGMENTS.contains(&segment) {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_to_text_trims_and_collapses_markup() {
        assert_eq!(html_to_text("  <p>Hello <b>world</b></p>  "), "Hello world");
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("   "), "");
    }

    #[test]
    fn count_words_handles_cjk_and_mixed() {
        assert_eq!(count_words("这是一个测试"), 6);
        assert_eq!(count_words("hello 这是 world"), 4);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("one two three"), 3);
    }

    #[test]
    fn nested_value_walks_dotted_path() {
        let obj = json!({"a": {"b": {"c": 42}}});
        assert_eq!(get_nested_value(&obj, "a.b.c"), Some(&json!(42)));
        assert_eq!(get_nested_value(&obj, "a.b.missing"), None);
    }

    #[test]
    fn nested_value_rejects_dunder_segments() {
        let obj = json!({"a": {"__proto__": {"polluted": true}}});
        assert_eq!(get_nested_value(&obj, "a.__proto__.polluted"), None);
        assert_eq!(get_nested_value(&obj, "a.constructor.x"), None);
        assert_eq!(get_nested_value(&obj, "prototype.x"), None);
    }

    #[test]
    fn nested_value_none_when_not_an_object() {
        let obj = json!({"a": "not an object"});
        assert_eq!(get_nested_value(&obj, "a.b"), None);
    }
}
