//! Next.js React Server Components streaming-chunk strategy (spec.md §4.2
//! "4. Next RSC"), grounded on
//! `riptide-extraction::strategies::regex_extraction`'s chunk-collection
//! idiom, adapted to `self.__next_f.push(...)` call sites and a
//! natural-language heuristic to tell prose chunks apart from the
//! component-tree chunks RSC also streams.

use once_cell::sync::Lazy;
use regex::Regex;

use lynxget_types::{ExtractionResult, MIN_CONTENT_LENGTH};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

static PUSH_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"self\.__next_f\.push\(\s*(\[.*?\])\s*\)"#).unwrap());
static FUNCTION_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"function\s*\(").unwrap());
static ARROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"=>").unwrap());
/// RSC row marker: `<row id>:T<hex length>,` precedes exactly that many bytes
/// of the row's text payload. Rows are multiplexed onto the same stream and
/// a single row's bytes are sometimes split across two separate `push()`
/// calls, so this only makes sense scanned over the concatenation of every
/// push payload in document order, not per-call.
static ROW_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9a-fA-F]+):T([0-9a-fA-F]+),").unwrap());

/// Chunks of RSC's wire format are plentiful and mostly component-tree
/// structure, not prose; this heuristic keeps only chunks that look like
/// actual sentences rather than serialized React elements.
fn is_natural_language(text: &str) -> bool {
    if text.len() < 100 {
        return false;
    }
    let tag_count = text.matches('<').count();
    let tag_density = tag_count as f64 / (text.len() as f64 / 100.0);
    if tag_density >= 1.0 {
        return false;
    }
    if FUNCTION_KEYWORD.is_match(text) {
        return false;
    }
    if ARROW.find_iter(text).count() > 3 {
        return false;
    }
    let whitespace = text.chars().filter(|c| c.is_whitespace()).count();
    let ratio = whitespace as f64 / text.len() as f64;
    ratio > 0.1
}

/// `self.__next_f.push([1,"escaped string with \\n and \\\" inside"])` — the
/// payload is the second array element, still JSON-string-escaped. We avoid a
/// full JSON parse of the outer array (it isn't always valid JSON — Next
/// interleaves raw numbers with string literals) and instead pull the
/// quoted string out directly.
fn extract_push_payload(call: &str) -> Option<String> {
    let start = call.find('"')?;
    let raw = &call[start..];
    let mut chars = raw.char_indices();
    chars.next();
    let mut end = None;
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => {
                end = Some(i);
                break;
            }
            _ => {}
        }
    }
    let end = end?;
    serde_json::from_str::<String>(&raw[..=end]).ok()
}

/// Scans a concatenated push stream for `<hex>:T<hexlen>,` row markers and
/// pulls out exactly `hexlen` bytes of row content after each one. Anything
/// between the end of one row's content and the next marker (other row
/// types we don't care about — component-tree rows, refs, etc.) is simply
/// skipped over.
fn extract_text_rows(stream: &str) -> Vec<String> {
    let mut rows = Vec::new();
    let mut pos = 0;
    while let Some(caps) = ROW_MARKER.captures_at(stream, pos) {
        let marker = caps.get(0).unwrap();
        let Some(hexlen) = caps.get(2) else {
            pos = marker.end();
            continue;
        };
        let Ok(len) = usize::from_str_radix(hexlen.as_str(), 16) else {
            pos = marker.end();
            continue;
        };
        let content_start = marker.end();
        let content_end = content_start + len;
        if content_end > stream.len() || !stream.is_char_boundary(content_end) {
            pos = marker.end();
            continue;
        }
        rows.push(stream[content_start..content_end].to_string());
        pos = content_end;
    }
    rows
}

pub struct NextRscStrategy;

impl Strategy for NextRscStrategy {
    fn name(&self) -> &'static str {
        "next-rsc"
    }

    fn applies(&self, html: &str) -> bool {
        html.contains("self.__next_f.push(")
    }

    fn run(&self, html: &str, _url: &str) -> Option<ExtractionResult> {
        let mut stream = String::new();
        for captures in PUSH_CALL.captures_iter(html) {
            let Some(call) = captures.get(1) else { continue };
            if let Some(payload) = extract_push_payload(call.as_str()) {
                stream.push_str(&payload);
            }
        }

        let mut seen = std::collections::HashSet::new();
        let mut chunks = Vec::new();
        for row in extract_text_rows(&stream) {
            if !is_natural_language(&row) {
                continue;
            }
            if seen.insert(row.clone()) {
                chunks.push(row);
            }
        }

        if chunks.is_empty() {
            return None;
        }

        let joined = chunks.join("\n\n");
        let content = sanitize_html(&joined);
        let text_content = html_to_text(&content);
        if text_content.len() < MIN_CONTENT_LENGTH {
            return None;
        }

        Some(ExtractionResult::new("next-rsc", content, text_content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_natural_language_rows_and_skips_component_trees() {
        let strategy = NextRscStrategy;
        let prose = "This is a real sentence with plenty of natural language words in it, written for a reader.".repeat(2);
        let tree = r#"["$","div",null,{"children":["$","span",null,{}]}]"#;
        let row = format!("1:T{:x},{prose}", prose.len());
        let tree_row = format!("2:T{:x},{tree}", tree.len());
        let row_escaped = row.replace('"', "\\\"");
        let tree_row_escaped = tree_row.replace('"', "\\\"");
        let html = format!(
            r#"<html><body><script>self.__next_f.push([1,"{row_escaped}"])
            self.__next_f.push([1,"{tree_row_escaped}"])</script></body></html>"#
        );
        let result = strategy.run(&html, "https://example.com/a").unwrap();
        assert!(result.text_content.contains("real sentence"));
    }

    #[test]
    fn row_split_across_two_pushes_is_reassembled() {
        let strategy = NextRscStrategy;
        let prose = "This row's bytes arrive split across two separate push calls from the server stream.".repeat(2);
        let row = format!("1:T{:x},{prose}", prose.len());
        let (first_half, second_half) = row.split_at(row.len() / 2);
        let first_escaped = first_half.replace('"', "\\\"");
        let second_escaped = second_half.replace('"', "\\\"");
        let html = format!(
            r#"<html><body><script>self.__next_f.push([1,"{first_escaped}"])
            self.__next_f.push([1,"{second_escaped}"])</script></body></html>"#
        );
        let result = strategy.run(&html, "https://example.com/a").unwrap();
        assert!(result.text_content.contains("split across two separate push calls"));
    }

    #[test]
    fn absent_marker_means_strategy_does_not_apply() {
        assert!(!NextRscStrategy.applies("<html></html>"));
    }
}
