//! `application/ld+json` structured-data strategy (spec.md §4.2 "5. JSON-LD"),
//! grounded on `riptide-extraction::strategies::metadata_extraction`'s
//! schema.org traversal idiom.

use lynxget_types::{ExtractionResult, MIN_CONTENT_LENGTH};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

const ARTICLE_TYPES: &[&str] =
    &["Article", "NewsArticle", "BlogPosting", "WebPage", "ReportageNewsArticle"];

pub struct JsonLdStrategy;

/// Flatten `@graph` arrays and bare top-level arrays into a single list of
/// candidate objects.
fn flatten_candidates(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(flatten_candidates).collect(),
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                flatten_candidates(graph)
            } else {
                vec![value]
            }
        }
        _ => Vec::new(),
    }
}

fn type_matches(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => ARTICLE_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .any(|t| ARTICLE_TYPES.contains(&t)),
        _ => false,
    }
}

fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Schema.org `author` can be a string, an object with `name`, or a list of
/// either.
fn extract_byline(obj: &Value) -> Option<String> {
    match obj.get("author") {
        Some(Value::String(name)) => Some(name.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Object(_)) => string_field(obj.get("author").unwrap(), "name"),
        Some(Value::Array(items)) => {
            let names: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(_) => string_field(item, "name"),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        _ => None,
    }
}

/// Schema.org's `isAccessibleForFree` is sometimes a bool, sometimes the
/// string `"True"`/`"False"`.
pub fn detect_is_accessible_for_free(obj: &Value) -> Option<bool> {
    match obj.get("isAccessibleForFree") {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Pull the metadata fields worth promoting into a winning result even when
/// this strategy's body text doesn't win outright.
pub fn extract_jsonld_metadata(html: &str) -> Option<ExtractionResult> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        let Ok(parsed) = serde_json::from_str::<Value>(&raw) else { continue };
        for candidate in flatten_candidates(&parsed) {
            if !type_matches(candidate) {
                continue;
            }
            let mut result = ExtractionResult::new("json-ld", String::new(), String::new());
            result.title = string_field(candidate, "headline").or_else(|| string_field(candidate, "name"));
            result.byline = extract_byline(candidate);
            result.published_time = string_field(candidate, "datePublished");
            result.site_name = candidate
                .get("publisher")
                .and_then(|p| string_field(p, "name"));
            result.is_accessible_for_free = detect_is_accessible_for_free(candidate);
            result.declared_word_count = candidate.get("wordCount").and_then(Value::as_u64).map(|n| n as u32);
            let body = string_field(candidate, "articleBody")
                .or_else(|| string_field(candidate, "text"))
                .or_else(|| string_field(candidate, "description"));
            if let Some(body) = body {
                result.content = sanitize_html(&body);
                result.text_content = html_to_text(&result.content);
            }
            return Some(result);
        }
    }

    None
}

impl Strategy for JsonLdStrategy {
    fn name(&self) -> &'static str {
        "json-ld"
    }

    fn applies(&self, html: &str) -> bool {
        html.contains("application/ld+json")
    }

    fn run(&self, html: &str, _url: &str) -> Option<ExtractionResult> {
        let result = extract_jsonld_metadata(html)?;
        if result.text_content.len() < MIN_CONTENT_LENGTH {
            return None;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_html(body: &str) -> String {
        format!(
            r#"<html><head><script type="application/ld+json">
            {{"@type":"NewsArticle","headline":"Big Story","author":{{"name":"Jane Doe"}},
            "datePublished":"2024-02-01","publisher":{{"name":"Example Daily"}},
            "isAccessibleForFree":"False","wordCount":250,"articleBody":"{body}"}}
            </script></head><body></body></html>"#
        )
    }

    #[test]
    fn extracts_full_metadata_and_body() {
        let body = "Paragraph text. ".repeat(20);
        let html = sample_html(&body);
        let result = extract_jsonld_metadata(&html).unwrap();
        assert_eq!(result.title.as_deref(), Some("Big Story"));
        assert_eq!(result.byline.as_deref(), Some("Jane Doe"));
        assert_eq!(result.site_name.as_deref(), Some("Example Daily"));
        assert_eq!(result.is_accessible_for_free, Some(false));
        assert_eq!(result.declared_word_count, Some(250));
    }

    #[test]
    fn strategy_rejects_short_bodies() {
        let strategy = JsonLdStrategy;
        let html = sample_html("short");
        assert!(strategy.run(&html, "https://example.com/a").is_none());
    }

    #[test]
    fn falls_back_to_text_then_description_when_article_body_absent() {
        let paragraph = "Plain text field content. ".repeat(20);
        let html = format!(
            r#"<html><head><script type="application/ld+json">
            {{"@type":"NewsArticle","headline":"Big Story","text":"{paragraph}"}}
            </script></head><body></body></html>"#
        );
        let result = extract_jsonld_metadata(&html).unwrap();
        assert!(result.text_content.contains("Plain text field content"));

        let description = "Description field content. ".repeat(20);
        let html = format!(
            r#"<html><head><script type="application/ld+json">
            {{"@type":"NewsArticle","headline":"Big Story","description":"{description}"}}
            </script></head><body></body></html>"#
        );
        let result = extract_jsonld_metadata(&html).unwrap();
        assert!(result.text_content.contains("Description field content"));
    }
}
