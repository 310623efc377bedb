//! React Router SSR hydration payload strategy (spec.md §4.2 "2. React
//! Router"), grounded on `riptide-extraction::strategies::regex_extraction`
//! for the regex-locate-then-JSON-decode idiom, generalized to the
//! double-encoded `JSON.parse("...")` wrapper React Router emits and a
//! depth-limited walk of `loaderData` (spec.md §9: "tagged-variant JSON
//! traversal with depth <= 20").

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use lynxget_types::{ExtractionResult, GOOD_CONTENT_LENGTH};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

const MAX_DEPTH: usize = 20;

static HYDRATION_DATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"window\.__staticRouterHydrationData\s*=\s*JSON\.parse\((".*?")\);?"#).unwrap()
});

/// A plausible article body needs at least one actual content tag, not just
/// any `<` (which would also match comparison operators, arrow-adjacent
/// punctuation, or stray markup fragments in unrelated loader data).
static CONTENT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(p|div|h[1-6]|ul|ol|li|blockquote|figure|img|a|em|strong)[\s>]").unwrap());

/// React Router double-encodes the payload: the script assigns the result of
/// `JSON.parse` on a JSON-encoded *string*, so we decode twice.
fn decode_hydration_data(html: &str) -> Option<Value> {
    let captures = HYDRATION_DATA.captures(html)?;
    let quoted = captures.get(1)?.as_str();
    let inner: String = serde_json::from_str(quoted).ok()?;
    serde_json::from_str(&inner).ok()
}

/// Depth-limited search for the longest plausible article-body HTML string
/// anywhere under `loaderData`, since the loader key naming isn't
/// standardized across apps. Tracks the nearest enclosing object of the
/// current-best string alongside it, since that's where its metadata lives.
fn find_longest_html_string<'a>(
    value: &'a Value,
    parent: Option<&'a Value>,
    depth: usize,
    best: &mut Option<(String, &'a Value)>,
) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::String(s) => {
            if s.len() > 200 && CONTENT_TAG.is_match(s) {
                let is_longer = best.as_ref().map(|(b, _)| s.len() > b.len()).unwrap_or(true);
                if is_longer {
                    if let Some(p) = parent {
                        *best = Some((s.clone(), p));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                find_longest_html_string(item, parent, depth + 1, best);
            }
        }
        Value::Object(map) => {
            for (_, v) in map {
                find_longest_html_string(v, Some(value), depth + 1, best);
            }
        }
        _ => {}
    }
}

fn dotted<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, seg| v.get(seg))
}

fn first_str(value: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|p| dotted(value, p)?.as_str().map(str::to_string))
}

/// Resolves `<array_path>[].{name_key}` — the first item in the array at
/// `array_path` that has a string `name_key` field.
fn array_first_name(value: &Value, array_path: &str, name_key: &str) -> Option<String> {
    let arr = dotted(value, array_path)?.as_array()?;
    arr.iter().find_map(|item| item.get(name_key)?.as_str().map(str::to_string))
}

/// Extracts metadata from the parent object of the winning article-body
/// string, following the field-priority fallback chains the different loader
/// shapes use in practice.
fn extract_metadata(parent: &Value, result: &mut ExtractionResult) {
    if result.title.is_none() {
        result.title = first_str(parent, &["headlines.headline", "headline", "title", "name"]);
    }
    if result.byline.is_none() {
        result.byline = first_str(parent, &["byline"])
            .or_else(|| array_first_name(parent, "authors", "name"))
            .or_else(|| array_first_name(parent, "participants.authors", "name"))
            .or_else(|| first_str(parent, &["author"]));
    }
    if result.excerpt.is_none() {
        result.excerpt = first_str(parent, &["about", "description", "excerpt", "summary"]);
    }
    if result.published_time.is_none() {
        result.published_time = first_str(
            parent,
            &["dates.firstPublished", "dates.published", "datePublished", "publishedAt", "publishedTime"],
        );
    }
}

pub struct ReactRouterHydrationStrategy;

impl Strategy for ReactRouterHydrationStrategy {
    fn name(&self) -> &'static str {
        "react-router-hydration"
    }

    fn applies(&self, html: &str) -> bool {
        html.contains("__staticRouterHydrationData")
    }

    fn run(&self, html: &str, _url: &str) -> Option<ExtractionResult> {
        let root = decode_hydration_data(html)?;
        let loader_data = root.get("loaderData")?;

        let mut best: Option<(String, &Value)> = None;
        find_longest_html_string(loader_data, None, 0, &mut best);
        let (body, parent) = best?;

        let content = sanitize_html(&body);
        let text_content = html_to_text(&content);
        if text_content.len() < GOOD_CONTENT_LENGTH {
            return None;
        }

        let mut result = ExtractionResult::new("react-router-hydration", content, text_content);
        extract_metadata(parent, &mut result);
        Some(result)
    }
}
