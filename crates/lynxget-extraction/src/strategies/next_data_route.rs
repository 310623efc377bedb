//! Next.js `_next/data/<buildId>/<path>.json` route strategy (spec.md §4.2
//! "10. Next data route"), grounded on
//! `riptide-extraction::strategies::regex_extraction` for locating the
//! inline `__NEXT_DATA__` script. Two-phase: this module extracts the build
//! id and synthesizes the data-route URL; `lynxget-fetch` performs the `GET`
//! and hands the JSON back to [`parse_data_response`], which re-uses the
//! Nuxt/React-Router style "search for article body" traversal since Next's
//! `pageProps` shape is equally unstandardized across sites.

use serde_json::Value;
use url::Url;

use lynxget_types::{ExtractionResult, GOOD_CONTENT_LENGTH};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

/// Pull `buildId` and the route path out of an already-fetched page's
/// `__NEXT_DATA__` script, and synthesize the corresponding `_next/data`
/// JSON endpoint.
pub fn resolve_data_route(html: &str, page_url: &str) -> Option<String> {
    let document = scraper::Html::parse_document(html);
    let selector = scraper::Selector::parse(r#"script#__NEXT_DATA__"#).ok()?;
    let script = document.select(&selector).next()?;
    let raw = script.text().collect::<String>();
    let parsed: Value = serde_json::from_str(&raw).ok()?;

    let build_id = parsed.get("buildId")?.as_str()?;
    let page = Url::parse(page_url).ok()?;
    let path = page.path().trim_start_matches('/');
    let path = if path.is_empty() { "index" } else { path };

    let mut data_url = page.clone();
    data_url.set_path(&format!("/_next/data/{build_id}/{path}.json"));
    Some(data_url.to_string())
}

fn find_longest_html_string(value: &Value, depth: usize, best: &mut Option<String>) {
    if depth > 20 {
        return;
    }
    match value {
        Value::String(s) if s.len() > 200 && s.contains('<') => {
            if best.as_ref().map(|b| s.len() > b.len()).unwrap_or(true) {
                *best = Some(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                find_longest_html_string(item, depth + 1, best);
            }
        }
        Value::Object(map) => {
            for v in map.values() {
                find_longest_html_string(v, depth + 1, best);
            }
        }
        _ => {}
    }
}

/// Parse the body returned by a `GET` against [`resolve_data_route`]'s URL.
pub fn parse_data_response(body: &str) -> Option<ExtractionResult> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let page_props = parsed.get("pageProps")?;

    let mut best = None;
    find_longest_html_string(page_props, 0, &mut best);
    let raw_content = best?;

    let content = sanitize_html(&raw_content);
    let text_content = html_to_text(&content);
    if text_content.len() < GOOD_CONTENT_LENGTH {
        return None;
    }

    let mut result = ExtractionResult::new("next-data-route", content, text_content);
    result.title = page_props.get("title").and_then(|v| v.as_str()).map(str::to_string);
    Some(result)
}
