//! WordPress REST API (`/wp-json/wp/v2/posts`) strategy (spec.md §4.2
//! "9. WP-REST"), grounded on `riptide-extraction::strategies::css_json`'s
//! JSON-response-to-`ExtractionResult` mapping idiom. Two-phase like
//! [`super::wp_ajax`]: this module only builds the request(s) and parses the
//! response(s); `lynxget-fetch` performs the actual `GET`s.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use lynxget_types::{ExtractionResult, GOOD_CONTENT_LENGTH};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

const MAX_PMC_LIST_ITEMS: usize = 200;
const PMC_LIST_BATCH_SIZE: usize = 50;

static LINK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)<link\b[^>]*>"#).unwrap());
static ATTR_REL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\brel\s*=\s*["']([^"']*)["']"#).unwrap());
static ATTR_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\btype\s*=\s*["']([^"']*)["']"#).unwrap());
static ATTR_HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']*)["']"#).unwrap());

/// `<link rel="alternate" type="application/json" href="...">` discovery,
/// attribute-order independent since publishers emit these in either order.
fn discover_alternate_json_link(html: &str) -> Option<String> {
    for m in LINK_TAG.find_iter(html) {
        let tag = m.as_str();
        let rel = ATTR_REL.captures(tag).and_then(|c| c.get(1)).map(|v| v.as_str().to_lowercase());
        let ty = ATTR_TYPE.captures(tag).and_then(|c| c.get(1)).map(|v| v.as_str().to_lowercase());
        if rel.as_deref() == Some("alternate") && ty.as_deref() == Some("application/json") {
            if let Some(href) = ATTR_HREF.captures(tag).and_then(|c| c.get(1)) {
                return Some(href.as_str().to_string());
            }
        }
    }
    None
}

fn append_embed(endpoint: &str) -> String {
    if endpoint.contains('?') {
        format!("{endpoint}&_embed")
    } else {
        format!("{endpoint}?_embed")
    }
}

/// Endpoint resolution, in fallback order (spec.md §4.2): discover an
/// alternate JSON link in the page itself, then a site-configured
/// `wp_json_api_path` with the URL slug appended, then the standard
/// `/wp-json/wp/v2/posts?slug=<slug>` route. Always appends `_embed`.
pub fn resolve_endpoint(html: &str, page_url: &str, wp_json_api_path: Option<&str>) -> Option<String> {
    if let Some(href) = discover_alternate_json_link(html) {
        return Some(append_embed(&href));
    }

    let mut url = Url::parse(page_url).ok()?;
    let slug = url.path_segments()?.filter(|s| !s.is_empty()).next_back()?.to_string();

    if let Some(base) = wp_json_api_path {
        if let Ok(mut custom) = Url::parse(base) {
            custom.query_pairs_mut().clear().append_pair("slug", &slug);
            return Some(append_embed(&custom.to_string()));
        }
    }

    url.set_path("/wp-json/wp/v2/posts");
    url.query_pairs_mut().clear().append_pair("slug", &slug);
    Some(append_embed(&url.to_string()))
}

/// `utm_campaign=api` in a returned `content.rendered` link is WordPress.com's
/// marker for a truncated, paywalled preview rather than the full body; we
/// reject it rather than silently accepting partial content as if it were
/// complete (an Open Question SPEC_FULL.md resolves this way — see
/// DESIGN.md).
fn looks_truncated(rendered: &str) -> bool {
    rendered.contains("utm_campaign=api")
}

/// Pulls the single post object out of any of the three response shapes the
/// WP REST API is seen returning in practice: a bare array, `{posts:[...]}`,
/// or a single object.
fn first_post(parsed: &Value) -> Option<&Value> {
    if let Some(arr) = parsed.as_array() {
        return arr.first();
    }
    if let Some(posts) = parsed.get("posts").and_then(Value::as_array) {
        return posts.first();
    }
    Some(parsed)
}

pub fn parse_post(body: &str) -> Option<ExtractionResult> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let post = first_post(&parsed)?;

    let rendered = post.get("content")?.get("rendered")?.as_str()?;
    if looks_truncated(rendered) {
        tracing::warn!("wp-rest response looks paywall-truncated (utm_campaign=api), rejecting");
        return None;
    }

    let content = sanitize_html(rendered);
    let text_content = html_to_text(&content);
    if text_content.len() < GOOD_CONTENT_LENGTH {
        return None;
    }

    let mut result = ExtractionResult::new("wp-rest-api", content, text_content);
    result.title = post
        .get("title")
        .and_then(|t| t.get("rendered"))
        .and_then(|v| v.as_str())
        .map(|s| html_to_text(s));
    result.published_time = post.get("date").and_then(|v| v.as_str()).map(str::to_string);
    Some(result)
}

/// Reads `meta.pmc_list_order` off the same response body [`parse_post`] was
/// given, capped at [`MAX_PMC_LIST_ITEMS`]. `None` when the post isn't a PMC
/// multi-post list.
pub fn pmc_list_order(body: &str) -> Option<Vec<u64>> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let post = first_post(&parsed)?;
    let ids = post.get("meta")?.get("pmc_list_order")?.as_array()?;
    let ids: Vec<u64> = ids.iter().filter_map(Value::as_u64).collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids.into_iter().take(MAX_PMC_LIST_ITEMS).collect())
}

/// Batches `ids` into `/wp-json/wp/v2/pmc_list_item?include=...` requests of
/// up to [`PMC_LIST_BATCH_SIZE`] ids each, against the same origin as
/// `page_url`.
pub fn pmc_list_batch_endpoints(ids: &[u64], page_url: &str) -> Vec<String> {
    let Ok(mut url) = Url::parse(page_url) else { return Vec::new() };
    url.set_path("/wp-json/wp/v2/pmc_list_item");
    ids.chunks(PMC_LIST_BATCH_SIZE)
        .map(|chunk| {
            let include = chunk.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            let mut batch_url = url.clone();
            batch_url.query_pairs_mut().clear().append_pair("include", &include);
            batch_url.to_string()
        })
        .collect()
}

/// Parses one `pmc_list_item` batch response into `(id, rendered content)`
/// pairs; batch responses aren't guaranteed to preserve request order.
pub fn parse_pmc_list_batch(body: &str) -> Vec<(u64, String)> {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else { return Vec::new() };
    let Some(items) = parsed.as_array() else { return Vec::new() };
    items
        .iter()
        .filter_map(|item| {
            let id = item.get("id")?.as_u64()?;
            let rendered = item.get("content")?.get("rendered")?.as_str()?;
            Some((id, rendered.to_string()))
        })
        .collect()
}

/// Concatenates PMC list item bodies in `ids`' original order (not the
/// order batch responses happened to return them in) into one result.
pub fn assemble_pmc_list(ids: &[u64], items: &[(u64, String)]) -> Option<ExtractionResult> {
    let by_id: std::collections::HashMap<u64, &str> =
        items.iter().map(|(id, body)| (*id, body.as_str())).collect();

    let mut rendered_parts = Vec::new();
    for id in ids {
        if let Some(body) = by_id.get(id) {
            if !looks_truncated(body) {
                rendered_parts.push(*body);
            }
        }
    }
    if rendered_parts.is_empty() {
        return None;
    }

    let content = sanitize_html(&rendered_parts.join(""));
    let text_content = html_to_text(&content);
    if text_content.len() < GOOD_CONTENT_LENGTH {
        return None;
    }

    Some(ExtractionResult::new("wp-rest-api-pmc-list", content, text_content))
}
