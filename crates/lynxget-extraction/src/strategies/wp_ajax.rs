//! WordPress `admin-ajax.php` strategy (spec.md §4.2 "8. WP-AJAX").
//!
//! This strategy is two-phase: the pure detection half lives here (no I/O,
//! matching spec.md §5's purity rule for the extraction core); the actual
//! `POST` to `ajaxurl` is performed by `lynxget-fetch`'s fetch stage, which
//! calls [`parse_ajax_response`] once it has the body back. Grounded on
//! `riptide-extraction::strategies::regex_extraction`'s inline-script
//! constant scraping.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use url::Url;

use lynxget_types::{ExtractionResult, GOOD_CONTENT_LENGTH};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

static AJAX_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"ajaxurl\s*=\s*["']([^"']+)["']"#).unwrap());
static ACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r#"action["']?\s*:\s*["']([^"']+)["']"#).unwrap());
/// `article_id`, `articleId`, or `post_id`, whose value is either a digit run
/// or a UUID (publishers generate either depending on their CMS).
static ARTICLE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:article_id|articleId|post_id)["']?\s*:\s*["']?([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}|\d+)"#).unwrap()
});

/// Content-loading AJAX actions this strategy recognizes; an inline
/// `ajaxurl`/`action` wiring whose action isn't on this list is far more
/// likely to be some unrelated AJAX call (analytics, comments, voting) than
/// an article-body loader, so we don't guess at arbitrary action names.
const KNOWN_ACTIONS: &[&str] = &[
    "load_article",
    "load_content",
    "get_article_content",
    "load_post_content",
    "get_post_content",
    "pmc_load_article",
];

/// What the fetch stage needs to perform the follow-up `POST`.
#[derive(Debug, Clone, PartialEq)]
pub struct AjaxRequest {
    pub endpoint: String,
    pub action: String,
    pub article_id: String,
}

/// Detect an inline WP-AJAX content loader and build the request the fetch
/// stage should issue. Returns `None` when the page doesn't wire up
/// `ajaxurl`/`action`/`article_id` the way this strategy expects, or when the
/// ajax endpoint isn't same-origin with `page_url` (refusing to build a
/// cross-origin request here is the strategy's only defense against SSRF;
/// the fetch stage must still re-validate before dialing out).
pub fn detect(html: &str, page_url: &str) -> Option<AjaxRequest> {
    let endpoint = AJAX_URL.captures(html)?.get(1)?.as_str().to_string();
    let action = ACTION.captures(html)?.get(1)?.as_str().to_string();
    if !KNOWN_ACTIONS.contains(&action.as_str()) {
        return None;
    }
    let article_id = ARTICLE_ID.captures(html)?.get(1)?.as_str().to_string();

    let page = Url::parse(page_url).ok()?;
    let resolved = page.join(&endpoint).ok()?;
    if resolved.origin() != page.origin() {
        return None;
    }

    Some(AjaxRequest { endpoint: resolved.to_string(), action, article_id })
}

/// Parse the JSON body returned by the `POST` the fetch stage made against
/// [`AjaxRequest::endpoint`]. WP-AJAX handlers commonly wrap the payload in
/// `{"success": true, "data": {"content": "..."}}`.
pub fn parse_ajax_response(body: &str) -> Option<ExtractionResult> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let data = parsed.get("data").unwrap_or(&parsed);
    let raw_content = data
        .get("content")
        .or_else(|| data.get("html"))
        .and_then(|v| v.as_str())?;

    let content = sanitize_html(raw_content);
    let text_content = html_to_text(&content);
    if text_content.len() < GOOD_CONTENT_LENGTH {
        return None;
    }

    let mut result = ExtractionResult::new("wp-ajax-content", content, text_content);
    result.title = data.get("title").and_then(|v| v.as_str()).map(str::to_string);
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_same_origin_ajax_wiring() {
        let html = r#"<script>var ajaxurl = "/wp-admin/admin-ajax.php"; var action = "load_article"; var article_id = "42";</script>"#;
        let request = detect(html, "https://example.com/news/story").unwrap();
        assert_eq!(request.endpoint, "https://example.com/wp-admin/admin-ajax.php");
        assert_eq!(request.action, "load_article");
        assert_eq!(request.article_id, "42");
    }

    #[test]
    fn refuses_cross_origin_endpoints() {
        let html = r#"<script>var ajaxurl = "https://evil.example/admin-ajax.php"; var action = "load_article"; var article_id = "42";</script>"#;
        assert!(detect(html, "https://example.com/news/story").is_none());
    }

    #[test]
    fn refuses_actions_outside_the_known_list() {
        let html = r#"<script>var ajaxurl = "/wp-admin/admin-ajax.php"; var action = "vote_on_poll"; var article_id = "42";</script>"#;
        assert!(detect(html, "https://example.com/news/story").is_none());
    }

    #[test]
    fn detects_camel_case_article_id_key_and_uuid_value() {
        let html = r#"<script>var ajaxurl = "/wp-admin/admin-ajax.php"; var action = "load_content"; var articleId = "550e8400-e29b-41d4-a716-446655440000";</script>"#;
        let request = detect(html, "https://example.com/news/story").unwrap();
        assert_eq!(request.article_id, "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn detects_post_id_key_variant() {
        let html = r#"<script>var ajaxurl = "/wp-admin/admin-ajax.php"; var action = "get_post_content"; var post_id = "99";</script>"#;
        let request = detect(html, "https://example.com/news/story").unwrap();
        assert_eq!(request.article_id, "99");
    }

    #[test]
    fn parses_wrapped_success_data_envelope() {
        let paragraph = "Article sentence with real words in it. ".repeat(15);
        let body = serde_json::json!({"success": true, "data": {"title": "Headline", "content": format!("<p>{paragraph}</p>")}}).to_string();
        let result = parse_ajax_response(&body).unwrap();
        assert_eq!(result.title.as_deref(), Some("Headline"));
    }
}
