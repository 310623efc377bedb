//! Shared metadata helpers used by several strategies (spec.md §4.2).

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

fn select_one(document: &Html, selector: &str) -> Option<scraper::ElementRef<'_>> {
    Selector::parse(selector).ok().and_then(|sel| document.select(&sel).next())
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    select_one(document, selector)
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

static TITLE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[-–—]\s*[^-–—]+$").unwrap());

/// Prefers `og:title`, then `<title>` with the site-name suffix trimmed off,
/// then the first `<h1>`.
pub fn extract_title(document: &Html) -> Option<String> {
    if let Some(og) = meta_content(document, r#"meta[property="og:title"]"#) {
        return Some(og);
    }
    if let Some(title_el) = select_one(document, "title") {
        let raw = title_el.text().collect::<String>();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let without_suffix = TITLE_SUFFIX.replace(trimmed, "");
            let candidate = without_suffix.trim();
            if !candidate.is_empty() {
                return Some(candidate.to_string());
            }
            return Some(trimmed.to_string());
        }
    }
    select_one(document, "h1").map(|el| el.text().collect::<String>().trim().to_string()).filter(|s| !s.is_empty())
}

/// `og:site_name`.
pub fn extract_site_name(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="og:site_name"]"#)
}

/// Tries, in order: `article:published_time`, `pubdate`, `publishdate`,
/// `date`, then `<time datetime>`.
pub fn extract_published_time(document: &Html) -> Option<String> {
    for selector in [
        r#"meta[property="article:published_time"]"#,
        r#"meta[name="pubdate"]"#,
        r#"meta[name="publishdate"]"#,
        r#"meta[name="date"]"#,
    ] {
        if let Some(value) = meta_content(document, selector) {
            return Some(value);
        }
    }
    select_one(document, "time[datetime]")
        .and_then(|el| el.value().attr("datetime"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

const EXCERPT_LENGTH: usize = 200;

/// Truncates `text` at `EXCERPT_LENGTH` characters plus an ellipsis when no
/// explicit excerpt was supplied.
pub fn generate_excerpt(explicit: Option<&str>, text: &str) -> Option<String> {
    if let Some(explicit) = explicit {
        let trimmed = explicit.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let char_count = trimmed.chars().count();
    if char_count <= EXCERPT_LENGTH {
        return Some(trimmed.to_string());
    }
    let truncated: String = trimmed.chars().take(EXCERPT_LENGTH).collect();
    Some(format!("{truncated}..."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_og_title() {
        let html = r#"<html><head><meta property="og:title" content="Breaking News"><title>Other - Site</title></head></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(extract_title(&doc).as_deref(), Some("Breaking News"));
    }

    #[test]
    fn title_falls_back_to_tag_with_suffix_trimmed() {
        let html = "<html><head><title>My Article - My Site</title></head></html>";
        let doc = Html::parse_document(html);
        assert_eq!(extract_title(&doc).as_deref(), Some("My Article"));
    }

    #[test]
    fn title_falls_back_to_h1() {
        let html = "<html><body><h1>Headline Here</h1></body></html>";
        let doc = Html::parse_document(html);
        assert_eq!(extract_title(&doc).as_deref(), Some("Headline Here"));
    }

    #[test]
    fn excerpt_truncates_long_text() {
        let text = "a".repeat(250);
        let excerpt = generate_excerpt(None, &text).unwrap();
        assert_eq!(excerpt.chars().count(), EXCERPT_LENGTH + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn excerpt_prefers_explicit_value() {
        assert_eq!(generate_excerpt(Some("hand-written"), "ignored"), Some("hand-written".to_string()));
    }
}
