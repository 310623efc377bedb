//! Mozilla-Readability-style strategy (spec.md §4.2 "1. Readability"),
//! grounded on `riptide-extraction::strategies::regex_extraction` for the
//! two-pass retry idiom and wired to the `readability` crate for the actual
//! boilerplate-removal algorithm.

use std::io::Cursor;

use lynxget_types::{ExtractionResult, MIN_CONTENT_LENGTH};
use url::Url;

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

/// Acceptance bar for the relaxed second pass (spec.md §4.2/§4.3 step 1):
/// thin pages readability would otherwise reject outright under
/// [`MIN_CONTENT_LENGTH`] still clear this much lower bar before the
/// strategy gives up entirely.
const RELAXED_CONTENT_LENGTH: usize = 100;

pub struct ReadabilityStrategy;

/// Run the `readability` extractor once against `html`, returning the
/// sanitized content and its plain-text projection if it parses at all.
fn run_pass(html: &str, url: &Url) -> Option<(String, String)> {
    let mut cursor = Cursor::new(html.as_bytes().to_vec());
    let product = readability::extractor::extract(&mut cursor, url).ok()?;
    let content = sanitize_html(&product.content);
    let text_content = html_to_text(&content);
    Some((content, text_content))
}

impl Strategy for ReadabilityStrategy {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn run(&self, html: &str, url: &str) -> Option<ExtractionResult> {
        let parsed_url = Url::parse(url).ok()?;
        let (content, text_content) = run_pass(html, &parsed_url)?;

        // Strict pass: readability's default thresholds. Most articles clear
        // this on the first try.
        if text_content.len() >= MIN_CONTENT_LENGTH {
            let mut result = ExtractionResult::new("readability", content, text_content);
            result.title = crate::helpers::extract_title(&scraper::Html::parse_document(html));
            return Some(result);
        }

        // Relaxed pass: thinner pages that readability's own algorithm would
        // otherwise get rejected outright still clear a lowered bar before we
        // give up on the strategy entirely.
        if text_content.len() >= RELAXED_CONTENT_LENGTH {
            let mut result = ExtractionResult::new("readability-relaxed", content, text_content);
            result.title = crate::helpers::extract_title(&scraper::Html::parse_document(html));
            return Some(result);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_pages_with_no_extractable_article() {
        let strategy = ReadabilityStrategy;
        let html = "<html><body><p>too short</p></body></html>";
        assert!(strategy.run(html, "https://example.com/a").is_none());
    }

    #[test]
    fn accepts_a_substantial_article_body() {
        let strategy = ReadabilityStrategy;
        let paragraph = "This is a sentence with real content. ".repeat(30);
        let html = format!(
            "<html><head><title>Piece - Example</title></head><body><article><h1>Piece</h1><p>{paragraph}</p></article></body></html>"
        );
        let result = strategy.run(&html, "https://example.com/a");
        assert!(result.is_some());
        let result = result.unwrap();
        assert_eq!(result.method, "readability");
        assert!(result.text_content.len() >= MIN_CONTENT_LENGTH);
    }

    #[test]
    fn thin_article_clears_the_relaxed_pass_instead() {
        let strategy = ReadabilityStrategy;
        // Long enough to clear RELAXED_CONTENT_LENGTH (100) but short of
        // MIN_CONTENT_LENGTH (200).
        let paragraph = "Thin article body sentence. ".repeat(6);
        let html = format!(
            "<html><head><title>Brief - Example</title></head><body><article><h1>Brief</h1><p>{paragraph}</p></article></body></html>"
        );
        let result = strategy.run(&html, "https://example.com/a").unwrap();
        assert_eq!(result.method, "readability-relaxed");
        assert!(result.text_content.len() >= RELAXED_CONTENT_LENGTH);
        assert!(result.text_content.len() < MIN_CONTENT_LENGTH);
    }
}
