//! Fixed-priority CSS selector harvest (spec.md §4.2 "6. Selector harvest"),
//! grounded on `riptide-extraction::strategies::css_json::DEFAULT_CONTENT_SELECTORS`.

use lynxget_types::{ExtractionResult, MIN_CONTENT_LENGTH};
use scraper::{Html, Selector};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

/// Tried in order; the first selector that yields enough text wins.
const SELECTORS: &[&str] = &[
    "article",
    "main article",
    "[role=main] article",
    ".article-content",
    ".article-body",
    ".post-content",
    ".entry-content",
    ".story-body",
    "#article-body",
    "[itemprop=articleBody]",
    "main",
    "[role=main]",
];

pub struct SelectorHarvestStrategy;

impl Strategy for SelectorHarvestStrategy {
    fn name(&self) -> &'static str {
        "selector"
    }

    fn run(&self, html: &str, _url: &str) -> Option<ExtractionResult> {
        let document = Html::parse_document(html);

        for raw_selector in SELECTORS {
            let Ok(selector) = Selector::parse(raw_selector) else { continue };
            let Some(el) = document.select(&selector).next() else { continue };

            let content = sanitize_html(&el.html());
            let text_content = html_to_text(&content);
            if text_content.len() < MIN_CONTENT_LENGTH {
                continue;
            }

            let mut result =
                ExtractionResult::new(format!("selector:{raw_selector}"), content, text_content);
            result.title = crate::helpers::extract_title(&document);
            return Some(result);
        }

        None
    }
}
