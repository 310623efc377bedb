//! Text-density block scorer, last resort in the orchestrator's fold
//! (spec.md §4.2 "7. Text density"). The spec leaves the exact density
//! formula as an Open Question; SPEC_FULL.md/DESIGN.md resolve it to a
//! character-to-tag-count ratio (CETD-style "composite text density"),
//! grounded on `riptide-extraction::strategies::trek::density` which scores
//! DOM blocks the same way before picking the densest one.

use lynxget_types::{ExtractionResult, MIN_CONTENT_LENGTH};
use scraper::{ElementRef, Html, Selector};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

/// Blocks unlikely to hold article prose get skipped outright rather than
/// merely scored low, since a huge low-density nav block can still out-total
/// a small dense paragraph on raw character count alone.
const SKIP_TAGS: &[&str] = &["nav", "header", "footer", "aside", "script", "style", "form"];

fn tag_count(el: ElementRef) -> usize {
    el.descendants().filter(|n| n.value().is_element()).count().max(1)
}

/// Composite text density: text length divided by tag count, weighted by raw
/// text length so a long, moderately dense block beats a short, very dense
/// one (the failure mode of unweighted density scoring).
fn density_score(el: ElementRef) -> f64 {
    let text_len = el.text().collect::<String>().trim().len() as f64;
    if text_len == 0.0 {
        return 0.0;
    }
    let tags = tag_count(el) as f64;
    (text_len / tags) * text_len.ln().max(1.0)
}

pub struct TextDensityStrategy;

impl Strategy for TextDensityStrategy {
    fn name(&self) -> &'static str {
        "text-density"
    }

    fn run(&self, html: &str, _url: &str) -> Option<ExtractionResult> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("div, section, article, main").ok()?;

        let mut best: Option<(f64, ElementRef)> = None;
        for el in document.select(&selector) {
            let tag = el.value().name();
            if SKIP_TAGS.contains(&tag) {
                continue;
            }
            if el
                .value()
                .attr("class")
                .map(|c| c.to_lowercase())
                .is_some_and(|c| SKIP_TAGS.iter().any(|t| c.contains(t)))
            {
                continue;
            }
            let score = density_score(el);
            let better = match &best {
                Some((best_score, _)) => score > *best_score,
                None => true,
            };
            if better {
                best = Some((score, el));
            }
        }

        let (_, winner) = best?;
        let content = sanitize_html(&winner.html());
        let text_content = html_to_text(&content);
        if text_content.len() < MIN_CONTENT_LENGTH {
            return None;
        }

        let mut result = ExtractionResult::new("text-density", content, text_content);
        result.title = crate::helpers::extract_title(&document);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_densest_block_over_a_larger_sparse_one() {
        let strategy = TextDensityStrategy;
        let nav_links = (0..40).map(|i| format!("<a href=\"/{i}\">Link {i}</a>")).collect::<String>();
        let paragraph = "Dense article prose with real sentences. ".repeat(15);
        let html = format!(
            "<html><body><div class=\"links\">{nav_links}</div><div class=\"body\"><p>{paragraph}</p></div></body></html>"
        );
        let result = strategy.run(&html, "https://example.com/a").unwrap();
        assert!(result.text_content.contains("Dense article prose"));
    }

    #[test]
    fn returns_none_when_nothing_clears_the_minimum() {
        let strategy = TextDensityStrategy;
        let html = "<html><body><div>hi</div></body></html>";
        assert!(strategy.run(html, "https://example.com/a").is_none());
    }
}
