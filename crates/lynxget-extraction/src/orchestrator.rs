//! Fixed-order strategy fold (spec.md §4.3), grounded on
//! `riptide-extraction::strategies::traits::StrategyRegistry::extract`'s
//! early-stop-on-good-enough fold, generalized with this spec's tie-break
//! rule and post-loop metadata/media enrichment.

use lynxget_types::ExtractionResult;

use crate::media;
use crate::strategies::{self, json_ld, Strategy};

/// Run every strategy in spec.md §4.3's fixed order against `html`, folding
/// results according to the tie-break rule: a strictly longer
/// `text_content` replaces the current winner; an equal-length result does
/// not (the earlier strategy in the fixed order keeps priority). Stops early
/// the moment a winner clears [`lynxget_types::GOOD_CONTENT_LENGTH`].
pub fn extract_from_html(html: &str, url: &str) -> Option<ExtractionResult> {
    let strategies = strategies::pipeline();
    let mut winner: Option<ExtractionResult> = None;
    let mut runners_up: Vec<ExtractionResult> = Vec::new();

    for strategy in &strategies {
        if !strategy.applies(html) {
            continue;
        }
        let Some(candidate) = strategy.run(html, url) else { continue };

        tracing::debug!(strategy = strategy.name(), len = candidate.text_content.len(), "strategy produced a result");

        match &winner {
            Some(current) if candidate.text_content.len() <= current.text_content.len() => {
                runners_up.push(candidate);
            }
            _ => {
                if let Some(previous) = winner.replace(candidate) {
                    runners_up.push(previous);
                }
            }
        }

        if winner.as_ref().is_some_and(|w| w.is_good()) {
            break;
        }
    }

    // JSON-LD rarely wins on body length (many sites omit `articleBody`
    // entirely) but is the most reliable metadata source when present, so we
    // always try to promote its fields into whichever strategy won.
    if let Some(jsonld_metadata) = json_ld::extract_jsonld_metadata(html) {
        runners_up.push(jsonld_metadata);
    }

    let mut result = winner?;
    for runner_up in &runners_up {
        result.merge_metadata_from(runner_up);
    }

    result.media = media::extract_media(&result.content, Some(url));
    result.dedup_media();

    if result.markdown.is_none() {
        result.markdown = Some(crate::markdown::html_to_markdown(&result.content));
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_through_the_pipeline_to_selector_harvest() {
        let paragraph = "Selector harvest should win here with real article text. ".repeat(15);
        let html = format!(
            "<html><head><title>Story - Example</title></head><body><div class=\"article-body\"><p>{paragraph}</p></div></body></html>"
        );
        let result = extract_from_html(&html, "https://example.com/a").unwrap();
        assert!(result.method.starts_with("selector:"));
        assert!(!result.text_content.is_empty());
        assert!(result.markdown.is_some());
    }

    #[test]
    fn promotes_json_ld_metadata_onto_a_different_winning_strategy() {
        let paragraph = "Selector-sourced body text with enough words to win. ".repeat(15);
        let html = format!(
            r#"<html><head><script type="application/ld+json">
            {{"@type":"Article","headline":"JSON Headline","datePublished":"2024-03-01"}}
            </script></head><body><div class="article-body"><p>{paragraph}</p></div></body></html>"#
        );
        let result = extract_from_html(&html, "https://example.com/a").unwrap();
        assert!(result.method.starts_with("selector:"));
        assert_eq!(result.published_time.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn returns_none_when_no_strategy_clears_the_minimum() {
        let html = "<html><body><p>too short</p></body></html>";
        assert!(extract_from_html(html, "https://example.com/a").is_none());
    }
}
