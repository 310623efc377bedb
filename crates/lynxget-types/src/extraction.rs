//! The canonical output of any extraction strategy.

use serde::{Deserialize, Serialize};

/// A single media reference discovered inside extracted content.
///
/// Ordering is document order; callers are expected to deduplicate by the
/// fully resolved URL (`src`/`href`) before returning a list to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaElement {
    Image {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Document {
        href: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        /// Lowercase, leading-dot extension, e.g. `.pdf`.
        #[serde(skip_serializing_if = "Option::is_none")]
        extension: Option<String>,
    },
    Video {
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        provider: Option<VideoProvider>,
    },
    Audio {
        src: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    Youtube,
    Vimeo,
}

impl MediaElement {
    /// The URL used for dedup and resolution purposes.
    pub fn dedup_key(&self) -> &str {
        match self {
            MediaElement::Image { src, .. } => src,
            MediaElement::Document { href, .. } => href,
            MediaElement::Video { src, .. } => src,
            MediaElement::Audio { src } => src,
        }
    }
}

/// Result produced by one extraction strategy (or the orchestrator's merge of
/// several). Absent fields mean "strategy had nothing to say", not "empty
/// string" — callers must not conflate the two.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
    pub lang: Option<String>,
    pub excerpt: Option<String>,

    /// Sanitized HTML fragment of the extracted article body.
    pub content: String,
    /// Plain-text projection of `content`; the canonical length metric used
    /// to compare strategies against each other.
    pub text_content: String,
    pub markdown: Option<String>,

    /// Opaque tag naming the winning strategy, e.g. `"readability"`,
    /// `"selector:.article-body"`, `"archive-wayback"`.
    pub method: String,
    /// Set only when the winning result came from the archive fallback.
    pub archive_url: Option<String>,

    pub is_accessible_for_free: Option<bool>,
    pub declared_word_count: Option<u32>,

    pub media: Vec<MediaElement>,
}

impl ExtractionResult {
    pub fn new(method: impl Into<String>, content: String, text_content: String) -> Self {
        Self {
            method: method.into(),
            content,
            text_content,
            ..Default::default()
        }
    }

    /// True when this result clears the orchestrator's "good enough to stop
    /// trying further strategies" bar.
    pub fn is_good(&self) -> bool {
        self.text_content.len() >= crate::GOOD_CONTENT_LENGTH
    }

    /// Fill in any metadata fields this result is missing from `other`,
    /// without ever overwriting a field this result already has. Used by the
    /// orchestrator to promote metadata from runner-up strategies into the
    /// winner.
    pub fn merge_metadata_from(&mut self, other: &ExtractionResult) {
        if self.byline.is_none() {
            self.byline = other.byline.clone();
        }
        if self.published_time.is_none() {
            self.published_time = other.published_time.clone();
        }
        if self.site_name.is_none() {
            self.site_name = other.site_name.clone();
        }
        if self.is_accessible_for_free.is_none() {
            self.is_accessible_for_free = other.is_accessible_for_free;
        }
        if self.declared_word_count.is_none() {
            self.declared_word_count = other.declared_word_count;
        }
    }

    /// Deduplicate `media` by resolved URL while preserving first-seen (i.e.
    /// document) order.
    pub fn dedup_media(&mut self) {
        let mut seen = std::collections::HashSet::with_capacity(self.media.len());
        self.media.retain(|m| seen.insert(m.dedup_key().to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_metadata_does_not_clobber_existing_fields() {
        let mut winner = ExtractionResult::new("readability", "<p>x</p>".into(), "x".into());
        winner.byline = Some("Winner Byline".into());
        let mut runner_up = ExtractionResult::new("json-ld", String::new(), String::new());
        runner_up.byline = Some("Runner Byline".into());
        runner_up.published_time = Some("2024-01-01".into());

        winner.merge_metadata_from(&runner_up);

        assert_eq!(winner.byline.as_deref(), Some("Winner Byline"));
        assert_eq!(winner.published_time.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn dedup_media_preserves_document_order() {
        let mut result = ExtractionResult::new("readability", String::new(), String::new());
        result.media = vec![
            MediaElement::Image { src: "a.png".into(), alt: None },
            MediaElement::Image { src: "b.png".into(), alt: None },
            MediaElement::Image { src: "a.png".into(), alt: Some("dup".into()) },
        ];
        result.dedup_media();
        let keys: Vec<_> = result.media.iter().map(|m| m.dedup_key()).collect();
        assert_eq!(keys, vec!["a.png", "b.png"]);
    }

    #[test]
    fn is_good_respects_threshold() {
        let mut result = ExtractionResult::new("x", String::new(), "a".repeat(499));
        assert!(!result.is_good());
        result.text_content = "a".repeat(500);
        assert!(result.is_good());
    }
}
