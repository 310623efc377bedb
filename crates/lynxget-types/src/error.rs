//! Error taxonomy (spec.md §7).
//!
//! Grounded on `riptide-types::errors::CoreError`: one `thiserror` variant per
//! failure mode, each carrying the shape-appropriate context the original
//! implementation's `errorDetails` object would hold.

use crate::fetch::FetchSuggestedAction;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {message}")]
    NetworkError { message: String },

    #[error("http status error: {status_code}")]
    HttpStatusError { status_code: u16 },

    #[error("unexpected content type: {content_type:?}")]
    WrongContentType { content_type: Option<String> },

    #[error("body too small: {body_size} bytes")]
    BodyTooSmall { body_size: usize },

    #[error("insufficient content: {word_count} words")]
    InsufficientContent { word_count: usize },

    #[error("rate limited (429)")]
    RateLimited,

    #[error("http error: status {status_code:?}")]
    HttpError { status_code: Option<u16> },

    #[error("extraction failed")]
    ExtractionFailed,

    #[error("invalid url for archive source: {url}")]
    InvalidUrl { url: String },

    #[error("archive source returned 404")]
    NotFound,

    #[error("archive.is has no snapshot for this url")]
    NotArchived,

    #[error("no archive source was able to serve this url")]
    NoArchiveAvailable,
}

impl FetchError {
    /// The tag this error maps to on `FetchResult::error` (spec.md §3, §7).
    pub fn tag(&self) -> &'static str {
        match self {
            FetchError::NetworkError { .. } => "network_error",
            FetchError::HttpStatusError { .. } => "http_status_error",
            FetchError::WrongContentType { .. } => "wrong_content_type",
            FetchError::BodyTooSmall { .. } => "body_too_small",
            FetchError::InsufficientContent { .. } => "insufficient_content",
            FetchError::RateLimited => "rate_limited",
            FetchError::HttpError { .. } => "http_error",
            FetchError::ExtractionFailed => "extraction_failed",
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::NotFound => "not_found",
            FetchError::NotArchived => "not_archived",
            FetchError::NoArchiveAvailable => "no_archive_available",
        }
    }

    /// Default recovery hint before any high-confidence antibot detection is
    /// allowed to override it (spec.md §4.4 step 3).
    pub fn default_suggested_action(&self) -> FetchSuggestedAction {
        match self {
            FetchError::RateLimited => FetchSuggestedAction::WaitAndRetry,
            FetchError::HttpStatusError { status_code: 403 } => FetchSuggestedAction::RetryWithExtract,
            FetchError::HttpError { status_code: Some(403) } => FetchSuggestedAction::RetryWithExtract,
            _ => FetchSuggestedAction::Skip,
        }
    }

    /// Human-readable hint string surfaced on `FetchResult::hint`.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FetchError::HttpStatusError { status_code: 403 }
            | FetchError::HttpError { status_code: Some(403) } => {
                Some("browser rendering may be required")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_spec_taxonomy() {
        assert_eq!(FetchError::RateLimited.tag(), "rate_limited");
        assert_eq!(
            FetchError::HttpStatusError { status_code: 403 }.tag(),
            "http_status_error"
        );
    }

    #[test]
    fn forbidden_status_hints_at_browser_rendering() {
        let err = FetchError::HttpStatusError { status_code: 403 };
        assert_eq!(err.hint(), Some("browser rendering may be required"));
        assert_eq!(err.default_suggested_action(), FetchSuggestedAction::RetryWithExtract);
    }
}
