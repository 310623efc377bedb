//! `FetchResult` — the system boundary type (spec.md §3).

use crate::antibot::AntibotDetection;
use serde::{Deserialize, Serialize};

/// The stage-level recovery hint (spec.md §3, §4.4 step 3), distinct from
/// `AntibotDetection::suggested_action`'s finer-grained per-provider enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchSuggestedAction {
    RetryWithExtract,
    WaitAndRetry,
    Skip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchResult {
    pub success: bool,
    pub url: String,
    pub latency_ms: u64,
    pub status_code: Option<u16>,

    /// The HTML body the stage actually ran extraction against, whenever one
    /// came back from the transport (success or failure) — consumed by the
    /// crawler to discover outbound links without a second request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    /// Set only when the winning result came from archive fallback
    /// (spec.md §8 "Archive fallback").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,

    /// Absent on success; one of the §7 taxonomy tags on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<FetchSuggestedAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    pub antibot: Vec<AntibotDetection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

impl FetchResult {
    pub fn success(url: impl Into<String>, latency_ms: u64, status_code: u16) -> Self {
        Self {
            success: true,
            url: url.into(),
            latency_ms,
            status_code: Some(status_code),
            ..Default::default()
        }
    }

    pub fn failure(url: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            success: false,
            url: url.into(),
            latency_ms,
            ..Default::default()
        }
    }
}
