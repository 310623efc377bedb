//! Anti-bot signature and detection data model (spec.md §3, §4.5).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionCategory {
    Antibot,
    Captcha,
    Fingerprint,
    BotDetection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestedAction {
    RetryTls,
    TryArchive,
    RetryHeaders,
    SolveCaptcha,
    GiveUp,
    Unknown,
}

/// One detected anti-bot/CAPTCHA/fingerprinting provider, surfaced in
/// `FetchResult::antibot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntibotDetection {
    /// Stable identifier, e.g. `"cloudflare"`.
    pub provider: String,
    pub name: String,
    pub category: DetectionCategory,
    /// 0-100.
    pub confidence: u8,
    /// Strings identifying what matched (header name, cookie name, HTML
    /// substring description, ...).
    pub evidence: Vec<String>,
    pub suggested_action: SuggestedAction,
}

/// A matcher against a cookie or header *name*.
#[derive(Debug, Clone)]
pub enum NamePattern {
    Substring(String),
    Regex(String),
}

/// A matcher against HTML/body *content*.
#[derive(Debug, Clone)]
pub struct ContentPattern {
    pub pattern: ContentPatternKind,
    pub confidence: u8,
    pub description: String,
}

#[derive(Debug, Clone)]
pub enum ContentPatternKind {
    Substring(String),
    Regex(String),
}

#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub pattern: NamePattern,
    pub confidence: u8,
}

#[derive(Debug, Clone)]
pub struct WindowPattern {
    /// Dot-path into the window-probe result, e.g. `"navigator.webdriver"`.
    pub path: String,
    pub confidence: u8,
}

/// Static, declarative pattern bundle used to identify one protection
/// provider. The full table is process-wide, read-only data (spec.md §5).
#[derive(Debug, Clone)]
pub struct Signature {
    pub id: String,
    pub name: String,
    pub category: DetectionCategory,
    pub suggested_action: SuggestedAction,
    pub cookie_patterns: Vec<NamedPattern>,
    pub header_patterns: Vec<NamedPattern>,
    pub content_patterns: Vec<ContentPattern>,
    pub window_patterns: Vec<WindowPattern>,
}
