//! Four-probe-surface signature matching (spec.md §4.5).

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use lynxget_types::{
    antibot::{ContentPatternKind, NamePattern},
    AntibotDetection,
};

use crate::signature::{all_signatures, detection_from, ResponseSignal, WindowProbeResult};

fn compile_case_insensitive(pattern: &str) -> Option<Regex> {
    RegexBuilder::new(pattern).case_insensitive(true).build().ok()
}

static REGEX_CACHE: Lazy<std::sync::Mutex<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| std::sync::Mutex::new(HashMap::new()));

fn cached_regex(pattern: &str) -> Option<Regex> {
    let mut cache = REGEX_CACHE.lock().unwrap();
    cache
        .entry(pattern.to_string())
        .or_insert_with(|| compile_case_insensitive(pattern))
        .clone()
}

fn name_matches(pattern: &NamePattern, candidate: &str) -> bool {
    match pattern {
        NamePattern::Substring(s) => candidate.to_lowercase().contains(&s.to_lowercase()),
        NamePattern::Regex(pattern) => cached_regex(pattern).is_some_and(|re| re.is_match(candidate)),
    }
}

fn content_matches(pattern: &ContentPatternKind, html: &str) -> bool {
    match pattern {
        ContentPatternKind::Substring(s) => html.to_lowercase().contains(&s.to_lowercase()),
        ContentPatternKind::Regex(pattern) => cached_regex(pattern).is_some_and(|re| re.is_match(html)),
    }
}

/// Match response `headers`/`cookies` against the signature table's header
/// and cookie patterns. Evidence accumulates the matched name; confidence is
/// the maximum confidence seen across all matching patterns for that
/// signature.
pub fn detect_from_response(headers: &[ResponseSignal], cookies: &[ResponseSignal]) -> Vec<AntibotDetection> {
    let mut out = Vec::new();
    for sig in all_signatures() {
        let mut evidence = Vec::new();
        let mut confidence = 0u8;

        for cookie in cookies {
            for pattern in &sig.cookie_patterns {
                if name_matches(&pattern.pattern, cookie.name) {
                    evidence.push(cookie.name.to_string());
                    confidence = confidence.max(pattern.confidence);
                }
            }
        }
        for header in headers {
            for pattern in &sig.header_patterns {
                if name_matches(&pattern.pattern, header.name) {
                    evidence.push(header.name.to_string());
                    confidence = confidence.max(pattern.confidence);
                }
            }
        }

        if !evidence.is_empty() {
            out.push(detection_from(sig, evidence, confidence));
        }
    }

    out.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    out
}

/// Match `html` against the signature table's content patterns.
pub fn detect_from_html(html: &str) -> Vec<AntibotDetection> {
    let mut out = Vec::new();
    for sig in all_signatures() {
        let mut evidence = Vec::new();
        let mut confidence = 0u8;

        for pattern in &sig.content_patterns {
            if content_matches(&pattern.pattern, html) {
                evidence.push(pattern.description.clone());
                confidence = confidence.max(pattern.confidence);
            }
        }

        if !evidence.is_empty() {
            out.push(detection_from(sig, evidence, confidence));
        }
    }

    out.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    out
}

/// Match a browser's `window.<path>` probe results (supplied by a caller
/// with access to a rendered page) against the signature table's window
/// patterns, by set membership of paths that resolved `exists = true`.
pub fn detect_from_window_results(results: &[WindowProbeResult]) -> Vec<AntibotDetection> {
    let existing: std::collections::HashSet<&str> =
        results.iter().filter(|r| r.exists).map(|r| r.path).collect();

    let mut out = Vec::new();
    for sig in all_signatures() {
        let mut evidence = Vec::new();
        let mut confidence = 0u8;

        for pattern in &sig.window_patterns {
            if existing.contains(pattern.path.as_str()) {
                evidence.push(pattern.path.clone());
                confidence = confidence.max(pattern.confidence);
            }
        }

        if !evidence.is_empty() {
            out.push(detection_from(sig, evidence, confidence));
        }
    }

    out.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    out
}

/// Union detections from multiple probe surfaces by provider: evidence lists
/// are set-unioned, confidence is maxed, and the result is re-sorted by
/// confidence descending.
pub fn merge_detections(groups: Vec<Vec<AntibotDetection>>) -> Vec<AntibotDetection> {
    let mut by_provider: HashMap<String, AntibotDetection> = HashMap::new();

    for detection in groups.into_iter().flatten() {
        by_provider
            .entry(detection.provider.clone())
            .and_modify(|existing| {
                existing.confidence = existing.confidence.max(detection.confidence);
                for item in &detection.evidence {
                    if !existing.evidence.contains(item) {
                        existing.evidence.push(item.clone());
                    }
                }
            })
            .or_insert(detection);
    }

    let mut merged: Vec<_> = by_provider.into_values().collect();
    merged.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    merged
}

/// Detections in [`DetectionCategory::Captcha`] / `Antibot`, etc.
pub fn filter_category(
    detections: &[AntibotDetection],
    category: lynxget_types::DetectionCategory,
) -> Vec<AntibotDetection> {
    detections.iter().filter(|d| d.category == category).cloned().collect()
}

pub fn has_category(detections: &[AntibotDetection], category: lynxget_types::DetectionCategory) -> bool {
    detections.iter().any(|d| d.category == category)
}
