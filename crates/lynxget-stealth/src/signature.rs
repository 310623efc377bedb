//! Signature data model (spec.md §3 "Signature", §4.5), mirroring
//! `lynxget_types::antibot` but adding the matching logic itself.

use lynxget_types::{AntibotDetection, Signature};

use crate::signatures_data::SIGNATURES;

/// A single header/cookie name-value pair seen on an HTTP response, for
/// probing against [`Signature::header_patterns`]/`cookie_patterns`.
#[derive(Debug, Clone)]
pub struct ResponseSignal<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Result of a single `window.<path>` probe (only run when a caller actually
/// has a browser environment to query — out of scope for this crate's own
/// fetch path, but modeled so an eventual headless-rendering caller could
/// feed results in).
#[derive(Debug, Clone)]
pub struct WindowProbeResult<'a> {
    pub path: &'a str,
    pub exists: bool,
}

pub(crate) fn all_signatures() -> &'static [Signature] {
    &SIGNATURES
}

/// Build a detection from a signature once at least one of its patterns has
/// matched. `evidence` is the accumulated set of matched strings and
/// `confidence` the maximum pattern-confidence observed so far.
pub(crate) fn detection_from(sig: &Signature, evidence: Vec<String>, confidence: u8) -> AntibotDetection {
    AntibotDetection {
        provider: sig.id.clone(),
        name: sig.name.clone(),
        category: sig.category,
        confidence,
        evidence,
        suggested_action: sig.suggested_action,
    }
}
