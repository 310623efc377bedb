//! Anti-bot signature detection (spec.md §4.5).
//!
//! The signature table is process-wide, read-only data — the only
//! cross-request global state the extraction pipeline carries (spec.md §5).

pub mod detector;
pub mod signature;
mod signatures_data;

pub use detector::{detect_from_html, detect_from_response, detect_from_window_results, filter_category, has_category, merge_detections};
pub use signature::{ResponseSignal, WindowProbeResult};
