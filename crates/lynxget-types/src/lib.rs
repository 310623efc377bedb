//! Shared data model for the lynxget extraction pipeline.
//!
//! This crate has no behavior of its own — it exists to break the circular
//! dependency that would otherwise form between `lynxget-extraction`,
//! `lynxget-fetch`, and `lynxget-spider`, all of which need to speak the same
//! result types.

pub mod antibot;
mod crawler;
mod extraction;
pub mod error;
mod fetch;

pub use antibot::{AntibotDetection, DetectionCategory, Signature, SuggestedAction};
pub use crawler::FrontierEntry;
pub use extraction::{ExtractionResult, MediaElement, VideoProvider};
pub use error::FetchError;
pub use fetch::{FetchResult, FetchSuggestedAction};

/// Minimum content length a strategy must produce to report success at all.
pub const MIN_CONTENT_LENGTH: usize = 200;

/// Threshold above which the orchestrator stops trying further strategies.
pub const GOOD_CONTENT_LENGTH: usize = 500;
