//! Strategy implementations (spec.md §4.2).
//!
//! Each strategy is a pure function `(&str, &str) -> Option<ExtractionResult>`
//! — no shared mutable state, no I/O — matching spec.md §5's "single-threaded,
//! synchronous, and pure" requirement for the extraction core. Strategy
//! polymorphism is modeled as a trait object folded over a fixed slice,
//! grounded on `riptide-extraction::strategies::traits::StrategyRegistry`.

pub mod json_ld;
pub mod next_data_route;
pub mod next_rsc;
pub mod nuxt_payload;
pub mod react_router;
pub mod readability;
pub mod selector;
pub mod text_density;
pub mod wp_ajax;
pub mod wp_rest;

use lynxget_types::ExtractionResult;

/// One extraction technique.
pub trait Strategy: Send + Sync {
    /// Opaque name used as a log/debug label. Strategies that parametrize on
    /// a CSS selector embed it in the `method` field of their result instead
    /// (e.g. `"selector:.article-body"`), not here.
    fn name(&self) -> &'static str;

    /// Whether this strategy should even be attempted against `html` (cheap
    /// gate, e.g. "contains `__NUXT_DATA__`"), checked by the orchestrator
    /// before calling `run` so unrelated hydration-payload parsers don't pay
    /// for a failed regex scan on every page.
    fn applies(&self, _html: &str) -> bool {
        true
    }

    fn run(&self, html: &str, url: &str) -> Option<ExtractionResult>;
}

/// The fixed, ordered list the orchestrator folds over (spec.md §4.3).
pub fn pipeline() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(readability::ReadabilityStrategy),
        Box::new(react_router::ReactRouterHydrationStrategy),
        Box::new(nuxt_payload::NuxtPayloadStrategy),
        Box::new(next_rsc::NextRscStrategy),
        Box::new(json_ld::JsonLdStrategy),
        Box::new(selector::SelectorHarvestStrategy),
        Box::new(text_density::TextDensityStrategy),
    ]
}
