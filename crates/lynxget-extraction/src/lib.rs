//! Multi-strategy article extraction (spec.md §4).
//!
//! The only entry point most callers need is [`orchestrator::extract_from_html`];
//! everything else here is either a building block it uses internally or a
//! two-phase strategy (`strategies::wp_ajax`, `strategies::wp_rest`,
//! `strategies::next_data_route`) whose follow-up request is issued by
//! `lynxget-fetch`.

pub mod helpers;
pub mod links;
pub mod markdown;
pub mod media;
pub mod orchestrator;
pub mod sanitize;
pub mod strategies;
pub mod text;

pub use links::extract_links;
pub use orchestrator::extract_from_html;
pub use sanitize::sanitize_html;
pub use text::{count_words, get_nested_value, html_to_text};
