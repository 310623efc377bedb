//! Fetch/validate/extract stage, archive fallback, cookie parsing, and
//! telemetry (spec.md §4.4, §4.2 "Archive fallback", §6).

pub mod archive;
pub mod cookies;
pub mod stage;
pub mod telemetry;
pub mod transport;

pub use stage::{http_fetch, http_fetch_with_archive_fallback};
pub use transport::{HttpTransport, ReqwestTransport};
