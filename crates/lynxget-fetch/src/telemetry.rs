//! Telemetry sink contract (spec.md §6): `record(site, fetch_result)`,
//! optional, enabled by an env flag, no-op otherwise. The spec places the
//! real telemetry *database* out of scope as an external collaborator; this
//! is the minimal consumed-contract stand-in. Grounded on
//! `riptide-fetch::telemetry`'s `tracing`-based instrumentation idiom, without
//! its OpenTelemetry exporter (see DESIGN.md for why that's dropped).

use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use lynxget_types::FetchResult;
use serde::Serialize;

pub trait TelemetrySink: Send + Sync {
    fn record(&self, site: &str, result: &FetchResult);
}

/// Default when no env flag is set.
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _site: &str, _result: &FetchResult) {}
}

#[derive(Serialize)]
struct TelemetryRow<'a> {
    site: &'a str,
    success: bool,
    url: &'a str,
    latency_ms: u64,
    status_code: Option<u16>,
    error: &'a Option<String>,
    antibot_providers: Vec<&'a str>,
}

/// Appends one JSON Lines row per `record` call to the file named by
/// `RECORD_E2E_DB`. Standing in for the out-of-scope telemetry database.
pub struct EnvTelemetrySink {
    file: Mutex<std::fs::File>,
}

impl EnvTelemetrySink {
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path.into())?;
        Ok(Self { file: Mutex::new(file) })
    }

    /// Builds a sink from `RECORD_E2E_DB` if set, otherwise a no-op.
    pub fn from_env() -> Box<dyn TelemetrySink> {
        match std::env::var("RECORD_E2E_DB") {
            Ok(path) if !path.is_empty() => match EnvTelemetrySink::open(&path) {
                Ok(sink) => Box::new(sink),
                Err(err) => {
                    tracing::warn!(error = %err, path, "failed to open telemetry sink, falling back to no-op");
                    Box::new(NoopTelemetrySink)
                }
            },
            _ => Box::new(NoopTelemetrySink),
        }
    }
}

impl TelemetrySink for EnvTelemetrySink {
    fn record(&self, site: &str, result: &FetchResult) {
        let row = TelemetryRow {
            site,
            success: result.success,
            url: &result.url,
            latency_ms: result.latency_ms,
            status_code: result.status_code,
            error: &result.error,
            antibot_providers: result.antibot.iter().map(|d| d.provider.as_str()).collect(),
        };

        let Ok(line) = serde_json::to_string(&row) else { return };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_never_panics() {
        let sink = NoopTelemetrySink;
        sink.record("example.com", &FetchResult::success("https://example.com", 10, 200));
    }

    #[test]
    fn env_sink_appends_json_lines() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("lynxget-telemetry-test-{:?}.jsonl", std::thread::current().id()));
        let sink = EnvTelemetrySink::open(&path).unwrap();
        sink.record("example.com", &FetchResult::success("https://example.com", 10, 200));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"site\":\"example.com\""));
        let _ = std::fs::remove_file(&path);
    }
}
