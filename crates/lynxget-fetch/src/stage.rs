//! Fetch / validate / extract stage (spec.md §4.4 `http_fetch`), grounded on
//! `riptide-fetch::fetch::FetchEngine`'s single-call-plus-validation shape.

use lynxget_extraction::extract_from_html;
use lynxget_extraction::strategies::{next_data_route, wp_ajax, wp_rest};
use lynxget_stealth::{
    detect_from_html, detect_from_response, merge_detections,
    signature::{ResponseSignal as StealthSignal},
};
use lynxget_types::error::FetchError;
use lynxget_types::{AntibotDetection, FetchResult, FetchSuggestedAction, SuggestedAction};

use crate::archive;
use crate::transport::{HttpTransport, TransportRequest};

const MIN_BODY_SIZE: usize = 5 * 1024;
const MIN_VALIDATION_WORD_COUNT: usize = 100;
/// Final acceptance bar for the stage as a whole (spec.md §4.4 step 6),
/// independent of any individual strategy's own threshold.
const MIN_FINAL_TEXT_LENGTH: usize = 100;

/// A detection with confidence ≥ this threshold overrides the default
/// `suggested_action` for a 4xx response (spec.md §4.4 step 3).
const HIGH_CONFIDENCE: u8 = 90;

fn run_antibot_detection(response: &crate::transport::TransportResponse) -> Vec<AntibotDetection> {
    let headers: Vec<StealthSignal> = response
        .headers
        .iter()
        .map(|(name, value)| StealthSignal { name: name.as_str(), value: value.as_str() })
        .collect();
    let cookies: Vec<StealthSignal> = response
        .cookies
        .iter()
        .map(|c| StealthSignal { name: c.name.as_str(), value: c.value.as_str() })
        .collect();

    let mut groups = vec![detect_from_response(&headers, &cookies)];
    if let Some(html) = &response.html {
        groups.push(detect_from_html(html));
    }
    merge_detections(groups)
}

/// Maps an antibot detection's finer-grained per-provider action onto the
/// stage's 3-value recovery hint (spec.md §3).
fn map_antibot_action(action: SuggestedAction) -> FetchSuggestedAction {
    match action {
        SuggestedAction::RetryTls | SuggestedAction::TryArchive | SuggestedAction::RetryHeaders => {
            FetchSuggestedAction::RetryWithExtract
        }
        SuggestedAction::SolveCaptcha | SuggestedAction::GiveUp | SuggestedAction::Unknown => {
            FetchSuggestedAction::Skip
        }
    }
}

/// The default `suggested_action` for `error`, upgraded by a high-confidence
/// antibot detection with a known action (spec.md §4.4 step 3).
fn resolve_suggested_action(error: &FetchError, antibot: &[AntibotDetection]) -> FetchSuggestedAction {
    let default = error.default_suggested_action();
    antibot
        .iter()
        .filter(|d| d.confidence >= HIGH_CONFIDENCE)
        .find(|d| d.suggested_action != SuggestedAction::Unknown)
        .map(|d| map_antibot_action(d.suggested_action))
        .unwrap_or(default)
}

fn word_count(html: &str) -> usize {
    lynxget_extraction::count_words(&lynxget_extraction::html_to_text(html))
}

/// `quick_validate` (spec.md §4.4 step 4): status 2xx, content-type contains
/// `text/html`, body ≥ 5 KiB, stripped word count ≥ 100.
fn quick_validate(status_code: u16, content_type: Option<&str>, body: &str) -> Result<(), FetchError> {
    if !(200..300).contains(&status_code) {
        return Err(FetchError::HttpStatusError { status_code });
    }
    if let Some(content_type) = content_type {
        if !content_type.contains("text/html") {
            return Err(FetchError::WrongContentType { content_type: Some(content_type.to_string()) });
        }
    }
    if body.len() < MIN_BODY_SIZE {
        return Err(FetchError::BodyTooSmall { body_size: body.len() });
    }
    if word_count(body) < MIN_VALIDATION_WORD_COUNT {
        return Err(FetchError::InsufficientContent { word_count: word_count(body) });
    }
    Ok(())
}

/// Map a non-2xx transport outcome (or a transport-level failure) to its
/// default error + hint (spec.md §4.4 step 3).
fn classify_transport_failure(status_code: u16, transport_error: Option<&str>) -> FetchError {
    match status_code {
        0 => FetchError::NetworkError { message: transport_error.unwrap_or("unknown transport error").to_string() },
        429 => FetchError::RateLimited,
        403 => FetchError::HttpStatusError { status_code: 403 },
        _ => FetchError::HttpError { status_code: Some(status_code) },
    }
}

/// Out-of-band follow-up requests for the two-phase strategies (spec.md
/// §4.2 "WP-AJAX", "WordPress REST API", "Next.js data route"), tried in
/// that order once the synchronous pipeline in `extract_from_html` has
/// already failed or fallen short of [`MIN_FINAL_TEXT_LENGTH`].
async fn try_two_phase_strategies(
    transport: &dyn HttpTransport,
    html: &str,
    url: &str,
) -> Option<lynxget_types::ExtractionResult> {
    if let Some(request) = wp_ajax::detect(html, url) {
        let body = format!("action={}&article_id={}", request.action, request.article_id);
        let mut ajax_request = TransportRequest::default();
        ajax_request.headers.insert("content-type".to_string(), "application/x-www-form-urlencoded".to_string());
        let response = transport.post(&request.endpoint, body.as_bytes(), &ajax_request).await;
        if let Some(result) = response.html.as_deref().and_then(wp_ajax::parse_ajax_response) {
            return Some(result);
        }
    }

    if let Some(endpoint) = wp_rest::resolve_endpoint(html, url, None) {
        let response = transport.get(&endpoint, &TransportRequest::default()).await;
        if let Some(body) = response.html.as_deref() {
            if let Some(ids) = wp_rest::pmc_list_order(body) {
                let endpoints = wp_rest::pmc_list_batch_endpoints(&ids, url);
                let mut items = Vec::new();
                for batch_endpoint in endpoints {
                    let batch_response = transport.get(&batch_endpoint, &TransportRequest::default()).await;
                    if let Some(batch_body) = batch_response.html.as_deref() {
                        items.extend(wp_rest::parse_pmc_list_batch(batch_body));
                    }
                }
                if let Some(result) = wp_rest::assemble_pmc_list(&ids, &items) {
                    return Some(result);
                }
            }
            if let Some(result) = wp_rest::parse_post(body) {
                return Some(result);
            }
        }
    }

    if let Some(data_url) = next_data_route::resolve_data_route(html, url) {
        let response = transport.get(&data_url, &TransportRequest::default()).await;
        if let Some(result) = response.html.as_deref().and_then(next_data_route::parse_data_response) {
            return Some(result);
        }
    }

    None
}

/// Run the full fetch/validate/extract pipeline for one URL.
pub async fn http_fetch(transport: &dyn HttpTransport, url: &str) -> FetchResult {
    let started = std::time::Instant::now();
    let response = transport.get(url, &TransportRequest::default()).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let antibot = run_antibot_detection(&response);

    if !response.success || !(200..300).contains(&response.status_code) {
        let error = classify_transport_failure(response.status_code, response.error.as_deref());

        // Many sites serve the article beside a challenge widget; still try
        // extraction on whatever body came back (spec.md §4.4 step 5).
        if let Some(html) = &response.html {
            if let Some(result) = extract_from_html(html, url) {
                if result.text_content.len() >= MIN_FINAL_TEXT_LENGTH {
                    return success_result(url, latency_ms, response.status_code, result, antibot, Some(html));
                }
            }
        }

        return failure_result(url, latency_ms, Some(response.status_code), error, antibot, response.html.as_deref());
    }

    let Some(html) = response.html.as_deref() else {
        let error = FetchError::BodyTooSmall { body_size: 0 };
        return failure_result(url, latency_ms, Some(response.status_code), error, antibot, None);
    };

    let content_type = response.headers.get("content-type").map(|s| s.as_str());
    if let Err(error) = quick_validate(response.status_code, content_type, html) {
        // challenge/short-body failures still get a shot at extraction.
        if let Some(result) = extract_from_html(html, url) {
            if result.text_content.len() >= MIN_FINAL_TEXT_LENGTH {
                return success_result(url, latency_ms, response.status_code, result, antibot, Some(html));
            }
        }
        return failure_result(url, latency_ms, Some(response.status_code), error, antibot, Some(html));
    }

    match extract_from_html(html, url) {
        Some(result) if result.text_content.len() >= MIN_FINAL_TEXT_LENGTH => {
            success_result(url, latency_ms, response.status_code, result, antibot, Some(html))
        }
        other => {
            if let Some(result) = try_two_phase_strategies(transport, html, url).await {
                return success_result(url, latency_ms, response.status_code, result, antibot, Some(html));
            }
            let error = match other {
                Some(_) => FetchError::InsufficientContent { word_count: 0 },
                None => FetchError::ExtractionFailed,
            };
            failure_result(url, latency_ms, Some(response.status_code), error, antibot, Some(html))
        }
    }
}

/// Falls back to [`archive::fetch_from_archives`] when [`http_fetch`] fails
/// outright.
pub async fn http_fetch_with_archive_fallback(transport: &dyn HttpTransport, url: &str) -> FetchResult {
    let primary = http_fetch(transport, url).await;
    if primary.success {
        return primary;
    }

    match archive::fetch_from_archives(transport, url).await {
        Ok(page) => match extract_from_html(&page.html, url) {
            Some(mut result) if result.text_content.len() >= MIN_FINAL_TEXT_LENGTH => {
                result.method = page.method.to_string();
                result.archive_url = Some(page.archive_url);
                success_result(url, primary.latency_ms, Some(200), result, primary.antibot, Some(&page.html))
            }
            _ => failure_result(url, primary.latency_ms, None, FetchError::ExtractionFailed, primary.antibot, Some(&page.html)),
        },
        Err(error) => failure_result(url, primary.latency_ms, None, error, primary.antibot, None),
    }
}

fn success_result(
    url: &str,
    latency_ms: u64,
    status_code: u16,
    result: lynxget_types::ExtractionResult,
    antibot: Vec<AntibotDetection>,
    html: Option<&str>,
) -> FetchResult {
    let mut fetch_result = FetchResult::success(url, latency_ms, status_code);
    fetch_result.extraction_method = Some(result.method);
    fetch_result.archive_url = result.archive_url;
    fetch_result.title = result.title;
    fetch_result.text_content = Some(result.text_content);
    fetch_result.markdown = result.markdown;
    fetch_result.antibot = antibot;
    fetch_result.raw_html = html.map(str::to_string);
    fetch_result
}

fn failure_result(
    url: &str,
    latency_ms: u64,
    status_code: Option<u16>,
    error: FetchError,
    antibot: Vec<AntibotDetection>,
    html: Option<&str>,
) -> FetchResult {
    let mut fetch_result = FetchResult::failure(url, latency_ms);
    fetch_result.status_code = status_code;
    fetch_result.suggested_action = Some(resolve_suggested_action(&error, &antibot));
    fetch_result.hint = error.hint().map(str::to_string);
    fetch_result.error = Some(error.tag().to_string());
    fetch_result.antibot = antibot;
    fetch_result.raw_html = html.map(str::to_string);
    fetch_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Cookie, TransportResponse};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubTransport {
        response: TransportResponse,
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn get(&self, _url: &str, _request: &TransportRequest) -> TransportResponse {
            self.response.clone()
        }
        async fn post(&self, _url: &str, _body: &[u8], _request: &TransportRequest) -> TransportResponse {
            self.response.clone()
        }
    }

    fn article_html() -> String {
        let paragraph = "Real article sentence with a healthy amount of text in it so validation passes easily. ".repeat(80);
        format!(
            "<html><head><title>Piece - Example</title></head><body><article><h1>Piece</h1><p>{paragraph}</p></article></body></html>"
        )
    }

    #[tokio::test]
    async fn successful_fetch_extracts_and_reports_no_error() {
        let html = article_html();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html; charset=utf-8".to_string());
        let transport = StubTransport {
            response: TransportResponse {
                success: true,
                status_code: 200,
                headers,
                cookies: vec![],
                html: Some(html),
                error: None,
            },
        };

        let result = http_fetch(&transport, "https://example.com/a").await;
        assert!(result.success);
        assert!(result.error.is_none());
        assert!(result.text_content.is_some());
    }

    #[tokio::test]
    async fn forbidden_response_with_cloudflare_signals_upgrades_action() {
        let mut headers = HashMap::new();
        headers.insert("cf-ray".to_string(), "abc123".to_string());
        let transport = StubTransport {
            response: TransportResponse {
                success: true,
                status_code: 403,
                headers,
                cookies: vec![Cookie { name: "__cf_bm".to_string(), value: "x".to_string() }],
                html: Some("<html><body>Access denied</body></html>".to_string()),
                error: None,
            },
        };

        let result = http_fetch(&transport, "https://example.com/a").await;
        assert!(!result.success);
        assert_eq!(result.antibot[0].provider, "cloudflare");
        assert_eq!(result.antibot[0].confidence, 100);
        assert_eq!(result.suggested_action, Some(FetchSuggestedAction::RetryWithExtract));
    }
}
