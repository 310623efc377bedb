//! HTTP transport contract (spec.md §6) + a `reqwest`-backed implementation,
//! grounded on
//! `riptide-fetch::adapters::reqwest_http_client::ReqwestHttpClient`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

/// One cookie observed on a response (or supplied on a request from a parsed
/// Netscape cookie file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransportRequest {
    pub headers: HashMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub timeout: Option<Duration>,
    /// Named TLS/header preset (e.g. `"chrome"`), resolved by the transport
    /// implementation; the core only ever passes it through opaquely.
    pub preset: Option<String>,
}

/// What the fetch stage actually needs back: normalized (lowercase-name)
/// headers, the cookie jar as seen by the client, and either a body or an
/// error.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub success: bool,
    pub status_code: u16,
    /// Header names are lowercased, matching the detector's case-insensitive
    /// matching contract (spec.md §6).
    pub headers: HashMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub html: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str, request: &TransportRequest) -> TransportResponse;
    async fn post(&self, url: &str, body: &[u8], request: &TransportRequest) -> TransportResponse;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    fn apply_request(&self, mut builder: reqwest::RequestBuilder, request: &TransportRequest) -> reqwest::RequestBuilder {
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.cookies.is_empty() {
            let cookie_header = request
                .cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(reqwest::header::COOKIE, cookie_header);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    async fn convert_response(resp: Result<reqwest::Response, reqwest::Error>) -> TransportResponse {
        let resp = match resp {
            Ok(resp) => resp,
            Err(err) => {
                return TransportResponse {
                    success: false,
                    status_code: 0,
                    headers: HashMap::new(),
                    cookies: Vec::new(),
                    html: None,
                    error: Some(err.to_string()),
                };
            }
        };

        let status_code = resp.status().as_u16();
        let mut headers = HashMap::new();
        let mut cookies = Vec::new();
        for (name, value) in resp.headers() {
            let Ok(value) = value.to_str() else { continue };
            if name.as_str().eq_ignore_ascii_case("set-cookie") {
                if let Some((name, value)) = value.split_once('=') {
                    cookies.push(Cookie {
                        name: name.trim().to_string(),
                        value: value.split(';').next().unwrap_or("").trim().to_string(),
                    });
                }
            }
            headers.insert(name.as_str().to_lowercase(), value.to_string());
        }

        match resp.text().await {
            Ok(html) => TransportResponse {
                success: true,
                status_code,
                headers,
                cookies,
                html: Some(html),
                error: None,
            },
            Err(err) => TransportResponse {
                success: false,
                status_code,
                headers,
                cookies,
                html: None,
                error: Some(err.to_string()),
            },
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, request: &TransportRequest) -> TransportResponse {
        let builder = self.apply_request(self.client.get(url), request);
        Self::convert_response(builder.send().await).await
    }

    async fn post(&self, url: &str, body: &[u8], request: &TransportRequest) -> TransportResponse {
        let builder = self.apply_request(self.client.post(url), request).body(body.to_vec());
        Self::convert_response(builder.send().await).await
    }
}
