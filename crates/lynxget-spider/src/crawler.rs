//! Bounded-concurrency BFS crawler (spec.md §4.6) driving the frontier with
//! a small worker pool, the way `riptide-spider::session` drives its crawl
//! sessions with bounded `tokio` workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use lynxget_fetch::{http_fetch_with_archive_fallback, HttpTransport};
use lynxget_types::FetchResult;

use crate::frontier::{FrontierOptions, UrlFrontier};

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub frontier: FrontierOptions,
    pub concurrency: usize,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self { frontier: FrontierOptions::default(), concurrency: 4 }
    }
}

/// Cooperative cancel flag checked by workers between items, shared across a
/// single crawl.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Crawl `seed_url` breadth-first with `transport`, extracting every visited
/// page and following its links up to the frontier's depth and page caps.
/// Returns one [`FetchResult`] per page actually fetched.
pub async fn crawl(
    transport: &dyn HttpTransport,
    seed_url: &str,
    options: CrawlOptions,
    cancel: CancelToken,
) -> Vec<FetchResult> {
    let frontier = Arc::new(UrlFrontier::new(seed_url, options.frontier));
    frontier.add(seed_url, 0);

    let mut results = Vec::new();
    let mut in_flight = FuturesUnordered::new();

    loop {
        while in_flight.len() < options.concurrency && !cancel.is_cancelled() {
            let Some(entry) = frontier.next() else { break };
            let frontier = Arc::clone(&frontier);
            in_flight.push(async move {
                let result = http_fetch_with_archive_fallback(transport, &entry.url).await;
                let links = result
                    .raw_html
                    .as_deref()
                    .map(|html| lynxget_extraction::extract_links(html, &entry.url))
                    .unwrap_or_default();
                frontier.add_all(&links, entry.depth + 1);
                result
            });
        }

        if in_flight.is_empty() {
            break;
        }

        match in_flight.next().await {
            Some(result) => {
                tracing::debug!(url = %result.url, success = result.success, "crawled page");
                results.push(result);
            }
            None => break,
        }

        if cancel.is_cancelled() && in_flight.is_empty() {
            break;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lynxget_fetch::transport::{TransportRequest, TransportResponse};
    use std::sync::Mutex as StdMutex;

    struct StubTransport {
        pages: StdMutex<std::collections::HashMap<String, String>>,
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn get(&self, url: &str, _request: &TransportRequest) -> TransportResponse {
            let pages = self.pages.lock().unwrap();
            match pages.get(url) {
                Some(html) => TransportResponse {
                    success: true,
                    status_code: 200,
                    headers: std::collections::HashMap::new(),
                    cookies: vec![],
                    html: Some(html.clone()),
                    error: None,
                },
                None => TransportResponse {
                    success: false,
                    status_code: 404,
                    headers: std::collections::HashMap::new(),
                    cookies: vec![],
                    html: None,
                    error: Some("not found".to_string()),
                },
            }
        }

        async fn post(&self, url: &str, _body: &[u8], request: &TransportRequest) -> TransportResponse {
            self.get(url, request).await
        }
    }

    #[tokio::test]
    async fn crawls_seed_and_discovered_links() {
        let article = "<html><body><article>".to_string() + &"word ".repeat(150) + "</article></body></html>";
        let mut pages = std::collections::HashMap::new();
        pages.insert(
            "https://example.com/".to_string(),
            format!(r#"<html><body><a href="/a">a</a>{article}</body></html>"#),
        );
        pages.insert("https://example.com/a".to_string(), article.clone());

        let transport = StubTransport { pages: StdMutex::new(pages) };
        let options = CrawlOptions { frontier: FrontierOptions { max_pages: 10, ..Default::default() }, concurrency: 2 };

        let results = crawl(&transport, "https://example.com/", options, CancelToken::new()).await;
        let urls: std::collections::HashSet<_> = results.iter().map(|r| r.url.clone()).collect();
        assert!(urls.contains("https://example.com/"));
        assert!(urls.contains("https://example.com/a"));
    }
}
