//! Outbound link extraction for the crawler frontier (spec.md §4.6),
//! following the same `scraper` idiom as `helpers.rs`.

use scraper::{Html, Selector};
use url::Url;

/// Every absolute `<a href>` target on the page, resolved against `base_url`.
/// Fragment-only and non-http(s) links (`mailto:`, `javascript:`, `tel:`)
/// are dropped.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| url.scheme() == "http" || url.scheme() == "https")
        .map(|url| url.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_links_against_base() {
        let html = r#"<a href="/a">A</a><a href="https://other.example/b">B</a>"#;
        let links = extract_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/a", "https://other.example/b"]);
    }

    #[test]
    fn drops_non_http_schemes() {
        let html = r#"<a href="mailto:a@example.com">mail</a><a href="javascript:void(0)">js</a>"#;
        let links = extract_links(html, "https://example.com/page");
        assert!(links.is_empty());
    }
}
