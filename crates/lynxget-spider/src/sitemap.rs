//! Sitemap XML parsing (spec.md §4.6), grounded directly on
//! `riptide-spider::sitemap::SitemapParser`'s use of
//! `xml::reader::{EventReader, XmlEvent}`, but tracking element context
//! properly (the teacher's version is explicitly a "simplified parser" that
//! doesn't) so `<loc>`/`<lastmod>`/`<priority>` are attributed to the right
//! `<url>` entry.

use xml::reader::{EventReader, XmlEvent};

const MAX_RECURSION_DEPTH: u32 = 2;
const MAX_TOTAL_ENTRIES: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub last_modified: Option<String>,
    pub priority: Option<f64>,
}

enum ParsedSitemap {
    UrlSet(Vec<SitemapEntry>),
    SitemapIndex(Vec<String>),
}

/// Only `http(s)` `<loc>`s are kept (spec.md §6).
fn is_http_loc(loc: &str) -> bool {
    loc.starts_with("http://") || loc.starts_with("https://")
}

fn parse_xml(content: &str) -> ParsedSitemap {
    let parser = EventReader::from_str(content);

    let mut stack: Vec<String> = Vec::new();
    let mut current_text = String::new();

    let mut url_entries = Vec::new();
    let mut sitemap_locs = Vec::new();

    let mut current_loc: Option<String> = None;
    let mut current_lastmod: Option<String> = None;
    let mut current_priority: Option<f64> = None;
    let mut in_urlset = false;
    let mut in_sitemapindex = false;

    for event in parser {
        match event {
            Ok(XmlEvent::StartElement { name, .. }) => {
                let tag = name.local_name.clone();
                match tag.as_str() {
                    "urlset" => in_urlset = true,
                    "sitemapindex" => in_sitemapindex = true,
                    "url" | "sitemap" => {
                        current_loc = None;
                        current_lastmod = None;
                        current_priority = None;
                    }
                    _ => {}
                }
                stack.push(tag);
                current_text.clear();
            }
            Ok(XmlEvent::Characters(data)) | Ok(XmlEvent::CData(data)) => {
                current_text.push_str(&data);
            }
            Ok(XmlEvent::EndElement { name }) => {
                let tag = name.local_name.as_str();
                let text = current_text.trim().to_string();
                current_text.clear();

                match tag {
                    "loc" => current_loc = Some(text),
                    "lastmod" => current_lastmod = Some(text),
                    "priority" => current_priority = text.parse().ok(),
                    "url" if in_urlset => {
                        if let Some(loc) = current_loc.take() {
                            if is_http_loc(&loc) {
                                url_entries.push(SitemapEntry {
                                    loc,
                                    last_modified: current_lastmod.take(),
                                    priority: current_priority.take(),
                                });
                            }
                        }
                    }
                    "sitemap" if in_sitemapindex => {
                        if let Some(loc) = current_loc.take() {
                            if is_http_loc(&loc) {
                                sitemap_locs.push(loc);
                            }
                        }
                    }
                    _ => {}
                }
                stack.pop();
            }
            Err(err) => {
                tracing::debug!(error = %err, "sitemap xml parse error, stopping early");
                break;
            }
            _ => {}
        }
    }

    if in_sitemapindex {
        ParsedSitemap::SitemapIndex(sitemap_locs)
    } else {
        ParsedSitemap::UrlSet(url_entries)
    }
}

/// Parse `content` as either a `<urlset>` or a `<sitemapindex>`, recursing
/// into child sitemaps up to [`MAX_RECURSION_DEPTH`], with a global entry cap
/// of [`MAX_TOTAL_ENTRIES`] and a per-call visited set to avoid cycles.
pub async fn parse_sitemap_recursive(
    fetch_child: &dyn Fn(&str) -> futures::future::BoxFuture<'_, Option<String>>,
    content: &str,
    depth: u32,
    visited: &mut std::collections::HashSet<String>,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::new();

    match parse_xml(content) {
        ParsedSitemap::UrlSet(found) => {
            for entry in found {
                if entries.len() >= MAX_TOTAL_ENTRIES {
                    break;
                }
                entries.push(entry);
            }
        }
        ParsedSitemap::SitemapIndex(locs) => {
            if depth >= MAX_RECURSION_DEPTH {
                tracing::debug!(depth, "sitemap recursion depth cap reached");
                return entries;
            }
            for loc in locs {
                if entries.len() >= MAX_TOTAL_ENTRIES {
                    break;
                }
                if !visited.insert(loc.clone()) {
                    continue;
                }
                if let Some(child_content) = fetch_child(&loc).await {
                    let child_entries =
                        Box::pin(parse_sitemap_recursive(fetch_child, &child_content, depth + 1, visited)).await;
                    entries.extend(child_entries);
                }
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urlset_entries_with_correct_field_attribution() {
        let content = r#"<?xml version="1.0"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/a</loc><lastmod>2024-01-01</lastmod><priority>0.8</priority></url>
          <url><loc>https://example.com/b</loc><priority>0.2</priority></url>
        </urlset>"#;
        match parse_xml(content) {
            ParsedSitemap::UrlSet(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].loc, "https://example.com/a");
                assert_eq!(entries[0].last_modified.as_deref(), Some("2024-01-01"));
                assert_eq!(entries[0].priority, Some(0.8));
                assert_eq!(entries[1].last_modified, None);
            }
            _ => panic!("expected urlset"),
        }
    }

    #[test]
    fn parses_sitemapindex_locs() {
        let content = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
          <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
        </sitemapindex>"#;
        match parse_xml(content) {
            ParsedSitemap::SitemapIndex(locs) => {
                assert_eq!(locs, vec!["https://example.com/sitemap-1.xml", "https://example.com/sitemap-2.xml"]);
            }
            _ => panic!("expected sitemapindex"),
        }
    }

    #[test]
    fn ignores_non_http_locs() {
        let content = r#"<urlset><url><loc>ftp://example.com/a</loc></url></urlset>"#;
        match parse_xml(content) {
            ParsedSitemap::UrlSet(entries) => assert!(entries.is_empty()),
            _ => panic!("expected urlset"),
        }
    }
}
