//! Media element extraction, applied to the orchestrator's final sanitized
//! content (spec.md §4.3).

use lynxget_types::MediaElement;
use scraper::{Html, Selector};
use url::Url;

fn resolve(base: Option<&Url>, raw: &str) -> String {
    match base {
        Some(base) => base.join(raw).map(|u| u.to_string()).unwrap_or_else(|_| raw.to_string()),
        None => raw.to_string(),
    }
}

fn video_provider(url: &str) -> Option<lynxget_types::VideoProvider> {
    let lower = url.to_lowercase();
    if lower.contains("youtube.com") || lower.contains("youtu.be") {
        Some(lynxget_types::VideoProvider::Youtube)
    } else if lower.contains("vimeo.com") {
        Some(lynxget_types::VideoProvider::Vimeo)
    } else {
        None
    }
}

const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".csv", ".txt",
];

fn document_extension(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let lower = path.to_lowercase();
    DOCUMENT_EXTENSIONS.iter().find(|ext| lower.ends_with(*ext)).map(|ext| ext.to_string())
}

/// Walk sanitized `html`, collecting `<img>`, `<a href>` (to document-like
/// extensions), `<video>`/`<source>`, and `<audio>` elements in document
/// order, with URLs resolved against `base_url`. Deduplication is left to the
/// caller (`ExtractionResult::dedup_media`).
pub fn extract_media(html: &str, base_url: Option<&str>) -> Vec<MediaElement> {
    let base = base_url.and_then(|u| Url::parse(u).ok());
    let document = Html::parse_fragment(html);
    let mut media = Vec::new();

    if let Ok(selector) = Selector::parse("img, a, video, source, audio") {
        for el in document.select(&selector) {
            let value = el.value();
            match value.name() {
                "img" => {
                    if let Some(src) = value.attr("src") {
                        media.push(MediaElement::Image {
                            src: resolve(base.as_ref(), src),
                            alt: value.attr("alt").map(|s| s.to_string()),
                        });
                    }
                }
                "a" => {
                    if let Some(href) = value.attr("href") {
                        if let Some(extension) = document_extension(href) {
                            media.push(MediaElement::Document {
                                href: resolve(base.as_ref(), href),
                                text: Some(el.text().collect::<String>().trim().to_string())
                                    .filter(|s| !s.is_empty()),
                                extension: Some(extension),
                            });
                        }
                    }
                }
                "video" => {
                    if let Some(src) = value.attr("src") {
                        let resolved = resolve(base.as_ref(), src);
                        media.push(MediaElement::Video { provider: video_provider(&resolved), src: resolved });
                    }
                }
                "source" => {
                    // only treat <source> as a video source when inside a
                    // <video> parent; scraper's ElementRef gives us access to
                    // ancestors for that check.
                    let inside_video = el
                        .ancestors()
                        .filter_map(scraper::ElementRef::wrap)
                        .any(|a| a.value().name() == "video");
                    if inside_video {
                        if let Some(src) = value.attr("src") {
                            let resolved = resolve(base.as_ref(), src);
                            media.push(MediaElement::Video { provider: video_provider(&resolved), src: resolved });
                        }
                    }
                }
                "audio" => {
                    if let Some(src) = value.attr("src") {
                        media.push(MediaElement::Audio { src: resolve(base.as_ref(), src) });
                    }
                }
                _ => {}
            }
        }
    }

    media
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_images_with_alt_and_resolves_urls() {
        let html = r#"<p><img src="/a.png" alt="alt text"></p>"#;
        let media = extract_media(html, Some("https://example.com/article"));
        assert_eq!(media.len(), 1);
        match &media[0] {
            MediaElement::Image { src, alt } => {
                assert_eq!(src, "https://example.com/a.png");
                assert_eq!(alt.as_deref(), Some("alt text"));
            }
            _ => panic!("expected image"),
        }
    }

    #[test]
    fn extracts_pdf_documents_but_not_plain_links() {
        let html = r#"<a href="/report.pdf">Report</a><a href="/page">Page</a>"#;
        let media = extract_media(html, Some("https://example.com/"));
        assert_eq!(media.len(), 1);
        match &media[0] {
            MediaElement::Document { href, extension, .. } => {
                assert_eq!(href, "https://example.com/report.pdf");
                assert_eq!(extension.as_deref(), Some(".pdf"));
            }
            _ => panic!("expected document"),
        }
    }

    #[test]
    fn detects_youtube_provider() {
        let html = r#"<video src="https://www.youtube.com/watch?v=xyz"></video>"#;
        let media = extract_media(html, None);
        match &media[0] {
            MediaElement::Video { provider, .. } => {
                assert_eq!(*provider, Some(lynxget_types::VideoProvider::Youtube))
            }
            _ => panic!("expected video"),
        }
    }

    #[test]
    fn preserves_document_order() {
        let html = r#"<img src="a.png"><img src="b.png">"#;
        let media = extract_media(html, None);
        let srcs: Vec<_> = media.iter().map(|m| m.dedup_key().to_string()).collect();
        assert_eq!(srcs, vec!["a.png", "b.png"]);
    }
}
