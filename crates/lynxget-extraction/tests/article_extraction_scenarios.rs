//! Literal scenarios from spec.md §8: the Readability path, JSON-LD metadata
//! merge on top of it, and the Nuxt payload strategy.

use lynxget_extraction::extract_from_html;

fn readability_article(extra_head: &str) -> String {
    let paragraphs = (0..6)
        .map(|i| format!("<p>Paragraph {i} carries real article prose with enough distinct words to clear the extraction thresholds comfortably. It keeps going for a while so the total body text is well over five kilobytes across all six paragraphs combined.</p>"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<html><head><title>Other - Example Daily</title>\
         <meta property=\"og:title\" content=\"Breaking News\">{extra_head}</head>\
         <body><article><h1>Breaking News</h1>{paragraphs}</article></body></html>"
    )
}

#[test]
fn readability_path_matches_the_literal_scenario() {
    let html = readability_article("");
    let result = extract_from_html(&html, "https://example.com/a").unwrap();

    assert!(result.title.as_deref().unwrap().contains("Breaking"));
    assert!(result.method == "readability" || result.method == "readability-relaxed");
    assert!(result.text_content.len() > 500);
    assert!(result.markdown.is_some());
    assert!(lynxget_extraction::count_words(&result.text_content) > 50);
}

#[test]
fn json_ld_metadata_merges_onto_the_readability_winner() {
    let json_ld = r#"<script type="application/ld+json">
        {"@type":"Article","headline":"Breaking News","wordCount":250,
         "isAccessibleForFree":false,"author":{"name":"Jane Reporter"}}
        </script>"#;
    let html = readability_article(json_ld);
    let result = extract_from_html(&html, "https://example.com/a").unwrap();

    assert_eq!(result.is_accessible_for_free, Some(false));
    assert_eq!(result.declared_word_count, Some(250));
    assert_eq!(result.byline.as_deref(), Some("Jane Reporter"));
}

#[test]
fn nuxt_payload_wraps_headers_and_drops_ad_blocks() {
    let paragraph = "Real Nuxt-sourced article sentence with plenty of substance in it. ".repeat(15);
    let payload = serde_json::json!([
        "header", "Section One",
        "paragraph", paragraph.clone(),
        "paragraph", paragraph.clone(),
        "paragraph", paragraph,
        "ad", "<iframe src=\"https://ads.example.com\"></iframe>",
    ]);
    let html = format!(
        "<html><body><script id=\"__NUXT_DATA__\" type=\"application/json\">{payload}</script></body></html>"
    );

    let result = extract_from_html(&html, "https://example.com/a").unwrap();

    assert_eq!(result.method, "nuxt-payload");
    assert!(result.content.contains("<h2>"));
    assert!(!result.content.contains("<iframe"));
}
