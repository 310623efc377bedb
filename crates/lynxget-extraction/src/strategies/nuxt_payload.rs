//! Nuxt's flattened `__NUXT_DATA__` hydration-array parser (spec.md §4.2
//! "3. Nuxt payload"), grounded on
//! `riptide-extraction::strategies::regex_extraction`'s regex-locate +
//! serde_json::from_str idiom for inline script payloads, generalized from
//! that strategy's single-pattern match to Nuxt's index-pair scheme.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use lynxget_types::{ExtractionResult, GOOD_CONTENT_LENGTH};

use crate::sanitize::sanitize_html;
use crate::text::html_to_text;

use super::Strategy;

static NUXT_DATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<script[^>]*\bid="__NUXT_DATA__"[^>]*>(.*?)</script>"#).unwrap()
});

/// Tags promoted to block-level wrappers when a Nuxt payload entry names
/// them; anything already block-level (`p`, `div`, `ul`, …) passes through
/// unchanged.
fn wrap_tag(tag: &str) -> &'static str {
    match tag {
        "header" | "subheader" => "h2",
        "blockquote" | "pullquote" => "blockquote",
        "paragraph" => "p",
        other if matches!(other, "p" | "div" | "ul" | "ol" | "figure" | "table") => "p",
        _ => "p",
    }
}

const SKIP_BLOCK_TYPES: &[&str] = &["ad", "related", "promo", "newsletter", "top25list"];

/// Nuxt's devalue-flattened array stores every value once and refers back to
/// it by index. Article body blocks show up as `{"type": idx, "html": idx}`
/// objects scattered anywhere in that array — not at fixed positions, and
/// with unrelated flattened values (strings, numbers, other objects)
/// interleaved between them. We don't implement the full devalue format
/// (circular refs, Map/Set/Date wrappers) — just enough to find those block
/// objects and resolve their two indices, which is all article bodies need.
fn resolve(arr: &[Value], idx: usize) -> Option<&Value> {
    arr.get(idx)
}

fn as_str<'a>(arr: &'a [Value], idx_val: &Value) -> Option<&'a str> {
    let idx = idx_val.as_u64()? as usize;
    resolve(arr, idx)?.as_str()
}

pub struct NuxtPayloadStrategy;

impl Strategy for NuxtPayloadStrategy {
    fn name(&self) -> &'static str {
        "nuxt-payload"
    }

    fn applies(&self, html: &str) -> bool {
        html.contains("__NUXT_DATA__")
    }

    fn run(&self, html: &str, _url: &str) -> Option<ExtractionResult> {
        let captures = NUXT_DATA.captures(html)?;
        let raw = captures.get(1)?.as_str().trim();
        let parsed: Value = serde_json::from_str(raw).ok()?;
        let arr = parsed.as_array()?;

        let mut blocks = Vec::new();
        for item in arr {
            let Value::Object(map) = item else { continue };
            let (Some(type_slot), Some(html_slot)) = (map.get("type"), map.get("html")) else {
                continue;
            };
            let Some(type_val) = resolve_str(arr, type_slot) else { continue };
            if SKIP_BLOCK_TYPES.contains(&type_val.to_lowercase().as_str()) {
                continue;
            }
            let Some(body) = resolve_str(arr, html_slot) else { continue };
            if body.trim().is_empty() {
                continue;
            }
            let tag = wrap_tag(&type_val.to_lowercase());
            blocks.push(format!("<{tag}>{body}</{tag}>"));
        }

        if blocks.is_empty() {
            return None;
        }

        let content = sanitize_html(&blocks.join(""));
        let text_content = html_to_text(&content);
        if text_content.len() < GOOD_CONTENT_LENGTH {
            return None;
        }

        Some(ExtractionResult::new("nuxt-payload", content, text_content))
    }
}

fn resolve_str<'a>(arr: &'a [Value], value: &Value) -> Option<&'a str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Number(_) => as_str(arr, value),
        _ => None,
    }
}
