//! HTML fragment sanitizer (spec.md §4.1).
//!
//! Uses `lol_html`'s streaming rewriter — declared as a teacher dependency but
//! never exercised in the filtered pack — which is exactly the right tool for
//! "delete this element, strip that attribute" style sanitization, the same
//! way `element!` handlers are used to strip boilerplate in the wider example
//! corpus (`other_examples/.../trek/src/lib.rs`).

use lol_html::{element, rewrite_str, RewriteStrSettings};
use once_cell::sync::Lazy;
use regex::Regex;

/// Elements that must never survive sanitization (spec.md §3 invariants).
const DANGEROUS_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "applet", "base", "link", "meta", "svg",
    "math", "form", "template",
];

static DANGEROUS_SELECTOR: Lazy<String> = Lazy::new(|| DANGEROUS_TAGS.join(", "));

static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x20]+").unwrap());

/// `true` if, after stripping ASCII whitespace/control characters, the value
/// begins with one of the dangerous URI schemes (case-insensitive).
fn has_dangerous_uri_scheme(value: &str) -> bool {
    let stripped = CONTROL_CHARS.replace_all(value, "");
    let lower = stripped.to_lowercase();
    lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:")
}

fn is_dangerous_attribute(name: &str, value: &str) -> bool {
    let lower_name = name.to_lowercase();
    lower_name.starts_with("on") || lower_name == "formaction" || has_dangerous_uri_scheme(value)
}

/// Strip dangerous elements and attributes from an HTML fragment.
///
/// Empty input returns empty output. The result never contains `<script>`,
/// `<style>`, `<iframe>`, ..., `on*` attributes, `formaction`, or
/// `javascript:`/`vbscript:`/`data:` URIs (spec.md §3 invariants, §8.1, §8.8).
pub fn sanitize_html(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }

    let settings = RewriteStrSettings {
        element_content_handlers: vec![
            element!(DANGEROUS_SELECTOR.as_str(), |el| {
                el.remove();
                Ok(())
            }),
            element!("*", |el| {
                let to_remove: Vec<String> = el
                    .attributes()
                    .iter()
                    .filter(|attr| is_dangerous_attribute(attr.name().as_str(), attr.value().as_str()))
                    .map(|attr| attr.name())
                    .collect();
                for name in to_remove {
                    el.remove_attribute(&name);
                }
                Ok(())
            }),
        ],
        ..RewriteStrSettings::default()
    };

    match rewrite_str(fragment, settings) {
        Ok(sanitized) => sanitized,
        Err(err) => {
            tracing::debug!(error = %err, "sanitize_html: rewrite failed, returning empty fragment");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(sanitize_html(""), "");
        assert_eq!(sanitize_html("   "), "");
    }

    #[test]
    fn strips_script_and_style() {
        let out = sanitize_html("<p>hi</p><script>alert(1)</script><style>body{}</style>");
        assert!(!out.contains("<script"));
        assert!(!out.contains("<style"));
        assert!(out.contains("hi"));
    }

    #[test]
    fn strips_event_handler_attributes() {
        let out = sanitize_html(r#"<img src="x.png" onerror="alert(1)">"#);
        assert!(!out.to_lowercase().contains("onerror"));
        assert!(out.contains("x.png"));
    }

    #[test]
    fn strips_javascript_uri_even_with_whitespace() {
        let out = sanitize_html(r#"<a href="jav&#09;ascript:alert(1)">x</a>"#);
        // lol_html decodes entities on output; the raw "javascript:" scheme
        // (once whitespace is stripped) must not survive.
        let lower = out.to_lowercase();
        let collapsed: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
        assert!(!collapsed.contains("href=\"javascript:"));
    }

    #[test]
    fn strips_data_uri_with_control_chars() {
        let out = sanitize_html("<a href=\"data:\ttext/html,<script>\">x</a>");
        assert!(!out.contains("href=\"data:"));
    }

    #[test]
    fn is_idempotent() {
        let once = sanitize_html(r#"<p onclick="x()">hi</p><iframe src="//evil"></iframe>"#);
        let twice = sanitize_html(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn strips_formaction() {
        let out = sanitize_html(r#"<button formaction="javascript:alert(1)">go</button>"#);
        assert!(!out.to_lowercase().contains("formaction"));
    }

    #[test]
    fn removes_svg_and_math() {
        let out = sanitize_html("<svg><script>1</script></svg><math></math><p>ok</p>");
        assert!(!out.contains("<svg"));
        assert!(!out.contains("<math"));
        assert!(out.contains("ok"));
    }
}
