//! HTML-to-Markdown conversion (spec.md §6 "markdown converter contract"),
//! grounded on `riptide-extraction::strategies::regex_extraction`'s use of
//! `html2md` for the same purpose.

/// Convert a sanitized HTML fragment to Markdown. Never panics: `html2md`
/// already stripped script/style by the time this runs (the sanitizer ran
/// first), but even malformed fragments degrade to plain text rather than
/// erroring, matching the contract's "never throws" requirement.
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    html2md::parse_html(html).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(html_to_markdown(""), "");
        assert_eq!(html_to_markdown("   "), "");
    }

    #[test]
    fn converts_basic_structure() {
        let markdown = html_to_markdown("<h1>Title</h1><p>Body text</p>");
        assert!(markdown.contains("Title"));
        assert!(markdown.contains("Body text"));
    }
}
