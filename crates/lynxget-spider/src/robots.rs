//! Robots.txt parsing (spec.md §4.6), hand-written with deliberately narrow
//! semantics (only the `User-agent: *` group, prefix-match `Disallow`, no
//! wildcard or crawl-delay support) — see DESIGN.md for why this stays
//! hand-rolled instead of using the teacher's `robotstxt` dependency or the
//! example corpus's `texting_robots` crate.

/// What a parsed `robots.txt` gives the frontier: the `Disallow` prefixes
/// from the `User-agent: *` group, and every `Sitemap:` directive regardless
/// of which group it appeared under (per RFC 9309, sitemap directives are
/// global).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsRules {
    pub disallows: Vec<String>,
    pub sitemaps: Vec<String>,
}

fn strip_directive<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let (name, value) = line.split_once(':')?;
    if name.trim().eq_ignore_ascii_case(directive) {
        Some(value.trim())
    } else {
        None
    }
}

/// Parse `robots.txt` content, collecting `Disallow` lines from the
/// `User-agent: *` block and every `Sitemap:` directive.
pub fn parse_robots_txt(content: &str) -> RobotsRules {
    let mut rules = RobotsRules::default();
    let mut in_wildcard_group = false;

    for raw_line in content.lines() {
        let line = match raw_line.split('#').next() {
            Some(l) => l.trim(),
            None => continue,
        };
        if line.is_empty() {
            continue;
        }

        if let Some(agent) = strip_directive(line, "User-agent") {
            in_wildcard_group = agent == "*";
            continue;
        }
        if let Some(sitemap) = strip_directive(line, "Sitemap") {
            if !sitemap.is_empty() {
                rules.sitemaps.push(sitemap.to_string());
            }
            continue;
        }
        if in_wildcard_group {
            if let Some(path) = strip_directive(line, "Disallow") {
                if !path.is_empty() {
                    rules.disallows.push(path.to_string());
                }
            }
        }
    }

    rules
}

/// No `disallows` entry is a prefix of `path`.
pub fn is_allowed_by_robots(path: &str, disallows: &[String]) -> bool {
    !disallows.iter().any(|prefix| path.starts_with(prefix.as_str()))
}
