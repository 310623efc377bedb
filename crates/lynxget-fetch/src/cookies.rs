//! Netscape cookie file parsing (spec.md §6), hand-written — no teacher or
//! corpus crate targets this exact format.

use crate::transport::Cookie;

/// One row of a Netscape cookie file.
#[derive(Debug, Clone, PartialEq)]
pub struct NetscapeCookie {
    pub domain: String,
    pub include_subdomains: bool,
    pub path: String,
    pub secure: bool,
    /// Unix seconds; `0` means a session cookie.
    pub expires: i64,
    pub name: String,
    pub value: String,
}

/// Parse a Netscape-format cookie file (tab-separated 7 columns; `#`-prefixed
/// lines are comments). Malformed rows are skipped rather than aborting the
/// whole parse.
pub fn parse_netscape_cookie_file(contents: &str) -> Vec<NetscapeCookie> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<NetscapeCookie> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 7 {
        return None;
    }
    Some(NetscapeCookie {
        domain: fields[0].to_string(),
        include_subdomains: fields[1].eq_ignore_ascii_case("TRUE"),
        path: fields[2].to_string(),
        secure: fields[3].eq_ignore_ascii_case("TRUE"),
        expires: fields[4].parse().ok()?,
        name: fields[5].to_string(),
        value: fields[6].to_string(),
    })
}

/// Does `cookie`'s domain cover `host`? Strips one leading dot from the
/// cookie's domain, then requires either an exact host match or a suffix
/// match on a `.` boundary (no suffix-attack: `evil-example.com` must not
/// match a cookie scoped to `example.com`).
pub fn domain_matches(cookie_domain: &str, host: &str) -> bool {
    let stripped = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    let host = host.to_lowercase();
    let stripped = stripped.to_lowercase();

    if host == stripped {
        return true;
    }
    host.ends_with(&stripped) && host[..host.len() - stripped.len()].ends_with('.')
}

/// Select the cookies from `jar` that apply to `host`, in the
/// `{name, value}` shape the transport layer sends on the wire.
pub fn cookies_for_host(jar: &[NetscapeCookie], host: &str) -> Vec<Cookie> {
    jar.iter()
        .filter(|c| domain_matches(&c.domain, host))
        .map(|c| Cookie { name: c.name.clone(), value: c.value.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_separated_rows_and_skips_comments() {
        let contents = "# Netscape HTTP Cookie File\n.example.com\tTRUE\t/\tFALSE\t0\tsession\tabc123\n";
        let cookies = parse_netscape_cookie_file(contents);
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].domain, ".example.com");
        assert_eq!(cookies[0].name, "session");
        assert_eq!(cookies[0].value, "abc123");
    }

    #[test]
    fn domain_match_strips_leading_dot_and_requires_boundary() {
        assert!(domain_matches(".example.com", "example.com"));
        assert!(domain_matches(".example.com", "www.example.com"));
        assert!(!domain_matches(".example.com", "evil-example.com"));
        assert!(!domain_matches(".example.com", "notexample.com"));
    }
}
