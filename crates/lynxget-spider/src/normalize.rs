//! URL normalization (spec.md §4.6 `normalize_url`), hand-written over the
//! `url` crate.

use url::Url;

/// Drop the fragment, drop a trailing slash (except on the root path), keep
/// the query string, lowercase scheme and host. Idempotent and stable under
/// fragment-only changes (spec.md §8 invariant 6).
pub fn normalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;

    url.set_fragment(None);

    let scheme = url.scheme().to_lowercase();
    url.set_scheme(&scheme).ok()?;

    if let Some(host) = url.host_str() {
        let lower = host.to_lowercase();
        url.set_host(Some(&lower)).ok()?;
    }

    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }

    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://Example.com/Path/#section"),
            Some("https://example.com/Path".to_string())
        );
    }

    #[test]
    fn keeps_root_slash() {
        assert_eq!(normalize_url("https://example.com/"), Some("https://example.com/".to_string()));
    }

    #[test]
    fn keeps_query_string() {
        assert_eq!(
            normalize_url("https://example.com/a?x=1"),
            Some("https://example.com/a?x=1".to_string())
        );
    }

    #[test]
    fn is_idempotent() {
        let once = normalize_url("https://Example.com/a/#frag").unwrap();
        let twice = normalize_url(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn stable_under_fragment_changes() {
        let a = normalize_url("https://example.com/a#one").unwrap();
        let b = normalize_url("https://example.com/a#two").unwrap();
        assert_eq!(a, b);
    }
}
