//! Bounded BFS frontier (spec.md §4.6), the crawler's only shared mutable
//! state; `add`/`next` are serialised behind a single mutex the way the
//! teacher's session state is guarded in `riptide-spider::session`.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use globset::{Glob, GlobSet, GlobSetBuilder};
use lynxget_types::FrontierEntry;
use url::Url;

use crate::normalize::normalize_url;

#[derive(Debug, Clone)]
pub struct FrontierOptions {
    pub same_origin: bool,
    pub max_depth: u32,
    pub max_pages: usize,
    pub max_queued: usize,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
}

impl Default for FrontierOptions {
    fn default() -> Self {
        let max_pages = 100;
        Self {
            same_origin: true,
            max_depth: 3,
            max_pages,
            max_queued: max_pages * 10,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
        }
    }
}

fn build_globset(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        } else {
            tracing::warn!(pattern, "ignoring invalid frontier glob");
        }
    }
    builder.build().unwrap_or_else(|_| GlobSetBuilder::new().build().expect("empty globset builds"))
}

struct Inner {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    dequeued_count: usize,
}

/// A bounded, origin-and-depth-capped BFS queue of URLs to crawl.
pub struct UrlFrontier {
    options: FrontierOptions,
    origin: Option<String>,
    include: GlobSet,
    exclude: GlobSet,
    inner: Mutex<Inner>,
}

impl UrlFrontier {
    pub fn new(seed_url: &str, options: FrontierOptions) -> Self {
        let origin = Url::parse(seed_url).ok().map(|u| u.origin().ascii_serialization());
        let include = build_globset(&options.include_globs);
        let exclude = build_globset(&options.exclude_globs);
        Self {
            origin,
            include,
            exclude,
            inner: Mutex::new(Inner { queue: VecDeque::new(), visited: HashSet::new(), dequeued_count: 0 }),
            options,
        }
    }

    fn path_matches_globs(&self, path: &str) -> bool {
        if !self.options.include_globs.is_empty() && !self.include.is_match(path) {
            return false;
        }
        if self.exclude.is_match(path) {
            return false;
        }
        true
    }

    /// Add one URL at the given depth. Rejects per spec.md §4.6: depth over
    /// cap, queue full, already visited (by normalized URL), invalid URL,
    /// wrong origin, include glob miss, exclude glob hit.
    pub fn add(&self, raw_url: &str, depth: u32) -> bool {
        if depth > self.options.max_depth {
            return false;
        }

        let Some(normalized) = normalize_url(raw_url) else {
            return false;
        };

        let Ok(parsed) = Url::parse(&normalized) else {
            return false;
        };

        if self.options.same_origin {
            if let Some(origin) = &self.origin {
                if &parsed.origin().ascii_serialization() != origin {
                    return false;
                }
            }
        }

        if !self.path_matches_globs(parsed.path()) {
            return false;
        }

        let mut inner = self.inner.lock().expect("frontier mutex poisoned");
        if inner.queue.len() >= self.options.max_queued {
            return false;
        }
        if !inner.visited.insert(normalized.clone()) {
            return false;
        }
        inner.queue.push_back(FrontierEntry::new(normalized, depth));
        true
    }

    /// Add every URL in `urls` at `depth`, ignoring individual rejections.
    pub fn add_all(&self, urls: impl IntoIterator<Item = impl AsRef<str>>, depth: u32) {
        for url in urls {
            self.add(url.as_ref(), depth);
        }
    }

    /// Dequeue the next entry in FIFO order, short-circuiting once
    /// `max_pages` entries have already been handed out.
    pub fn next(&self) -> Option<FrontierEntry> {
        let mut inner = self.inner.lock().expect("frontier mutex poisoned");
        if inner.dequeued_count >= self.options.max_pages {
            return None;
        }
        let entry = inner.queue.pop_front()?;
        inner.dequeued_count += 1;
        Some(entry)
    }

    pub fn is_empty(&self) -> bool {
        let inner = self.inner.lock().expect("frontier mutex poisoned");
        inner.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        let inner = self.inner.lock().expect("frontier mutex poisoned");
        inner.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_after_normalization() {
        let frontier = UrlFrontier::new("https://example.com/", FrontierOptions::default());
        assert!(frontier.add("https://example.com/a", 0));
        assert!(!frontier.add("https://example.com/a#section", 0));
    }

    #[test]
    fn rejects_cross_origin_when_same_origin_required() {
        let frontier = UrlFrontier::new("https://example.com/", FrontierOptions::default());
        assert!(!frontier.add("https://other.example/a", 0));
    }

    #[test]
    fn rejects_depth_over_cap() {
        let options = FrontierOptions { max_depth: 1, ..FrontierOptions::default() };
        let frontier = UrlFrontier::new("https://example.com/", options);
        assert!(!frontier.add("https://example.com/a", 2));
    }

    #[test]
    fn next_stops_at_max_pages() {
        let options = FrontierOptions { max_pages: 1, ..FrontierOptions::default() };
        let frontier = UrlFrontier::new("https://example.com/", options);
        frontier.add("https://example.com/a", 0);
        frontier.add("https://example.com/b", 0);
        assert!(frontier.next().is_some());
        assert!(frontier.next().is_none());
    }

    #[test]
    fn exclude_glob_rejects_matching_path() {
        let options = FrontierOptions { exclude_globs: vec!["/admin/**".to_string()], ..FrontierOptions::default() };
        let frontier = UrlFrontier::new("https://example.com/", options);
        assert!(!frontier.add("https://example.com/admin/users", 0));
        assert!(frontier.add("https://example.com/articles/1", 0));
    }

    #[test]
    fn include_glob_requires_match() {
        let options = FrontierOptions { include_globs: vec!["/articles/**".to_string()], ..FrontierOptions::default() };
        let frontier = UrlFrontier::new("https://example.com/", options);
        assert!(!frontier.add("https://example.com/about", 0));
        assert!(frontier.add("https://example.com/articles/1", 0));
    }
}
