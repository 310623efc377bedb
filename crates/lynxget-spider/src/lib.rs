//! Bounded BFS crawler: frontier, URL normalization, robots.txt and sitemap
//! parsing (spec.md §4.6).

pub mod crawler;
pub mod frontier;
pub mod normalize;
pub mod robots;
pub mod sitemap;

pub use crawler::{crawl, CancelToken, CrawlOptions};
pub use frontier::{FrontierOptions, UrlFrontier};
pub use normalize::normalize_url;
pub use robots::{is_allowed_by_robots, parse_robots_txt, RobotsRules};
pub use sitemap::{parse_sitemap_recursive, SitemapEntry};
