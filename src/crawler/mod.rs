//! Crawler module for bounded URL discovery
//!
//! This module contains the core traversal logic, including:
//! - The breadth-first frontier with visited-set bookkeeping
//! - Batch dispatch behind a concurrency gate
//! - HTTP fetching and HTML link extraction
//! - Sitemap seeding
//! - The traversal engine tying them together

mod engine;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;
mod sitemap;

#[cfg(test)]
mod testing;

pub use engine::{discover, Traversal, TraversalResult, VisitRecord, VisitStatus};
pub use fetcher::{build_http_client, DiscoveryResult, Fetcher, HttpFetcher, RenderConfig};
pub use frontier::{Frontier, QueuedUrl};
pub use parser::{parse_html, ParsedPage};
pub use scheduler::{BatchScheduler, FetchOutcome};
pub use sitemap::{parse_locations, HttpSitemapReader, NoSitemap, SitemapReader};
