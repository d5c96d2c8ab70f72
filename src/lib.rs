//! Sitewalk: a bounded URL-discovery traversal engine
//!
//! This crate walks a site's link graph breadth-first up to a configured depth
//! and returns every URL it visited, never more than the configured cap. Page
//! fetching and sitemap reading are pluggable collaborators; HTTP
//! implementations of both are provided.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Sitewalk operations
#[derive(Debug, Error)]
pub enum SitewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    /// Only raised while building the HTTP client; fetch errors are absorbed
    #[error("Failed to build HTTP client: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid allowed-domains pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Sitemap reading errors
///
/// Never surfaced by a traversal; the reader logs them and seeds nothing.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Result type alias for Sitewalk operations
pub type Result<T> = std::result::Result<T, SitewalkError>;

// Re-export commonly used types
pub use config::{Config, FetcherConfig, TraversalConfig};
pub use crawler::{discover, Traversal, TraversalResult, VisitRecord, VisitStatus};
pub use crate::url::{extract_domain, in_scope, normalize_url, DomainFilter};
