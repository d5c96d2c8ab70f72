//! URL handling module for Sitewalk
//!
//! This module provides URL normalization, host extraction, wildcard matching,
//! and the domain filter that keeps a traversal in scope.

mod domain;
mod matcher;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use matcher::matches_wildcard;
pub use normalize::normalize_url;
pub use scope::{in_scope, DomainFilter};
