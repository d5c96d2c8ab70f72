//! Domain filter deciding which discovered URLs stay in a traversal

use crate::config::TraversalConfig;
use crate::url::{extract_domain, matches_wildcard, same_host};
use url::Url;

/// Returns true if `candidate` may be visited in a run seeded at `seed`
///
/// A candidate is in scope when its host equals the seed's host, or when
/// external links are enabled.
///
/// # Examples
///
/// ```
/// use sitewalk::url::in_scope;
/// use url::Url;
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// let other = Url::parse("https://other.org/").unwrap();
/// assert!(!in_scope(&seed, &other, false));
/// assert!(in_scope(&seed, &other, true));
/// ```
pub fn in_scope(seed: &Url, candidate: &Url, include_external: bool) -> bool {
    include_external || same_host(seed, candidate)
}

/// Per-run domain filter
///
/// Extends [`in_scope`] with the configured `allowed-domains` patterns.
/// Rejected URLs are dropped for the rest of the run.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    seed: Url,
    include_external: bool,
    allowed_domains: Vec<String>,
}

impl DomainFilter {
    /// Creates a filter for a run seeded at `seed`
    pub fn new(seed: Url, config: &TraversalConfig) -> Self {
        Self {
            seed,
            include_external: config.include_external,
            allowed_domains: config
                .allowed_domains
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the candidate should be offered to the frontier
    pub fn in_scope(&self, candidate: &Url) -> bool {
        if in_scope(&self.seed, candidate, self.include_external) {
            return true;
        }

        match extract_domain(candidate) {
            Some(host) => self
                .allowed_domains
                .iter()
                .any(|pattern| matches_wildcard(pattern, &host)),
            None => false,
        }
    }

    /// The seed this filter is anchored to
    pub fn seed(&self) -> &Url {
        &self.seed
    }
}
