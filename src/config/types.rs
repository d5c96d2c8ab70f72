use serde::Deserialize;

/// Main configuration structure for Sitewalk
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URLs to start traversals from, one run per seed
    pub seeds: Vec<String>,

    #[serde(default)]
    pub traversal: TraversalConfig,

    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Traversal behavior configuration
///
/// Immutable for the duration of one run.
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Maximum link depth from the seed (inclusive)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of URLs visited in one run
    #[serde(rename = "max-urls", default = "default_max_urls")]
    pub max_urls: usize,

    /// Follow links to hosts other than the seed's
    #[serde(rename = "include-external", default)]
    pub include_external: bool,

    /// Seed the first layer from the site's sitemap.xml
    #[serde(rename = "crawl-sitemap", default = "default_true")]
    pub crawl_sitemap: bool,

    /// Ask the fetcher to report pagination links
    #[serde(rename = "handle-pagination", default)]
    pub handle_pagination: bool,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "concurrent-requests", default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Number of URLs drawn from the frontier per batch
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    /// Host patterns (e.g., "docs.example.com" or "*.example.com") always in scope
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Pool of User-Agent strings; one is picked per run
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// CSS selector matching a "next page" link
    #[serde(rename = "next-selector", default)]
    pub next_selector: Option<String>,

    /// Proxy every request of the run goes through
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_max_depth() -> u32 {
    1
}

fn default_max_urls() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_concurrent_requests() -> usize {
    10
}

fn default_batch_size() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agents() -> Vec<String> {
    vec![format!("sitewalk/{}", env!("CARGO_PKG_VERSION"))]
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_urls: default_max_urls(),
            include_external: false,
            crawl_sitemap: default_true(),
            handle_pagination: false,
            concurrent_requests: default_concurrent_requests(),
            batch_size: default_batch_size(),
            allowed_domains: Vec::new(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_redirects: default_max_redirects(),
            user_agents: default_user_agents(),
            next_selector: None,
            proxy: None,
        }
    }
}
