//! Page fetcher collaborator
//!
//! This module defines the `Fetcher` contract the traversal engine depends on
//! and its HTTP implementation, including:
//! - Building HTTP clients from the fetcher configuration
//! - GET requests with a per-run User-Agent
//! - Status and Content-Type checks
//! - Link extraction from the final (post-redirect) page

use crate::config::FetcherConfig;
use crate::crawler::parser::parse_html;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::{header, redirect::Policy, Client, Proxy};
use std::time::Duration;
use url::Url;

/// Rendering options passed through to the fetcher unchanged
///
/// The traversal engine never inspects these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// User-Agent header for every request of the run
    pub user_agent: Option<String>,

    /// Report "next page" links as internal links
    pub handle_pagination: bool,

    /// CSS selector matching a "next page" control
    pub next_selector: Option<String>,
}

impl RenderConfig {
    /// Builds the render options for one run
    ///
    /// One User-Agent is picked at random from the configured pool.
    pub fn for_run(fetcher: &FetcherConfig, handle_pagination: bool) -> Self {
        Self {
            user_agent: fetcher.user_agents.choose(&mut rand::thread_rng()).cloned(),
            handle_pagination,
            next_selector: fetcher.next_selector.clone(),
        }
    }
}

/// Outcome of fetching one URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    /// Whether the page was fetched and parsed
    pub success: bool,

    /// Raw page body
    pub content: String,

    /// Absolute links on the page's host
    pub internal_links: Vec<String>,

    /// Absolute links to other hosts
    pub external_links: Vec<String>,
}

impl DiscoveryResult {
    /// A failed fetch: no content, no links
    pub fn failed() -> Self {
        Self::default()
    }

    /// A successful fetch carrying the given links
    pub fn succeeded(
        content: impl Into<String>,
        internal_links: Vec<String>,
        external_links: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            content: content.into(),
            internal_links,
            external_links,
        }
    }
}

/// Fetches one page and reports the links found on it
///
/// Implementations must not fail for ordinary HTTP or rendering problems;
/// those are reported as [`DiscoveryResult::failed`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, render: &RenderConfig) -> DiscoveryResult;
}

/// Builds an HTTP client with proper configuration
///
/// The client's default User-Agent is the first entry of the pool; the
/// per-run choice in [`RenderConfig`] overrides it per request.
///
/// # Example
///
/// ```
/// use sitewalk::config::FetcherConfig;
/// use sitewalk::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true);

    if let Some(user_agent) = config.user_agents.first() {
        builder = builder.user_agent(user_agent.as_str());
    }

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    builder.build()
}

/// Plain HTTP implementation of [`Fetcher`]
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML body | success, links extracted |
/// | Non-2xx status | failed |
/// | Content-Type not HTML | failed |
/// | Timeout / connection / TLS error | failed |
/// | Redirect limit exceeded | failed |
/// | Body read error | failed |
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the fetcher configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        build_http_client(config).map(Self::new)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, render: &RenderConfig) -> DiscoveryResult {
        let mut request = self.client.get(url.clone());
        if let Some(user_agent) = &render.user_agent {
            request = request.header(header::USER_AGENT, user_agent);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_timeout() {
                    "request timeout".to_string()
                } else if e.is_connect() {
                    "connection failed".to_string()
                } else if e.is_redirect() {
                    "too many redirects".to_string()
                } else {
                    e.to_string()
                };
                tracing::debug!("Fetch failed for {}: {}", url, reason);
                return DiscoveryResult::failed();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Fetch failed for {}: HTTP {}", url, status.as_u16());
            return DiscoveryResult::failed();
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !is_html(&content_type) {
            tracing::debug!("Skipping {}: content type '{}'", url, content_type);
            return DiscoveryResult::failed();
        }

        let final_url = response.url().clone();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", url, e);
                return DiscoveryResult::failed();
            }
        };

        let page = parse_html(&body, &final_url, render);
        tracing::trace!(
            "Parsed {}: {} internal, {} external links",
            final_url,
            page.internal_links.len(),
            page.external_links.len()
        );

        DiscoveryResult::succeeded(body, page.internal_links, page.external_links)
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}
