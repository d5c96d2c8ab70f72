//! In-memory collaborators for unit tests

use crate::crawler::fetcher::{DiscoveryResult, Fetcher, RenderConfig};
use crate::crawler::sitemap::SitemapReader;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Fetcher serving a fixed link graph
///
/// Unknown URLs fail. Internal and external links are split by host.
#[derive(Default)]
pub struct GraphFetcher {
    pages: HashMap<String, Vec<String>>,
    delay: Option<Duration>,
    cancel_after: Option<(usize, CancellationToken)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    fetched: Mutex<Vec<String>>,
    last_render: Mutex<Option<RenderConfig>>,
}

impl GraphFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Raises `token` when the given fetch call (1-based) starts
    pub fn cancel_on_call(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((call, token));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn last_render(&self) -> Option<RenderConfig> {
        self.last_render.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &Url, render: &RenderConfig) -> DiscoveryResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(url.to_string());
        *self.last_render.lock().unwrap() = Some(render.clone());

        if let Some((at, token)) = &self.cancel_after {
            if call == *at {
                token.cancel();
            }
        }

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let Some(links) = self.pages.get(url.as_str()) else {
            return DiscoveryResult::failed();
        };

        let (internal, external): (Vec<String>, Vec<String>) = links.iter().cloned().partition(|l| {
            Url::parse(l)
                .ok()
                .and_then(|u| u.host_str().map(|h| Some(h) == url.host_str()))
                .unwrap_or(true)
        });

        DiscoveryResult::succeeded(String::new(), internal, external)
    }
}

/// Sitemap reader returning a fixed list
#[derive(Default)]
pub struct StaticSitemap {
    urls: Vec<String>,
    reads: AtomicUsize,
}

impl StaticSitemap {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SitemapReader for StaticSitemap {
    async fn read_sitemap(&self, _seed: &Url) -> Vec<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.urls.clone()
    }
}
