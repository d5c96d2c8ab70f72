//! Traversal engine - breadth-first discovery loop
//!
//! The engine owns the frontier for the length of one `discover` call and
//! coordinates:
//! - Seeding from the seed URL and, optionally, the site's sitemap
//! - Drawing depth-layered batches from the frontier
//! - Dispatching batches through the concurrency gate
//! - Filtering and folding discovered links back into the frontier
//! - Stopping on exhaustion, the URL cap, the depth bound, or cancellation

use crate::config::{validate_traversal_config, FetcherConfig, TraversalConfig};
use crate::crawler::fetcher::{DiscoveryResult, Fetcher, HttpFetcher, RenderConfig};
use crate::crawler::frontier::Frontier;
use crate::crawler::scheduler::{BatchScheduler, FetchOutcome};
use crate::crawler::sitemap::{HttpSitemapReader, NoSitemap, SitemapReader};
use crate::crawler::build_http_client;
use crate::output::TraversalStats;
use crate::url::{normalize_url, DomainFilter};
use crate::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Whether the fetch of a visited URL succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStatus {
    Succeeded,
    Failed,
    /// Marked visited while seeding but never fetched; only the seed of a
    /// run cancelled before its first batch
    NotFetched,
}

/// One visited URL of a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub url: Url,
    pub depth: u32,
    pub status: VisitStatus,
}

/// Outcome of one traversal run
///
/// `visits` is in visit order, seed first, and never longer than the
/// configured `max_urls`.
#[derive(Debug, Clone)]
pub struct TraversalResult {
    pub visits: Vec<VisitRecord>,
    pub stats: TraversalStats,
}

impl TraversalResult {
    /// Visited URLs in visit order
    pub fn urls(&self) -> Vec<&str> {
        self.visits.iter().map(|v| v.url.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// True if the run was stopped by cancellation
    pub fn is_cancelled(&self) -> bool {
        self.stats.cancelled
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visits.iter().any(|v| v.url.as_str() == url)
    }
}

/// Bounded breadth-first URL discovery
///
/// A `Traversal` holds configuration and collaborators only; every call to
/// [`Traversal::discover`] starts from an empty frontier.
pub struct Traversal {
    config: TraversalConfig,
    fetcher: Arc<dyn Fetcher>,
    sitemap: Arc<dyn SitemapReader>,
    render: RenderConfig,
}

impl Traversal {
    /// Creates a traversal after validating the configuration
    pub fn new(
        config: TraversalConfig,
        fetcher: Arc<dyn Fetcher>,
        sitemap: Arc<dyn SitemapReader>,
    ) -> Result<Self> {
        validate_traversal_config(&config)?;

        let render = RenderConfig {
            handle_pagination: config.handle_pagination,
            ..RenderConfig::default()
        };

        Ok(Self {
            config,
            fetcher,
            sitemap,
            render,
        })
    }

    /// Creates a traversal without a sitemap reader
    pub fn without_sitemap(config: TraversalConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        Self::new(config, fetcher, Arc::new(NoSitemap))
    }

    /// Replaces the render options handed to the fetcher
    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Runs one traversal from `seed`
    ///
    /// The only error is a malformed seed. Fetch and sitemap failures are
    /// absorbed, and cancellation returns the URLs committed before the
    /// batch that was in flight when the token was raised. The seed is
    /// always the first entry, even when that batch was its own.
    pub async fn discover(&self, seed: &str, cancel: &CancellationToken) -> Result<TraversalResult> {
        let seed = normalize_url(seed)?;
        let config = &self.config;

        tracing::info!(
            "Starting traversal of {} (max depth {}, max urls {})",
            seed,
            config.max_depth,
            config.max_urls
        );

        let mut stats = TraversalStats::start(seed.as_str());
        let mut frontier = Frontier::new(config.max_urls);
        let filter = DomainFilter::new(seed.clone(), config);
        let scheduler = BatchScheduler::new(
            Arc::clone(&self.fetcher),
            config.concurrent_requests,
            self.render.clone(),
        );

        self.seed_frontier(&mut frontier, &filter, &seed).await;

        let mut visits: Vec<VisitRecord> = Vec::new();
        let mut current_depth = 0;
        let mut last_layer = None;

        loop {
            if cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            if frontier.at_capacity() {
                tracing::debug!("Visited cap of {} reached", config.max_urls);
                break;
            }
            let Some(next_depth) = frontier.next_depth() else {
                tracing::debug!("Frontier exhausted");
                break;
            };
            if next_depth > current_depth {
                tracing::info!(
                    "Layer {} complete: {} visited, {} queued",
                    current_depth,
                    visits.len(),
                    frontier.queued_len()
                );
                current_depth = next_depth;
            }
            if current_depth > config.max_depth {
                break;
            }

            let batch = frontier.take_batch(config.batch_size, current_depth);
            if batch.is_empty() {
                break;
            }

            tracing::debug!(
                "Dispatching batch of {} at depth {}",
                batch.len(),
                current_depth
            );
            let outcomes = scheduler.dispatch(batch).await;

            if cancel.is_cancelled() {
                let mut discarded = outcomes.len();
                // The seed stays visited even when its own batch is dropped
                if visits.is_empty() {
                    if let Some(outcome) = outcomes.iter().find(|o| o.url == seed) {
                        let status = tally(&outcome.result, &mut stats);
                        visits.push(VisitRecord {
                            url: outcome.url.clone(),
                            depth: outcome.depth,
                            status,
                        });
                        discarded -= 1;
                    }
                }
                tracing::debug!("Cancelled, discarding batch of {}", discarded);
                stats.discarded = discarded;
                stats.cancelled = true;
                break;
            }

            stats.batches += 1;
            if last_layer != Some(current_depth) {
                stats.layers += 1;
                last_layer = Some(current_depth);
            }

            for outcome in outcomes {
                let status = self.fold_links(&mut frontier, &filter, &outcome, &mut stats);
                visits.push(VisitRecord {
                    url: outcome.url,
                    depth: outcome.depth,
                    status,
                });
            }
        }

        if visits.is_empty() {
            visits.push(VisitRecord {
                url: seed.clone(),
                depth: 0,
                status: VisitStatus::NotFetched,
            });
        }

        visits.truncate(config.max_urls);
        stats.finish();

        tracing::info!(
            "Traversal of {} finished: {} URLs ({} failed){}",
            seed,
            visits.len(),
            stats.failed,
            if stats.cancelled { ", cancelled" } else { "" }
        );

        Ok(TraversalResult { visits, stats })
    }

    /// Queues the seed and, if enabled, the sitemap entries at depth 0
    async fn seed_frontier(&self, frontier: &mut Frontier, filter: &DomainFilter, seed: &Url) {
        frontier.offer(seed.clone(), 0);

        // With room for the seed only, the sitemap could not add anything
        if !self.config.crawl_sitemap || self.config.max_urls <= 1 {
            return;
        }

        let entries = self.sitemap.read_sitemap(seed).await;
        let mut added = 0;
        for entry in &entries {
            match normalize_url(entry) {
                Ok(url) if filter.in_scope(&url) => {
                    if frontier.offer(url, 0) {
                        added += 1;
                    }
                }
                Ok(url) => tracing::trace!("Sitemap entry out of scope: {}", url),
                Err(e) => tracing::trace!("Dropping sitemap entry {}: {}", entry, e),
            }
        }

        tracing::debug!("Seeded {} of {} sitemap entries", added, entries.len());
    }

    /// Offers the outcome's in-scope links at the next depth
    fn fold_links(
        &self,
        frontier: &mut Frontier,
        filter: &DomainFilter,
        outcome: &FetchOutcome,
        stats: &mut TraversalStats,
    ) -> VisitStatus {
        if tally(&outcome.result, stats) == VisitStatus::Failed {
            return VisitStatus::Failed;
        }

        let next_depth = outcome.depth + 1;
        if next_depth > self.config.max_depth {
            return VisitStatus::Succeeded;
        }

        // External links can only pass the filter through one of these
        let wants_external =
            self.config.include_external || !self.config.allowed_domains.is_empty();
        let external: &[String] = if wants_external {
            &outcome.result.external_links
        } else {
            stats.out_of_scope += outcome.result.external_links.len();
            &[]
        };

        for link in outcome.result.internal_links.iter().chain(external) {
            let url = match normalize_url(link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::trace!("Dropping link {}: {}", link, e);
                    continue;
                }
            };

            if !filter.in_scope(&url) {
                stats.out_of_scope += 1;
                tracing::trace!("Out of scope: {}", url);
                continue;
            }

            frontier.offer(url, next_depth);
        }

        VisitStatus::Succeeded
    }
}

/// Counts a fetch result in the run's stats
fn tally(result: &DiscoveryResult, stats: &mut TraversalStats) -> VisitStatus {
    if result.success {
        stats.succeeded += 1;
        VisitStatus::Succeeded
    } else {
        stats.failed += 1;
        VisitStatus::Failed
    }
}

/// Runs one traversal with the HTTP fetcher and sitemap reader
///
/// Builds a single client shared by both collaborators and picks the run's
/// User-Agent from the configured pool; the sitemap request sends it too.
///
/// # Example
///
/// ```no_run
/// use sitewalk::{discover, FetcherConfig, TraversalConfig};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> sitewalk::Result<()> {
/// let config = TraversalConfig {
///     max_depth: 2,
///     max_urls: 100,
///     ..TraversalConfig::default()
/// };
/// let result = discover(
///     "https://example.com/",
///     &config,
///     &FetcherConfig::default(),
///     &CancellationToken::new(),
/// )
/// .await?;
/// for url in result.urls() {
///     println!("{}", url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn discover(
    seed: &str,
    config: &TraversalConfig,
    fetcher_config: &FetcherConfig,
    cancel: &CancellationToken,
) -> Result<TraversalResult> {
    let client = build_http_client(fetcher_config)?;
    let render = RenderConfig::for_run(fetcher_config, config.handle_pagination);

    let sitemap = HttpSitemapReader::new(client.clone()).with_user_agent(render.user_agent.clone());

    let traversal = Traversal::new(
        config.clone(),
        Arc::new(HttpFetcher::new(client)),
        Arc::new(sitemap),
    )?
    .with_render_config(render);

    traversal.discover(seed, cancel).await
}
