//! Batch scheduler and concurrency gate
//!
//! This module handles:
//! - Dispatching one frontier batch to the fetcher
//! - Global concurrency limiting via a semaphore shared across batches
//! - Absorbing per-URL fetch failures so a batch always completes

use crate::crawler::fetcher::{DiscoveryResult, Fetcher, RenderConfig};
use crate::crawler::frontier::QueuedUrl;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Result of fetching one URL of a batch
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub url: Url,
    pub depth: u32,
    pub result: DiscoveryResult,
}

/// Runs batches of fetches with at most `concurrent_requests` in flight
///
/// The semaphore is created once per run, so the bound holds across the
/// whole run and not just within a single batch.
pub struct BatchScheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    fetcher: Arc<dyn Fetcher>,

    render: RenderConfig,
}

impl BatchScheduler {
    /// Creates a scheduler allowing `concurrent_requests` parallel fetches
    ///
    /// A width of zero is treated as one.
    pub fn new(fetcher: Arc<dyn Fetcher>, concurrent_requests: usize, render: RenderConfig) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrent_requests.max(1))),
            fetcher,
            render,
        }
    }

    /// Fetches every URL of the batch and waits for all of them
    ///
    /// Outcomes are returned in batch order. A failed fetch yields a failed
    /// [`DiscoveryResult`] for that URL only.
    pub async fn dispatch(&self, batch: Vec<QueuedUrl>) -> Vec<FetchOutcome> {
        let fetches = batch.into_iter().map(|queued| async move {
            let result = match self.semaphore.acquire().await {
                Ok(_permit) => self.fetcher.fetch(&queued.url, &self.render).await,
                Err(_) => {
                    // Only reachable if the semaphore is closed
                    tracing::warn!("Concurrency gate closed, skipping {}", queued.url);
                    DiscoveryResult::failed()
                }
            };

            FetchOutcome {
                url: queued.url,
                depth: queued.depth,
                result,
            }
        });

        join_all(fetches).await
    }

    /// Number of fetches that could start right now
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}
