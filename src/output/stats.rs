//! Statistics recorded during a traversal run
//!
//! This module provides the per-run counters the engine fills in and a
//! formatted printout for the CLI.

use chrono::{DateTime, Utc};

/// Traversal statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalStats {
    /// Normalized seed of the run
    pub seed: String,

    pub started_at: DateTime<Utc>,

    /// Set once the run returns
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of depth layers that had at least one batch committed
    pub layers: u32,

    /// Number of batches committed
    pub batches: usize,

    /// Committed visits whose fetch succeeded
    pub succeeded: usize,

    /// Committed visits whose fetch failed
    pub failed: usize,

    /// URLs fetched in a batch that was discarded on cancellation
    pub discarded: usize,

    /// Links dropped by the domain filter
    pub out_of_scope: usize,

    /// Whether the run stopped because of external cancellation
    pub cancelled: bool,
}

impl TraversalStats {
    /// Starts the clock for a new run
    pub fn start(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            started_at: Utc::now(),
            finished_at: None,
            layers: 0,
            batches: 0,
            succeeded: 0,
            failed: 0,
            discarded: 0,
            out_of_scope: 0,
            cancelled: false,
        }
    }

    /// Stops the clock
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total committed visits
    pub fn visited(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Run duration in milliseconds, if finished
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds())
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the URL list.
pub fn print_statistics(stats: &TraversalStats) {
    eprintln!("=== Traversal Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Seed: {}", stats.seed);
    eprintln!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(ms) = stats.duration_ms() {
        eprintln!("  Duration: {:.2}s", ms as f64 / 1000.0);
    }
    eprintln!("  Layers: {}", stats.layers);
    eprintln!("  Batches: {}", stats.batches);
    eprintln!();

    eprintln!("Visits:");
    eprintln!("  Succeeded: {}", stats.succeeded);
    eprintln!("  Failed: {}", stats.failed);
    eprintln!("  Links out of scope: {}", stats.out_of_scope);
    if stats.cancelled {
        eprintln!(
            "  Cancelled: yes ({} in-flight fetches discarded)",
            stats.discarded
        );
    }
    eprintln!();

    let visited = stats.visited();
    let success_rate = if visited > 0 {
        (stats.succeeded as f64 / visited as f64) * 100.0
    } else {
        0.0
    };

    eprintln!(
        "Success Rate: {:.1}% ({} / {} URLs fetched successfully)",
        success_rate, stats.succeeded, visited
    );
}
