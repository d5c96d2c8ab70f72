//! Output module for traversal results
//!
//! This module handles:
//! - Writing the discovered URL list
//! - Recording and printing traversal statistics

pub mod stats;

pub use stats::{print_statistics, TraversalStats};

use crate::crawler::TraversalResult;
use std::io::Write;

/// Writes the result's URLs, one per line, in visit order
///
/// # Example
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use sitewalk::{discover, FetcherConfig, TraversalConfig};
/// use tokio_util::sync::CancellationToken;
///
/// let result = discover(
///     "https://example.com/",
///     &TraversalConfig::default(),
///     &FetcherConfig::default(),
///     &CancellationToken::new(),
/// )
/// .await?;
/// sitewalk::output::write_url_list(&result, std::io::stdout().lock())?;
/// # Ok(())
/// # }
/// ```
pub fn write_url_list<W: Write>(result: &TraversalResult, mut writer: W) -> std::io::Result<()> {
    for record in &result.visits {
        writeln!(writer, "{}", record.url)?;
    }
    writer.flush()
}
