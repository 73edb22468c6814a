//! A complete harvest run
//!
//! Every run starts from an empty jurisdiction: its rows are deleted before
//! any crawl target is fetched.

use tokio::sync::mpsc;
use tracing::info;

use crate::config::{DatabaseConfig, ScraperConfig};
use crate::crawler::{CrawlEvent, CrawlSummary, Crawler};
use crate::error::Result;
use crate::store::GuidanceStore;

/// How far a run goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestMode {
    /// Clear the jurisdiction and stop
    ClearOnly,

    /// Clear the jurisdiction, then crawl every target
    Full,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    /// Rows deleted before crawling
    pub cleared: u64,

    /// Crawl totals; `None` for a clear-only run
    pub crawl: Option<CrawlSummary>,
}

/// Open the guidance table, clear the jurisdiction and optionally crawl
///
/// Failures opening or clearing the table, and landing page failures,
/// end the run.
pub async fn harvest(
    config: &ScraperConfig,
    db_config: &DatabaseConfig,
    mode: HarvestMode,
    events: Option<mpsc::Sender<CrawlEvent>>,
) -> Result<HarvestReport> {
    let store = GuidanceStore::open(db_config, config).await?;
    let cleared = store.clear_jurisdiction(&config.country).await?;

    if mode == HarvestMode::ClearOnly {
        return Ok(HarvestReport {
            cleared,
            crawl: None,
        });
    }

    let mut crawler = Crawler::new(config, &store)?;
    if let Some(sender) = events {
        crawler = crawler.with_events(sender);
    }
    let summary = crawler.run().await?;

    info!(
        "Crawl finished: {} files from {} distinct URLs",
        summary.files_downloaded, summary.unique_urls
    );
    Ok(HarvestReport {
        cleared,
        crawl: Some(summary),
    })
}
