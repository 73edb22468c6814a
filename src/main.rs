//! # HSA Guidance CLI
//!
//! Command-line entry point for the harvester.
//!
//! Every run starts by deleting the jurisdiction's rows from the guidance
//! table. With `--clear-only` the program stops there; otherwise both
//! guidance listings are crawled and the number of downloaded files is
//! reported.

mod telemetry;

use std::time::Duration;

use clap::Parser;
use hsa_guidance::config::{DatabaseConfig, ScraperConfig};
use hsa_guidance::crawler::CrawlEvent;
use hsa_guidance::harvest::{HarvestMode, harvest};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(author, version, about = "Harvest HSA guidance documents into a local content tree and guidance table", long_about = None)]
struct Cli {
    /// Only remove the jurisdiction's rows from the guidance table
    #[arg(long)]
    clear_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ScraperConfig::default();

    let _log_guard = telemetry::init_tracing_subscriber(&config.log_file())?;

    let db_config = DatabaseConfig::from_env()?;

    if cli.clear_only {
        let report = harvest(&config, &db_config, HarvestMode::ClearOnly, None).await?;
        println!("Removed {} entries from {}", report.cleared, config.country);
        return Ok(());
    }

    let (event_sender, event_receiver) = mpsc::channel(100);
    let progress_handle = spawn_progress(event_receiver)?;

    // The sender is dropped when harvest returns, which ends the progress task
    let result = harvest(&config, &db_config, HarvestMode::Full, Some(event_sender)).await;
    await_progress(progress_handle).await;
    let report = result?;

    println!("Removed {} entries from {}", report.cleared, config.country);
    let total = report.crawl.map(|c| c.files_downloaded).unwrap_or_default();
    println!("Download complete. Total files downloaded: {}", total);

    Ok(())
}

/// Spinner fed by crawl events until the sending side is dropped
fn spawn_progress(
    mut event_receiver: mpsc::Receiver<CrawlEvent>,
) -> anyhow::Result<JoinHandle<()>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    Ok(tokio::spawn(async move {
        while let Some(event) = event_receiver.recv().await {
            match event {
                CrawlEvent::TargetStarted {
                    folder_label,
                    sections,
                    links,
                } => {
                    spinner.println(format!(
                        "Processing {} ({} sections, {} links)",
                        folder_label, sections, links
                    ));
                }
                CrawlEvent::FileDownloaded { path } => {
                    spinner.inc(1);
                    if let Some(name) = path.file_name() {
                        spinner.set_message(name.to_string_lossy().to_string());
                    }
                }
                CrawlEvent::LinkFailed { text, error } => {
                    spinner.println(format!("Skipped {}: {}", text, error));
                }
            }
        }
        spinner.finish_and_clear();
    }))
}

/// Wait for the progress task, returning whether it ended cleanly
async fn await_progress(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Progress display task failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_await_progress_reports_failed_task() {
        let handle = tokio::spawn(async { panic!("spinner crashed") });
        assert!(!await_progress(handle).await);
    }

    #[tokio::test]
    async fn test_progress_task_ends_when_sender_dropped() {
        let (sender, receiver) = mpsc::channel(4);
        let handle = spawn_progress(receiver).unwrap();

        sender
            .send(CrawlEvent::LinkFailed {
                text: "Missing".to_string(),
                error: "HTTP error".to_string(),
            })
            .await
            .unwrap();
        drop(sender);

        assert!(await_progress(handle).await);
    }
}
