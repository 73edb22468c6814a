//! Crawl orchestration across the configured targets
//!
//! Each target goes through the same steps: fetch the landing page, derive
//! its section whitelist, then walk its links in document order. Links that
//! look like documents are downloaded; any other link is fetched as a listing
//! page and the documents on it are downloaded under the outer link's
//! section.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::config::{CrawlTarget, ScraperConfig};
use crate::crawler::error::CrawlError;
use crate::crawler::filename::{clean_filename, resolve_filename};
use crate::crawler::http::HttpClient;
use crate::crawler::links::{is_direct_download, parse_document_links, parse_landing_page};
use crate::crawler::sections::SectionWhitelist;
use crate::crawler::{DiscoveredLink, ProductType};
use crate::store::{GuidanceDocument, GuidanceStore};

/// Progress notifications emitted while crawling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// A landing page was parsed
    TargetStarted {
        folder_label: String,
        sections: usize,
        links: usize,
    },

    /// A file was written to the content tree
    FileDownloaded { path: PathBuf },

    /// A link failed and was skipped
    LinkFailed { text: String, error: String },
}

/// Outcome of crawling one target
#[derive(Debug, Clone, Default)]
pub struct TargetReport {
    pub folder_label: String,
    pub sections: SectionWhitelist,
    pub files_downloaded: usize,
    /// URLs downloaded for this target; dedup never crosses targets
    pub processed_urls: HashSet<String>,
}

impl TargetReport {
    fn record_download(&mut self, url: &str) {
        self.processed_urls.insert(url.to_string());
        self.files_downloaded += 1;
    }
}

/// Outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Files written across all targets
    pub files_downloaded: usize,

    /// Distinct URLs downloaded across all targets
    pub unique_urls: usize,
}

/// Crawls the configured targets and feeds downloads to the guidance store
pub struct Crawler<'a> {
    config: &'a ScraperConfig,
    http: HttpClient,
    store: &'a GuidanceStore,
    events: Option<mpsc::Sender<CrawlEvent>>,
}

impl<'a> Crawler<'a> {
    /// Create a crawler with its own HTTP client
    pub fn new(config: &'a ScraperConfig, store: &'a GuidanceStore) -> Result<Self, CrawlError> {
        Ok(Self {
            config,
            http: HttpClient::new(config)?,
            store,
            events: None,
        })
    }

    /// Send progress notifications to a channel
    pub fn with_events(mut self, sender: mpsc::Sender<CrawlEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    async fn emit(&self, event: CrawlEvent) {
        if let Some(sender) = &self.events {
            // A closed receiver only means nobody is watching.
            let _ = sender.send(event).await;
        }
    }

    /// Crawl every configured target in order
    ///
    /// A landing page failure aborts the run; link failures do not.
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        let mut files_downloaded = 0;
        let mut all_processed_urls = HashSet::new();

        for target in &self.config.targets {
            let report = self.crawl_target(target).await?;
            files_downloaded += report.files_downloaded;
            all_processed_urls.extend(report.processed_urls);
        }

        Ok(CrawlSummary {
            files_downloaded,
            unique_urls: all_processed_urls.len(),
        })
    }

    /// Crawl one target
    #[instrument(skip(self, target), fields(folder = %target.folder_label))]
    pub async fn crawl_target(&self, target: &CrawlTarget) -> Result<TargetReport, CrawlError> {
        let target_dir = self.config.target_dir(target);
        fs::create_dir_all(&target_dir).await?;

        let product_type = ProductType::for_folder_label(&target.folder_label);
        let body = self.http.get_text(&self.config.entry_url(target)).await?;
        let landing = parse_landing_page(&body, &self.config.base_url, product_type)?;

        info!("Processing {}", target.folder_label);
        info!(
            "Found sections: {}",
            landing.whitelist.iter().collect::<Vec<_>>().join(", ")
        );
        self.emit(CrawlEvent::TargetStarted {
            folder_label: target.folder_label.clone(),
            sections: landing.whitelist.len(),
            links: landing.links.len(),
        })
        .await;

        let mut report = TargetReport {
            folder_label: target.folder_label.clone(),
            sections: landing.whitelist,
            ..TargetReport::default()
        };

        for link in &landing.links {
            if report.processed_urls.contains(&link.url) {
                continue;
            }

            let section_dir = target_dir.join(clean_filename(&link.section));
            if let Err(e) = self.process_link(link, &section_dir, &mut report).await {
                error!("Error processing {}: {}", link.text, e);
                self.emit(CrawlEvent::LinkFailed {
                    text: link.text.clone(),
                    error: e.to_string(),
                })
                .await;
            }
        }

        info!(
            "Finished {}: {} files downloaded",
            target.folder_label, report.files_downloaded
        );
        Ok(report)
    }

    async fn process_link(
        &self,
        link: &DiscoveredLink,
        section_dir: &Path,
        report: &mut TargetReport,
    ) -> Result<(), CrawlError> {
        if is_direct_download(&link.url) {
            self.download_and_store(
                &link.url,
                section_dir,
                &link.text,
                Some(&link.section),
                link.product_type,
            )
            .await?;
            report.record_download(&link.url);
            return Ok(());
        }

        self.scan_listing_page(link, section_dir, report)
            .await
            .map_err(|e| CrawlError::NestedPage {
                url: link.url.clone(),
                source: Box::new(e),
            })
    }

    /// Download the documents linked from a page one level below the landing page
    async fn scan_listing_page(
        &self,
        link: &DiscoveredLink,
        section_dir: &Path,
        report: &mut TargetReport,
    ) -> Result<(), CrawlError> {
        let body = self.http.get_text(&link.url).await?;
        let documents = parse_document_links(&body, &self.config.base_url)?;

        for document in documents {
            if report.processed_urls.contains(&document.url) {
                continue;
            }
            self.download_and_store(
                &document.url,
                section_dir,
                &document.text,
                Some(&link.section),
                link.product_type,
            )
            .await?;
            report.record_download(&document.url);
        }

        Ok(())
    }

    /// Download a file into `folder` and record it when a section is given
    ///
    /// HTTP and filesystem failures propagate. Storage failures are logged
    /// and do not fail the download.
    #[instrument(skip(self, folder, product_type))]
    pub async fn download_and_store(
        &self,
        url: &str,
        folder: &Path,
        display_text: &str,
        section: Option<&str>,
        product_type: ProductType,
    ) -> Result<PathBuf, CrawlError> {
        let bytes = self.http.get_bytes(url).await?;

        fs::create_dir_all(folder).await?;
        let filename = resolve_filename(display_text, url, &bytes)?;
        let file_path = folder.join(&filename);
        fs::write(&file_path, &bytes).await?;
        info!("Downloaded: {}", filename);
        self.emit(CrawlEvent::FileDownloaded {
            path: file_path.clone(),
        })
        .await;

        if let Some(section) = section {
            let document = GuidanceDocument {
                title: display_text.to_string(),
                section: section.to_string(),
                file_url: url.to_string(),
                file_path: file_path.clone(),
                product_type,
            };
            if let Err(e) = self.store.upsert_guidance(&document).await {
                error!("Error storing {} in DB: {}", display_text, e);
            }
        }

        Ok(file_path)
    }
}
