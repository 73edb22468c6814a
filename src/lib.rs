//! # HSA Guidance Harvester
//!
//! This crate collects the guidance documents published by Singapore's Health
//! Sciences Authority. It walks the therapeutic-product and medical-device
//! guidance listings, files every document under the page section it appears
//! in, downloads it into a local content tree and records one row per
//! document title, together with its extracted text, in a guidance table.
//!
//! ## Features
//!
//! - Section discovery from collapsible panel headers, with a heading fallback
//! - One level of listing-page scanning below the landing page
//! - Filesystem-safe filenames with an extension taken from the URL, the link
//!   text or the payload's magic bytes
//! - PDF and DOCX text extraction that never fails a crawl
//! - Upsert by title with accumulated text, stored with LibSQL
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use hsa_guidance::config::{DatabaseConfig, ScraperConfig};
//! use hsa_guidance::harvest::{HarvestMode, harvest};
//!
//! #[tokio::main]
//! async fn main() -> hsa_guidance::Result<()> {
//!     let config = ScraperConfig::default();
//!     let db_config = DatabaseConfig::from_env()?;
//!
//!     // Clear the jurisdiction, then harvest both listings
//!     let report = harvest(&config, &db_config, HarvestMode::Full, None).await?;
//!
//!     println!("Removed {} rows", report.cleared);
//!     if let Some(crawl) = report.crawl {
//!         println!("Downloaded {} files", crawl.files_downloaded);
//!     }
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod crawler;
pub mod extract;
pub mod harvest;
pub mod store;

pub use error::{Error, Result};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::config::{CrawlTarget, DatabaseConfig, ScraperConfig};
    pub use crate::crawler::{CrawlError, CrawlSummary, Crawler, ProductType};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::harvest::{HarvestMode, HarvestReport, harvest};
    pub use crate::store::{DbError, GuidanceDocument, GuidanceRecord, GuidanceStore};
}
