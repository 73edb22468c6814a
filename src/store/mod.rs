//! Guidance table module
//!
//! This module stores one row per guidance document title in the
//! `medical_guidelines` table, together with the text extracted from the
//! downloaded file.

mod database;
pub mod error;
mod schema;

pub use database::GuidanceStore;
pub use error::DbError;
pub use schema::GUIDANCE_TABLE;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::crawler::ProductType;

/// A downloaded document ready to be recorded
#[derive(Debug, Clone)]
pub struct GuidanceDocument {
    /// Display text of the link; the natural key of the row
    pub title: String,

    /// Section the link was filed under
    pub section: String,

    /// URL the file was downloaded from
    pub file_url: String,

    /// Where the file was written
    pub file_path: PathBuf,

    /// Product classification of the crawl target
    pub product_type: ProductType,
}

/// A row of the guidance table
#[derive(Debug, Clone)]
pub struct GuidanceRecord {
    pub id: i64,
    pub title: String,
    pub summary: String,
    /// Absolute URL of the source document
    pub link_guidance: String,
    /// Local path of the downloaded file
    pub link_file: String,
    pub products: String,
    pub country: String,
    pub agency: String,
    /// Free-form metadata, currently `{"section": ...}`
    pub json_data: serde_json::Value,
    /// Extracted text, accumulated across ingestions of the same title
    pub all_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row had this title; one was inserted
    Inserted,

    /// A row with this title was updated in place
    Updated,
}

/// Append newly extracted text to what a row already holds
///
/// Empty new text leaves the row untouched; otherwise texts are separated by
/// a blank line.
pub fn merge_all_text(previous: &str, new_text: &str) -> String {
    if new_text.is_empty() {
        previous.to_string()
    } else if previous.is_empty() {
        new_text.to_string()
    } else {
        format!("{}\n\n{}", previous, new_text)
    }
}
