//! # Guidance Crawler Module
//!
//! This module walks the regulator's guidance listings, files every document
//! link under the page section it belongs to, downloads the files into the
//! local content tree and hands them to the guidance store.
//!
//! ## Key Components
//!
//! - `Crawler`: Runs the configured crawl targets one after another
//! - `HttpClient`: The single HTTP client shared by every request of a run
//! - Section classification: whitelists panel titles and files links under them
//! - Filename resolution: filesystem-safe names with a document extension
//!
//! ## Failure policy
//!
//! A failing landing page aborts the run. A failing link (download, listing
//! page, filename, write) is logged and the crawl moves on. Storage failures
//! never reach the crawler.

mod error;
mod filename;
mod http;
mod links;
mod mime;
mod orchestrator;
mod sections;

pub use error::CrawlError;
pub use filename::{
    VALID_EXTENSIONS, clean_filename, is_valid_extension, mentions_document_extension,
    resolve_filename, split_extension, url_extension,
};
pub use http::HttpClient;
pub use links::{
    LandingPage, PageLink, absolutize, is_direct_download, parse_document_links,
    parse_landing_page,
};
pub use mime::{MIME_TO_EXT, extension_for_mime, sniff_extension, sniff_mime};
pub use orchestrator::{CrawlEvent, CrawlSummary, Crawler, TargetReport};
pub use sections::{
    AncestorChain, OTHER_DOCUMENTS, SectionWhitelist, classify_link, derive_whitelist,
};

use std::fmt;

/// Product classification recorded with every guidance row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductType {
    MedicalDevice,
    Drugs,
}

impl ProductType {
    /// Device listings are recognised by their folder label
    pub fn for_folder_label(folder_label: &str) -> Self {
        if folder_label.to_lowercase().contains("device") {
            ProductType::MedicalDevice
        } else {
            ProductType::Drugs
        }
    }

    /// Label stored in the `products` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::MedicalDevice => "Medical Device",
            ProductType::Drugs => "Drugs",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link found on a landing page, filed under its section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL of the link
    pub url: String,

    /// Trimmed anchor text; becomes the document title
    pub text: String,

    /// Whitelisted section, or "Other Documents"
    pub section: String,

    /// Classification of the crawl target the link was found on
    pub product_type: ProductType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_from_folder_label() {
        assert_eq!(
            ProductType::for_folder_label("Guidance documents for medical devices"),
            ProductType::MedicalDevice
        );
        assert_eq!(
            ProductType::for_folder_label("Medical DEVICE guidance"),
            ProductType::MedicalDevice
        );
        assert_eq!(
            ProductType::for_folder_label("Guidance documents for therapeutic products"),
            ProductType::Drugs
        );
    }

    #[test]
    fn test_product_type_labels() {
        assert_eq!(ProductType::MedicalDevice.to_string(), "Medical Device");
        assert_eq!(ProductType::Drugs.as_str(), "Drugs");
    }
}
