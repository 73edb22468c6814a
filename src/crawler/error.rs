//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// HTTP client error, including non-success statuses on downloads
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Filesystem error while writing the content tree
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Display text left nothing usable after sanitization
    #[error("Invalid filename: {0:?} is empty after sanitization")]
    InvalidFilename(String),

    /// Error processing a listing page reached from the landing page
    #[error("Error processing page {url}: {source}")]
    NestedPage {
        url: String,
        #[source]
        source: Box<CrawlError>,
    },
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            CrawlError::Io(e) => CrateError::Io(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_conversion_keeps_io_and_flattens_the_rest() {
        let err: CrateError = CrawlError::Io(io::Error::other("disk full")).into();
        assert!(matches!(err, CrateError::Io(_)));

        let nested = CrawlError::NestedPage {
            url: "https://www.hsa.gov.sg/forms".to_string(),
            source: Box::new(CrawlError::InvalidFilename("???".to_string())),
        };
        match CrateError::from(nested) {
            CrateError::Crawl(message) => {
                assert!(message.contains("https://www.hsa.gov.sg/forms"));
                assert!(message.contains("Invalid filename"));
            }
            other => panic!("expected crawl error, got {:?}", other),
        }
    }
}
