//! # Harvester Configuration Module
//!
//! This module provides the immutable configuration shared by every stage of
//! the harvest: where the site lives, which listing pages to walk, how long to
//! wait for a response, where downloaded files land, and how rows are tagged.
//! It uses a builder pattern for flexible configuration.
//!
//! ## Key Components
//!
//! - `ScraperConfig`: The main configuration struct, constructed once at startup
//! - `ScraperConfigBuilder`: Builder pattern implementation for overriding defaults
//! - `CrawlTarget`: One listing page and the folder its documents are filed under
//! - `DatabaseConfig`: Location of the guidance table, sourced from the environment

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Root of the regulator's website
pub const BASE_URL: &str = "https://www.hsa.gov.sg";

/// Per-request deadline in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root of the local content tree
pub const DATA_DIR: &str = "data/hsa";

/// User agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Jurisdiction written to, and cleared from, the guidance table
pub const COUNTRY: &str = "Singapore";

/// Issuing agency written to the guidance table
pub const AGENCY: &str = "HSA";

/// Default location of the local guidance database
pub const DEFAULT_DB_PATH: &str = "data/quriousri.db";

/// A listing page to crawl and the folder its documents are filed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Path of the listing page relative to the base URL
    pub entry_path: String,

    /// Folder label; also decides the product classification
    pub folder_label: String,
}

impl CrawlTarget {
    pub fn new(entry_path: impl Into<String>, folder_label: impl Into<String>) -> Self {
        Self {
            entry_path: entry_path.into(),
            folder_label: folder_label.into(),
        }
    }
}

/// The two guidance listings published by HSA
pub fn default_targets() -> Vec<CrawlTarget> {
    vec![
        CrawlTarget::new(
            "therapeutic-products/guidance-documents",
            "Guidance documents for therapeutic products",
        ),
        CrawlTarget::new(
            "medical-devices/guidance-documents",
            "Guidance documents for medical devices",
        ),
    ]
}

/// Configuration for a harvest run
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Base URL of the site, without a trailing slash
    pub base_url: String,

    /// Deadline applied to every request
    pub request_timeout: Duration,

    /// Root of the local content tree
    pub data_dir: PathBuf,

    /// User agent to use for requests
    pub user_agent: String,

    /// Listing pages to crawl, in order
    pub targets: Vec<CrawlTarget>,

    /// Country tag for inserted rows
    pub country: String,

    /// Agency tag for inserted rows
    pub agency: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            data_dir: PathBuf::from(DATA_DIR),
            user_agent: USER_AGENT.to_string(),
            targets: default_targets(),
            country: COUNTRY.to_string(),
            agency: AGENCY.to_string(),
        }
    }
}

/// Builder for ScraperConfig
#[derive(Debug, Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ScraperConfig::default(),
        }
    }

    /// Set the base URL of the site
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request deadline
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set the root of the local content tree
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Replace the listing pages to crawl
    pub fn targets(mut self, targets: Vec<CrawlTarget>) -> Self {
        self.config.targets = targets;
        self
    }

    /// Set the jurisdiction tags written to the guidance table
    pub fn jurisdiction(mut self, country: impl Into<String>, agency: impl Into<String>) -> Self {
        self.config.country = country.into();
        self.config.agency = agency.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ScraperConfig {
        self.config
    }
}

impl ScraperConfig {
    /// Create a new builder
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::new()
    }

    /// URL of a listing page
    pub fn entry_url(&self, target: &CrawlTarget) -> String {
        format!(
            "{}/{}",
            self.base_url,
            target.entry_path.trim_start_matches('/')
        )
    }

    /// Folder holding every document of a target
    pub fn target_dir(&self, target: &CrawlTarget) -> PathBuf {
        self.data_dir.join(&target.folder_label)
    }

    /// Location of the plain-text run log
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("harvest.log")
    }
}

/// Where the guidance table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// SQLite-compatible file on local disk
    Local { path: PathBuf },

    /// Remote libsql server
    Remote { url: String, auth_token: String },
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Local {
            path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl DatabaseConfig {
    /// Read the database location from `GUIDANCE_DB_URL`, `GUIDANCE_DB_TOKEN`
    /// and `GUIDANCE_DB_PATH`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("GUIDANCE_DB_URL").filter(|u| !u.trim().is_empty()) {
            let parsed = url::Url::parse(url.trim())
                .map_err(|e| Error::Config(format!("GUIDANCE_DB_URL is not a URL: {}", e)))?;
            return Ok(DatabaseConfig::Remote {
                url: parsed.to_string(),
                auth_token: lookup("GUIDANCE_DB_TOKEN").unwrap_or_default(),
            });
        }

        let path = lookup("GUIDANCE_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        Ok(DatabaseConfig::Local {
            path: PathBuf::from(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ScraperConfig::default();

        assert_eq!(config.base_url, "https://www.hsa.gov.sg");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.data_dir, PathBuf::from("data/hsa"));
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.country, "Singapore");
        assert_eq!(config.agency, "HSA");
    }

    #[test]
    fn test_entry_url_and_target_dir() {
        let config = ScraperConfig::builder()
            .base_url("http://127.0.0.1:8080/")
            .data_dir("/tmp/content")
            .build();
        let target = CrawlTarget::new("/medical-devices/guidance-documents", "Devices");

        assert_eq!(
            config.entry_url(&target),
            "http://127.0.0.1:8080/medical-devices/guidance-documents"
        );
        assert_eq!(config.target_dir(&target), PathBuf::from("/tmp/content/Devices"));
    }

    #[test]
    fn test_database_config_defaults_to_local_file() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DatabaseConfig::default());
    }

    #[test]
    fn test_database_config_remote() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("GUIDANCE_DB_URL", "libsql://guidance.example.com"),
            ("GUIDANCE_DB_TOKEN", "secret"),
        ]))
        .unwrap();

        match config {
            DatabaseConfig::Remote { url, auth_token } => {
                assert!(url.starts_with("libsql://guidance.example.com"));
                assert_eq!(auth_token, "secret");
            }
            other => panic!("expected remote config, got {:?}", other),
        }
    }

    #[test]
    fn test_database_config_rejects_bad_url() {
        let result = DatabaseConfig::from_lookup(lookup_from(&[("GUIDANCE_DB_URL", "not a url")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
