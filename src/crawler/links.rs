//! Link discovery on landing and listing pages

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::crawler::error::CrawlError;
use crate::crawler::filename::mentions_document_extension;
use crate::crawler::sections::{SectionWhitelist, classify_link, derive_whitelist, element_text};
use crate::crawler::{DiscoveredLink, ProductType};

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector parses"));

/// An anchor with a resolved target and visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute URL of the anchor
    pub url: String,

    /// Trimmed visible text of the anchor
    pub text: String,
}

/// What a landing page yields once parsed
#[derive(Debug, Clone)]
pub struct LandingPage {
    pub whitelist: SectionWhitelist,
    /// Links in document order, each filed under its section
    pub links: Vec<DiscoveredLink>,
}

/// Resolve an href against the site root
///
/// Anything starting with `http` is taken as already absolute.
pub fn absolutize(base: &Url, href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Skipping unresolvable href {:?}: {}", href, e);
            None
        }
    }
}

/// Whether a link should be fetched as a document rather than scanned as a page
pub fn is_direct_download(url: &str) -> bool {
    mentions_document_extension(url) || url.to_lowercase().contains("download")
}

/// Parse a landing page into its section whitelist and classified links
pub fn parse_landing_page(
    html: &str,
    base_url: &str,
    product_type: ProductType,
) -> Result<LandingPage, CrawlError> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(html);
    let whitelist = derive_whitelist(&document);

    let links = document
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href").unwrap_or_default().trim();
            let text = element_text(anchor);
            if href.is_empty() || text.is_empty() {
                return None;
            }
            let url = absolutize(&base, href)?;
            Some(DiscoveredLink {
                url,
                text,
                section: classify_link(anchor, &whitelist),
                product_type,
            })
        })
        .collect();

    Ok(LandingPage { whitelist, links })
}

/// Document links on a listing page reached from the landing page
///
/// Only anchors whose URL mentions a document extension are kept.
pub fn parse_document_links(html: &str, base_url: &str) -> Result<Vec<PageLink>, CrawlError> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(html);

    let links = document
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href").unwrap_or_default().trim();
            let text = element_text(anchor);
            if href.is_empty() || text.is_empty() {
                return None;
            }
            let url = absolutize(&base, href)?;
            mentions_document_extension(&url).then_some(PageLink { url, text })
        })
        .collect();

    Ok(links)
}
