//! Section classification for links on a guidance listing page
//!
//! Listing pages group their documents under collapsible panels. The panel
//! titles form a whitelist, and each link is filed under the nearest
//! whitelisted heading found by walking up from the link.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Bucket for links with no whitelisted heading above them
pub const OTHER_DOCUMENTS: &str = "Other Documents";

static COLLAPSE_HEADER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button.collapse-header").expect("static selector parses"));
static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5").expect("static selector parses"));
static HYPERLINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector parses"));

/// Section titles considered authoritative for one landing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionWhitelist {
    titles: BTreeSet<String>,
}

impl SectionWhitelist {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Titles in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}

/// Trimmed text content of an element
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collect the section titles of a landing page
///
/// Collapsible panel headers are preferred. Pages without them fall back to
/// `h1`–`h5` headings whose parent element also holds a hyperlink.
pub fn derive_whitelist(document: &Html) -> SectionWhitelist {
    let mut titles: BTreeSet<String> = document
        .select(&COLLAPSE_HEADER)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();

    if titles.is_empty() {
        titles = document
            .select(&HEADING)
            .filter(|heading| {
                heading
                    .parent()
                    .and_then(ElementRef::wrap)
                    .is_some_and(|parent| parent.select(&HYPERLINK).next().is_some())
            })
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
    }

    SectionWhitelist { titles }
}

/// Lazily walks from an element up to the document root
///
/// Yields the element itself first, then each enclosing element. The walk
/// ends at the root and cannot be restarted.
pub struct AncestorChain<'a> {
    next: Option<ElementRef<'a>>,
}

impl<'a> AncestorChain<'a> {
    pub fn new(start: ElementRef<'a>) -> Self {
        Self { next: Some(start) }
    }
}

impl<'a> Iterator for AncestorChain<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent().and_then(ElementRef::wrap);
        Some(current)
    }
}

/// Section a link belongs to
///
/// At every step of the walk the first heading inside the current element is
/// a candidate; the first whitelisted candidate wins. When the walk reaches
/// the root without a match the link is filed under [`OTHER_DOCUMENTS`].
pub fn classify_link(link: ElementRef<'_>, whitelist: &SectionWhitelist) -> String {
    AncestorChain::new(link)
        .filter_map(|ancestor| ancestor.select(&HEADING).next())
        .map(element_text)
        .find(|candidate| whitelist.contains(candidate))
        .unwrap_or_else(|| OTHER_DOCUMENTS.to_string())
}
