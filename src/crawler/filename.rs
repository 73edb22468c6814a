//! Filesystem-safe names for downloaded documents
//!
//! Display text from the listing page becomes the filename. The extension
//! is taken from the URL when it names a document format, then from the
//! display text, then from the payload itself, and finally defaults to
//! `.pdf`.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::crawler::error::CrawlError;
use crate::crawler::mime::sniff_extension;

/// Document extensions the harvester keeps
pub const VALID_EXTENSIONS: [&str; 5] = [".pdf", ".doc", ".docx", ".xls", ".xlsx"];

static FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("static pattern compiles"));

/// Strip characters that are unsafe in filenames and collapse whitespace
///
/// ```
/// use hsa_guidance::crawler::clean_filename;
///
/// assert_eq!(clean_filename("A:B/C  D"), "ABC D");
/// ```
pub fn clean_filename(name: &str) -> String {
    let stripped = FORBIDDEN_CHARS.replace_all(name, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `ext` (with its leading dot) is one of the kept document formats
pub fn is_valid_extension(ext: &str) -> bool {
    VALID_EXTENSIONS.contains(&ext)
}

/// Whether a URL mentions a document extension anywhere
pub fn mentions_document_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    VALID_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

/// Split a name into stem and extension (extension keeps its dot)
///
/// Leading dots belong to the stem, so `.profile` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let file_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    let file = &name[file_start..];
    let leading_dots = file.len() - file.trim_start_matches('.').len();

    match file[leading_dots..].rfind('.') {
        Some(i) => name.split_at(file_start + leading_dots + i),
        None => (name, ""),
    }
}

/// Lower-cased extension of the last path segment of a URL
pub fn url_extension(source_url: &str) -> String {
    let path = match Url::parse(source_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => source_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    split_extension(&path).1.to_lowercase()
}

/// Work out the filename a download is saved under
///
/// # Arguments
///
/// * `desired_name` - Display text of the link
/// * `source_url` - Absolute URL the payload was fetched from
/// * `body` - Payload bytes, used for sniffing when nothing else names a format
///
/// A name that already carries some other extension, with a payload that
/// sniffing cannot place, is returned unchanged.
pub fn resolve_filename(
    desired_name: &str,
    source_url: &str,
    body: &[u8],
) -> Result<String, CrawlError> {
    let clean = clean_filename(desired_name);
    if clean.is_empty() {
        return Err(CrawlError::InvalidFilename(desired_name.to_string()));
    }

    let (stem, name_ext) = split_extension(&clean);

    let url_ext = url_extension(source_url);
    if is_valid_extension(&url_ext) {
        return Ok(format!("{}{}", stem, url_ext));
    }

    if is_valid_extension(&name_ext.to_lowercase()) {
        return Ok(clean);
    }

    if let Some(ext) = sniff_extension(body) {
        return Ok(format!("{}{}", stem, ext));
    }

    if name_ext.is_empty() {
        return Ok(format!("{}.pdf", clean));
    }

    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename("A:B/C  D"), "ABC D");
        assert_eq!(clean_filename("  <Guide>  on\t\"GMP\"?* "), "Guide on GMP");
        assert_eq!(clean_filename("a\\b|c"), "abc");
        assert_eq!(clean_filename("?*:"), "");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("Report.doc"), ("Report", ".doc"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".profile"), (".profile", ""));
        assert_eq!(split_extension("/docs/file.PDF"), ("/docs/file", ".PDF"));
        assert_eq!(split_extension("/docs.v2/file"), ("/docs.v2/file", ""));
    }

    #[test]
    fn test_url_extension_ignores_query_and_host() {
        assert_eq!(url_extension("https://example.com/a/file.PDF?x=1"), ".pdf");
        assert_eq!(url_extension("https://www.hsa.gov.sg"), "");
        assert_eq!(url_extension("https://example.com/download?id=4#p.pdf"), "");
        assert_eq!(url_extension("/relative/sheet.xlsx?v=2"), ".xlsx");
    }

    #[test]
    fn test_url_extension_overrides_display_name() {
        let name = resolve_filename("Report.doc", "https://example.com/file.pdf?x=1", b"").unwrap();
        assert_eq!(name, "Report.pdf");

        let name = resolve_filename("Annex A", "https://example.com/annex.XLSX", b"").unwrap();
        assert_eq!(name, "Annex A.xlsx");
    }

    #[test]
    fn test_display_name_extension_kept() {
        let name = resolve_filename("Form.DOCX", "https://example.com/download/123", b"%PDF-1.4")
            .unwrap();
        assert_eq!(name, "Form.DOCX");
    }

    #[test]
    fn test_sniffed_mime_applied() {
        let name = resolve_filename("Guidance", "https://example.com/download/7", b"%PDF-1.5\n")
            .unwrap();
        assert_eq!(name, "Guidance.pdf");

        let mut docx = b"PK\x03\x04".to_vec();
        docx.extend_from_slice(b"word/document.xml");
        let name = resolve_filename("Checklist v1.2", "https://example.com/dl", &docx).unwrap();
        assert_eq!(name, "Checklist v1.docx");
    }

    #[test]
    fn test_defaults_to_pdf() {
        let name = resolve_filename("Guidance", "https://example.com/dl", b"unknown").unwrap();
        assert_eq!(name, "Guidance.pdf");
    }

    #[test]
    fn test_known_odd_unresolved_extension_survives() {
        // An unrecognised extension with an unsniffable payload is left alone.
        let name = resolve_filename("Notice v2.1", "https://example.com/dl", b"unknown").unwrap();
        assert_eq!(name, "Notice v2.1");
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = resolve_filename("<>?", "https://example.com/file.pdf", b"");
        assert!(matches!(result, Err(CrawlError::InvalidFilename(_))));
    }

    #[test]
    fn test_mentions_document_extension() {
        assert!(mentions_document_extension("https://example.com/Guide.PDF"));
        assert!(mentions_document_extension("https://example.com/f.docx?x=1"));
        assert!(!mentions_document_extension("https://example.com/guidance-documents"));
    }
}
