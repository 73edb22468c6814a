//! # Document Text Extraction Module
//!
//! Turns downloaded guidance documents into plain text for the `all_text`
//! column. PDF files are read page by page; Word packages are read from their
//! main document part. Anything else yields no text.
//!
//! Extraction is best-effort: [`extract_text`] never fails. Corrupt files,
//! legacy binary `.doc` files and parser panics are logged and produce an
//! empty string. [`try_extract_text`] exposes the typed failure.

mod error;

pub use error::ExtractError;

use std::fs;
use std::io::Read;
use std::panic;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

/// Main document part of a Word package
const WORD_DOCUMENT_PART: &str = "word/document.xml";

/// Extract plain text from a downloaded document, or `""` on any failure
pub fn extract_text(path: &Path) -> String {
    match try_extract_text(path) {
        Ok(text) => text,
        Err(ExtractError::UnsupportedExtension(ext)) => {
            debug!("No text extraction for {:?} ({})", path, ext);
            String::new()
        }
        Err(e) => {
            warn!("Error extracting text from {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Extract plain text from a downloaded document, dispatching on its extension
pub fn try_extract_text(path: &Path) -> Result<String, ExtractError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => extract_pdf(path),
        "doc" | "docx" => extract_word(path),
        other => Err(ExtractError::UnsupportedExtension(other.to_string())),
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;

    // Page texts come back already concatenated.
    let text = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
        .map_err(|_| ExtractError::Pdf("parser panicked".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    debug!("Extracted {} characters from {}", text.len(), path.display());
    Ok(text.trim().to_string())
}

fn extract_word(path: &Path) -> Result<String, ExtractError> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    archive.by_name(WORD_DOCUMENT_PART)?.read_to_string(&mut xml)?;

    Ok(word_xml_to_text(&xml)?.trim().to_string())
}

/// Collect the text runs of a WordprocessingML body
///
/// Paragraphs end with a newline, `w:tab` becomes a tab and `w:br`/`w:cr`
/// become newlines.
pub fn word_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{word_body, write_docx, write_pdf};
    use super::*;
    use tempfile::tempdir;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Guidance on</w:t></w:r><w:r><w:t xml:space="preserve"> GMP &amp; GDP</w:t></w:r></w:p>
    <w:p><w:r><w:t>Step</w:t><w:tab/><w:t>One</w:t></w:r></w:p>
    <w:p/>
  </w:body>
</w:document>"#;

    #[test]
    fn test_word_xml_to_text() {
        let text = word_xml_to_text(BODY).unwrap();
        assert_eq!(text, "Guidance on GMP & GDP\nStep\tOne\n\n");
    }

    #[test]
    fn test_extract_docx() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Guide.docx");
        write_docx(&path, BODY);

        assert_eq!(extract_text(&path), "Guidance on GMP & GDP\nStep\tOne");
    }

    #[test]
    fn test_extract_pdf_joins_pages_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Guide.pdf");
        write_pdf(&path, &["Hello page one", "Second page"]);

        let text = try_extract_text(&path).unwrap();
        assert_eq!(text, text.trim());

        let first = text.find("Hello page one").unwrap();
        let second = text.find("Second page").unwrap();
        assert!(first < second);
        assert_eq!(extract_text(&path), text);
    }

    #[test]
    fn test_extract_docx_paragraphs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Form.docx");
        write_docx(&path, &word_body(&["First", "Second"]));

        assert_eq!(extract_text(&path), "First\nSecond");
    }

    #[test]
    fn test_unsupported_extension_yields_empty_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Register.xlsx");
        fs::write(&path, b"PK\x03\x04").unwrap();

        assert!(matches!(
            try_extract_text(&path),
            Err(ExtractError::UnsupportedExtension(_))
        ));
        assert_eq!(extract_text(&path), "");
    }

    #[test]
    fn test_corrupt_files_yield_empty_text() {
        let dir = tempdir().unwrap();

        let pdf = dir.path().join("Broken.pdf");
        fs::write(&pdf, b"%PDF-1.4 truncated").unwrap();
        assert_eq!(extract_text(&pdf), "");

        let doc = dir.path().join("Legacy.doc");
        fs::write(&doc, [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]).unwrap();
        assert!(matches!(try_extract_text(&doc), Err(ExtractError::Zip(_))));
        assert_eq!(extract_text(&doc), "");
    }

    #[test]
    fn test_missing_file_yields_empty_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Nowhere.pdf");

        assert!(matches!(try_extract_text(&path), Err(ExtractError::Io(_))));
        assert_eq!(extract_text(&path), "");
    }
}
