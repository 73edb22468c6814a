//! Content sniffing for downloads whose name and URL carry no usable extension

/// MIME types of the document formats we keep, with their file extension
pub const MIME_TO_EXT: [(&str, &str); 5] = [
    ("application/pdf", ".pdf"),
    ("application/msword", ".doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".docx",
    ),
    ("application/vnd.ms-excel", ".xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".xlsx",
    ),
];

const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Extension registered for a MIME type, if it is one of ours
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    MIME_TO_EXT
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
}

/// Best-effort MIME type from the leading bytes of a payload
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.is_empty() {
        return "application/x-empty";
    }
    if bytes.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if bytes.starts_with(OLE_MAGIC) {
        // Compound files name their streams in UTF-16LE.
        if contains(bytes, &utf16le("WordDocument")) {
            return "application/msword";
        }
        if contains(bytes, &utf16le("Workbook")) || contains(bytes, &utf16le("Book")) {
            return "application/vnd.ms-excel";
        }
        return "application/CDFV2";
    }
    if bytes.starts_with(ZIP_MAGIC) {
        // Local file headers store part names uncompressed.
        if contains(bytes, b"word/") {
            return "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        }
        if contains(bytes, b"xl/") {
            return "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
        }
        return "application/zip";
    }
    if looks_like_html(bytes) {
        return "text/html";
    }
    "application/octet-stream"
}

/// Extension for a payload, when sniffing recognises one of our formats
pub fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    extension_for_mime(sniff_mime(bytes))
}

fn looks_like_html(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let head: Vec<u8> = bytes[start..]
        .iter()
        .take(16)
        .map(|b| b.to_ascii_lowercase())
        .collect();
    head.starts_with(b"<!doctype html") || head.starts_with(b"<html") || head.starts_with(b"<head")
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
