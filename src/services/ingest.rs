//! Upload processing: turning uploaded bytes into topics and lesson text.
//!
//! Text files must be UTF-8. PDF text extraction is behind the `pdf`
//! feature (enabled by default).

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::MaterialKind;

/// Split text into trimmed, non-empty lines.
pub fn parse_topics(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether an upload carries nothing worth storing.
pub fn is_empty_upload(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Extract plain text from an uploaded file.
pub fn extract_text(filename: &str, bytes: &[u8]) -> DomainResult<String> {
    let text = match MaterialKind::from_filename(filename) {
        MaterialKind::Pdf => extract_pdf(filename, bytes)?,
        MaterialKind::Text | MaterialKind::Other => decode_utf8(filename, bytes)?,
    };
    Ok(normalize_newlines(&text))
}

fn decode_utf8(filename: &str, bytes: &[u8]) -> DomainResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| DomainError::InvalidUpload {
        filename: filename.to_string(),
        reason: format!("file is not valid UTF-8 text ({e})"),
    })
}

#[cfg(feature = "pdf")]
fn extract_pdf(filename: &str, bytes: &[u8]) -> DomainResult<String> {
    use pdf_extract::extract_text_from_mem;

    extract_text_from_mem(bytes).map_err(|e| DomainError::InvalidUpload {
        filename: filename.to_string(),
        reason: format!("PDF extraction failed: {e}"),
    })
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(filename: &str, _bytes: &[u8]) -> DomainResult<String> {
    Err(DomainError::UnsupportedFormat(format!(
        "{filename}: PDF support is disabled, rebuild with --features pdf"
    )))
}

fn normalize_newlines(text: &str) -> String {
    // pdf-extract emits form feeds between pages.
    text.replace("\r\n", "\n").replace(['\r', '\x0C'], "\n")
}
