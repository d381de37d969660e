//! Document-to-text capability. Extraction and scoring only ever see `String`s;
//! everything format-specific stays behind `DocumentDecoder`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Document could not be decoded: {0}")]
    Decode(String),
}

/// Declared format of an uploaded document, taken from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    /// `.txt`, `.doc`, `.docx`: read as raw UTF-8 with invalid sequences dropped.
    PlainText,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Result<Self, DocumentError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| DocumentError::UnsupportedFormat(filename.to_string()))?;

        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" | "doc" | "docx" => Ok(DocumentFormat::PlainText),
            _ => Err(DocumentError::UnsupportedFormat(filename.to_string())),
        }
    }
}

/// Turns document bytes into text. Implementations may block on CPU; callers on
/// an async runtime run them through `spawn_blocking`.
pub trait DocumentDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DocumentError>;
}

/// Default decoder: PDFs through `pdf-extract`, everything else as lossy UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextDecoder;

impl DocumentDecoder for PdfTextDecoder {
    fn decode(&self, bytes: &[u8], format: DocumentFormat) -> Result<String, DocumentError> {
        match format {
            DocumentFormat::Pdf => decode_pdf(bytes),
            DocumentFormat::PlainText => Ok(decode_lossy(bytes)),
        }
    }
}

fn decode_pdf(bytes: &[u8]) -> Result<String, DocumentError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DocumentError::Decode(format!("PDF extraction failed: {e}"))),
        Err(_) => Err(DocumentError::Decode(
            "PDF extraction failed: malformed document".to_string(),
        )),
    }
}

/// UTF-8 decode that drops invalid byte sequences rather than failing.
/// A U+FFFD that was validly encoded in the input is kept.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
