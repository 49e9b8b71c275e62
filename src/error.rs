//! Error types for the pdf2pptx library.
//!
//! Every failure inside one conversion is fatal for that conversion: there
//! is no partial deck and no skip-and-continue. [`Pdf2PptxError`] therefore
//! covers the whole taxonomy, and the batch driver
//! ([`crate::batch::convert_paths`]) is the only place that catches errors
//! and keeps going, recording each one with its [`Pdf2PptxError::kind`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The renderer could not open the document (corrupt, encrypted, or a
    /// degenerate first page).
    #[error("PDF '{path}' cannot be read: {detail}")]
    UnreadableDocument { path: PathBuf, detail: String },

    /// Requested start page / page count falls outside the document.
    #[error(
        "Page range out of bounds: start page {start}{} but document has {total} pages",
        .count.map(|c| format!(" with {c} pages")).unwrap_or_default()
    )]
    PageOutOfRange {
        start: usize,
        count: Option<usize>,
        total: usize,
    },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// A rasterised page could not be compressed to the target format.
    #[error("Image encoding failed for page {page}: {source}")]
    EncodingFailed {
        page: usize,
        #[source]
        source: image::ImageError,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output deck.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory).\n\
  • Place libpdfium next to the pdf2pptx executable or in the working directory.\n\
  • Install pdfium system-wide so the dynamic loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Control flow ──────────────────────────────────────────────────────
    /// The conversion was cancelled between pages.
    #[error("Conversion cancelled after {completed}/{total} pages")]
    Cancelled { completed: usize, total: usize },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PptxError {
    /// Short, stable name of the failure kind, used in batch reports and
    /// JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Pdf2PptxError::FileNotFound { .. } | Pdf2PptxError::PermissionDenied { .. } => {
                "not_found"
            }
            Pdf2PptxError::NotAPdf { .. } | Pdf2PptxError::UnreadableDocument { .. } => {
                "unreadable_document"
            }
            Pdf2PptxError::PageOutOfRange { .. } => "range",
            Pdf2PptxError::RasterisationFailed { .. } => "rasterisation",
            Pdf2PptxError::EncodingFailed { .. } => "encoding",
            Pdf2PptxError::OutputWriteFailed { .. } => "write",
            Pdf2PptxError::InvalidConfig(_) => "config",
            Pdf2PptxError::PdfiumBindingFailed(_) => "pdfium_binding",
            Pdf2PptxError::Cancelled { .. } => "cancelled",
            Pdf2PptxError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_display_without_count() {
        let e = Pdf2PptxError::PageOutOfRange {
            start: 10,
            count: None,
            total: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("start page 10 but"), "got: {msg}");
        assert!(msg.contains("3 pages"), "got: {msg}");
    }

    #[test]
    fn range_display_with_count() {
        let e = Pdf2PptxError::PageOutOfRange {
            start: 2,
            count: Some(5),
            total: 4,
        };
        assert!(e.to_string().contains("with 5 pages"));
    }

    #[test]
    fn kinds_group_the_taxonomy() {
        let not_found = Pdf2PptxError::FileNotFound {
            path: PathBuf::from("a.pdf"),
        };
        let not_pdf = Pdf2PptxError::NotAPdf {
            path: PathBuf::from("a.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert_eq!(not_found.kind(), "not_found");
        assert_eq!(not_pdf.kind(), "unreadable_document");
        assert_eq!(
            Pdf2PptxError::Cancelled {
                completed: 1,
                total: 3
            }
            .kind(),
            "cancelled"
        );
    }

    #[test]
    fn write_error_names_path() {
        let e = Pdf2PptxError::OutputWriteFailed {
            path: PathBuf::from("/ro/out.pptx"),
            detail: "read-only file system".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/ro/out.pptx"));
        assert!(msg.contains("read-only"));
    }
}
