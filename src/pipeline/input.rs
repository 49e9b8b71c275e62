//! Input resolution: validate a user-supplied PDF path, derive its output
//! path, and discover PDFs in a directory for batch runs.
//!
//! Validation happens before pdfium is ever bound so a missing file or a
//! stray `.pdf` that is really a ZIP produces a precise error instead of an
//! opaque renderer failure.

use crate::error::Pdf2PptxError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension given to every output deck.
pub const OUTPUT_EXTENSION: &str = "pptx";

/// Validate that `path` exists, is readable and starts with `%PDF`.
pub fn resolve_input(path: &Path) -> Result<PathBuf, Pdf2PptxError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(Pdf2PptxError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            match f.read_exact(&mut magic) {
                Ok(()) if &magic == b"%PDF" => {}
                Ok(()) => return Err(Pdf2PptxError::NotAPdf { path, magic }),
                Err(e) => {
                    return Err(Pdf2PptxError::UnreadableDocument {
                        path,
                        detail: format!("file too short to be a PDF ({e})"),
                    })
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2PptxError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2PptxError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

/// Output path for `input`: same directory and stem, `.pptx` extension.
///
/// `talk.pdf` → `talk.pptx`, `Slides.PDF` → `Slides.pptx`,
/// `notes` → `notes.pptx`.
pub fn derive_output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

/// `true` when `path` has a `.pdf` extension, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Every regular file directly inside `dir` whose extension is `.pdf` in
/// any case, sorted by path so batch runs are reproducible. Not recursive.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, Pdf2PptxError> {
    let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => Pdf2PptxError::PermissionDenied {
            path: dir.to_path_buf(),
        },
        _ => Pdf2PptxError::FileNotFound {
            path: dir.to_path_buf(),
        },
    })?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Pdf2PptxError::Internal(format!("read_dir: {e}")))?;
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }
    pdfs.sort();

    debug!("Discovered {} PDF(s) in {}", pdfs.len(), dir.display());
    Ok(pdfs)
}
