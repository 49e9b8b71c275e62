//! Locating and binding the pdfium shared library.
//!
//! Candidates are tried in order and the first one that loads wins:
//!
//! 1. `PDFIUM_LIB_PATH`: the library file itself, or a directory holding it
//! 2. the directory containing the running executable
//! 3. the current working directory
//! 4. whatever the system dynamic loader finds
//!
//! One [`Pdfium`] instance is bound per conversion (or per batch) and
//! dropped with it. Nothing is cached in process-global state.

use crate::error::Pdf2PptxError;
use pdfium_render::prelude::*;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit pdfium library or directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to the first pdfium library that loads.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2PptxError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let candidates = library_candidates(std::env::var_os(PDFIUM_LIB_PATH_ENV), exe_dir);

    let mut failures = Vec::new();
    for candidate in &candidates {
        if !candidate.is_file() {
            continue;
        }
        match Pdfium::bind_to_library(candidate) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => failures.push(format!("{}: {}", candidate.display(), e)),
        }
    }

    match Pdfium::bind_to_system_library() {
        Ok(bindings) => {
            debug!("Bound system pdfium library");
            Ok(Pdfium::new(bindings))
        }
        Err(e) => {
            failures.push(format!("system library: {}", e));
            Err(Pdf2PptxError::PdfiumBindingFailed(failures.join("; ")))
        }
    }
}

/// Library paths to try before the system loader, in priority order.
pub fn library_candidates(env_value: Option<OsString>, exe_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let lib_name = Pdfium::pdfium_platform_library_name();
    let mut candidates = Vec::new();

    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        let path = PathBuf::from(value);
        if path.is_dir() {
            candidates.push(path.join(&lib_name));
        } else {
            candidates.push(path);
        }
    }
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(&lib_name));
    }
    candidates.push(PathBuf::from(".").join(&lib_name));

    candidates
}
