//! Result types returned by conversion and inspection.

use serde::Serialize;
use std::path::PathBuf;

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// A page with a non-positive or non-finite edge cannot define a deck.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Information dictionary entries and file version. Every field is optional
/// because PDFs routinely omit all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub pdf_version: Option<String>,
}

/// Document-level information read without rendering any page.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetadata {
    pub path: PathBuf,
    pub page_count: usize,
    pub page_sizes: Vec<PageSize>,
    #[serde(flatten)]
    pub info: DocumentInfo,
}

/// Timing and size figures for one finished conversion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    pub source: PathBuf,
    /// `None` when the deck was built in memory and never written.
    pub output: Option<PathBuf>,
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages that became slides.
    pub converted_pages: usize,
    /// Zero-based index of the first converted page.
    pub start_page: usize,
    pub slide_width_emu: i64,
    pub slide_height_emu: i64,
    /// Sum of all embedded image payloads.
    pub image_bytes: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}
