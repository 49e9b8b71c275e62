//! # pdf2pptx
//!
//! Convert PDF documents to PowerPoint decks, one page per slide.
//!
//! Every page is rasterised through pdfium and embedded as a single picture
//! on its own slide. Nothing is extracted or re-flowed: the deck looks
//! exactly like the PDF, which is what you want for Beamer talks, exported
//! slide PDFs, or scanned handouts that need to be presented from
//! PowerPoint or Keynote.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate path and %PDF header, derive <stem>.pptx
//!  ├─ 2. Geometry  slide size from page 0's aspect ratio, 7.5 in tall
//!  ├─ 3. Render    rasterise each selected page at resolution/72 zoom
//!  ├─ 4. Encode    JPEG (default) or PNG
//!  ├─ 5. Slides    one blank slide per page, picture placed by FitPolicy
//!  └─ 6. Output    deck written to a temp file, then renamed into place
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().resolution(150).build()?;
//!     let stats = convert("talk.pdf", None, &config).await?;
//!     eprintln!("{} slides, {} bytes of images",
//!         stats.converted_pages,
//!         stats.image_bytes);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! A pdfium shared library must be loadable at run time. See
//! [`engine`] for the search order.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod engine;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_directory, convert_paths, BatchReport, FileOutcome, FileStatus};
pub use config::{
    CancelToken, ConversionConfig, ConversionConfigBuilder, FitPolicy, ImageEncoding, PageRange,
};
pub use convert::{convert, convert_source, convert_sync, inspect, inspect_sync};
pub use error::Pdf2PptxError;
pub use output::{ConversionStats, DocumentInfo, DocumentMetadata, PageSize};
pub use pipeline::render::PageSource;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
