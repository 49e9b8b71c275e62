//! Pipeline stages for PDF-to-PPTX conversion.
//!
//! Each submodule implements exactly one step, so each is testable alone and
//! the rendering backend can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ geometry ──▶ pptx-deck
//! (path)    (pdfium)   (jpeg/png)  (EMU boxes)  (slides)
//! ```
//!
//! 1. [`input`]: validate the PDF path, derive the `.pptx` path, discover
//!    PDFs for batch runs
//! 2. [`render`]: [`render::PageSource`] and its pdfium implementation
//! 3. [`encode`]: compress each `DynamicImage` for embedding
//! 4. [`geometry`]: slide size from page 0 and picture placement

pub mod encode;
pub mod geometry;
pub mod input;
pub mod render;
