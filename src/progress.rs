//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the converter opens a document and turns each page into a
//! slide. The CLI drives its progress bar from these events; library callers
//! can forward them anywhere without the converter knowing how.
//!
//! # Example
//!
//! ```rust
//! use pdf2pptx::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     slides: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, image_bytes: usize) {
//!         self.slides.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} embedded ({} bytes)", page_num, total_pages, image_bytes);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     slides: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the converter as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Pages are processed in order on a single thread,
/// so events for one document never interleave; the `Send + Sync` bound lets
/// the same callback be shared across the blocking worker and the caller.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the document has been opened, before the page range is
    /// checked.
    ///
    /// # Arguments
    /// * `path`      : the PDF being converted
    /// * `page_count`: total pages in the document
    fn on_document_opened(&self, path: &Path, page_count: usize) {
        let _ = (path, page_count);
    }

    /// Called once before the first selected page is rendered.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will become slides
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is rasterised.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number in the document
    /// * `total_pages`: total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page has been rendered, encoded and placed on its slide.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: total pages
    /// * `image_bytes`: size of the encoded image embedded for this page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, image_bytes: usize) {
        let _ = (page_num, total_pages, image_bytes);
    }

    /// Called when a page fails. The conversion aborts right after.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after the deck has been written.
    ///
    /// # Arguments
    /// * `total_pages`: total pages in the document
    /// * `slide_count`: slides in the written deck
    fn on_conversion_complete(&self, total_pages: usize, slide_count: usize) {
        let _ = (total_pages, slide_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
