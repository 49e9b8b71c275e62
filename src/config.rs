//! Configuration types for PDF-to-PPTX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. There are no module-level defaults
//! that a conversion reads implicitly: the CLI, the batch driver and library
//! callers all pass an explicit config.

use crate::error::Pdf2PptxError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default rendering resolution in DPI.
pub const DEFAULT_RESOLUTION: u32 = 300;

/// PDF user space is defined at 72 points per inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Default JPEG quality for embedded page images.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Baseline slide height in EMU (7.5 in, the stock 4:3 slide height).
/// The deck's width is derived from this and page 0's aspect ratio.
pub const DEFAULT_SLIDE_HEIGHT_EMU: i64 = pptx_deck::DEFAULT_SLIDE_HEIGHT;

/// Configuration for a PDF-to-PPTX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2pptx::{ConversionConfig, FitPolicy};
///
/// let config = ConversionConfig::builder()
///     .resolution(150)
///     .start_page(2)
///     .page_count(2)
///     .fit(FitPolicy::Contain)
///     .build()
///     .unwrap();
/// assert_eq!(config.pages.start, 2);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering resolution: output pixels per 72 PDF points. Must be > 0.
    /// Default: 300.
    pub resolution: u32,

    /// Which pages become slides. Default: every page.
    pub pages: PageRange,

    /// How each rasterised page is compressed before embedding.
    /// Default: JPEG at quality 95.
    pub encoding: ImageEncoding,

    /// How each picture is sized on its slide. Default: [`FitPolicy::FitHeight`].
    pub fit: FitPolicy,

    /// Baseline slide height in EMU. Default: [`DEFAULT_SLIDE_HEIGHT_EMU`].
    pub slide_height_emu: i64,

    /// Optional observer for per-page progress events.
    pub progress_callback: Option<ProgressCallback>,

    /// Optional cancellation flag, checked between pages.
    pub cancel: Option<CancelToken>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            pages: PageRange::default(),
            encoding: ImageEncoding::default(),
            fit: FitPolicy::default(),
            slide_height_emu: DEFAULT_SLIDE_HEIGHT_EMU,
            progress_callback: None,
            cancel: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("resolution", &self.resolution)
            .field("pages", &self.pages)
            .field("encoding", &self.encoding)
            .field("fit", &self.fit)
            .field("slide_height_emu", &self.slide_height_emu)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Zoom factor applied to PDF points when rasterising.
    pub fn zoom(&self) -> f32 {
        self.resolution as f32 / PDF_POINTS_PER_INCH
    }

    /// `true` once the attached cancel token has been triggered.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Check the invariants the builder enforces. Also used on configs
    /// assembled by hand through the public fields.
    pub fn validate(&self) -> Result<(), Pdf2PptxError> {
        if self.resolution == 0 {
            return Err(Pdf2PptxError::InvalidConfig(
                "Resolution must be > 0".into(),
            ));
        }
        if let ImageEncoding::Jpeg { quality } = self.encoding {
            if !(1..=100).contains(&quality) {
                return Err(Pdf2PptxError::InvalidConfig(format!(
                    "JPEG quality must be 1–100, got {quality}"
                )));
            }
        }
        if self.pages.count == Some(0) {
            return Err(Pdf2PptxError::InvalidConfig(
                "Page count must be ≥ 1".into(),
            ));
        }
        let edges = pptx_deck::MIN_SLIDE_EDGE..=pptx_deck::MAX_SLIDE_EDGE;
        if !edges.contains(&self.slide_height_emu) {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "Slide height must be {}–{} EMU, got {}",
                edges.start(),
                edges.end(),
                self.slide_height_emu
            )));
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn resolution(mut self, dpi: u32) -> Self {
        self.config.resolution = dpi;
        self
    }

    pub fn start_page(mut self, start: usize) -> Self {
        self.config.pages.start = start;
        self
    }

    pub fn page_count(mut self, count: usize) -> Self {
        self.config.pages.count = Some(count);
        self
    }

    pub fn pages(mut self, pages: PageRange) -> Self {
        self.config.pages = pages;
        self
    }

    pub fn encoding(mut self, encoding: ImageEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    pub fn fit(mut self, fit: FitPolicy) -> Self {
        self.config.fit = fit;
        self
    }

    pub fn slide_height_emu(mut self, emu: i64) -> Self {
        self.config.slide_height_emu = emu;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.config.cancel = Some(token);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Page selection ───────────────────────────────────────────────────────

/// A contiguous, zero-based run of pages: `start` and an optional `count`
/// (absent = through the last page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub count: Option<usize>,
}

impl PageRange {
    pub fn new(start: usize, count: Option<usize>) -> Self {
        Self { start, count }
    }

    /// Resolve against a document of `total_pages` pages.
    ///
    /// Out-of-range requests are rejected, never clamped: `start` must be a
    /// valid page and `start + count` must not run past the last page.
    pub fn resolve(&self, total_pages: usize) -> Result<Range<usize>, Pdf2PptxError> {
        let out_of_range = || Pdf2PptxError::PageOutOfRange {
            start: self.start,
            count: self.count,
            total: total_pages,
        };

        if self.start >= total_pages {
            return Err(out_of_range());
        }
        let end = match self.count {
            None => total_pages,
            Some(0) => return Err(out_of_range()),
            Some(count) => self
                .start
                .checked_add(count)
                .filter(|&end| end <= total_pages)
                .ok_or_else(out_of_range)?,
        };
        Ok(self.start..end)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Compression applied to each rasterised page before it is embedded.
///
/// JPEG keeps decks small; PNG is lossless and keeps thin lines and small
/// text crisp at the cost of much larger files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageEncoding {
    /// Lossy JPEG with quality 1–100. (default, quality 95)
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png,
}

impl Default for ImageEncoding {
    fn default() -> Self {
        ImageEncoding::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageEncoding {
    pub fn media_format(self) -> pptx_deck::MediaFormat {
        match self {
            ImageEncoding::Jpeg { .. } => pptx_deck::MediaFormat::Jpeg,
            ImageEncoding::Png => pptx_deck::MediaFormat::Png,
        }
    }
}

/// How a page image is sized on a slide whose aspect ratio was fixed by
/// page 0.
///
/// | Policy | Behaviour when the page's shape differs from page 0 |
/// |--------|------------------------------------------------------|
/// | `FitHeight` | Height fills the slide; width follows the image and may overflow or underflow the slide on the right |
/// | `Contain` | Scaled to fit inside the slide and centred (letterbox / pillarbox) |
/// | `Stretch` | Distorted to exactly fill the slide |
///
/// For pages with page 0's shape all three produce the same full-bleed
/// picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitPolicy {
    #[default]
    FitHeight,
    Contain,
    Stretch,
}

// ── Cancellation ─────────────────────────────────────────────────────────

/// Cloneable flag that asks a running conversion to stop before its next
/// page. No slide is ever left half-written.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
