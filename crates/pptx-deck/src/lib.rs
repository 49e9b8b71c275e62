//! # pptx-deck
//!
//! A small PresentationML writer for decks made of full-slide pictures.
//!
//! A `.pptx` file is an OPC package: a ZIP archive of XML parts tied
//! together by relationship files. This crate builds only what a
//! picture-per-slide deck needs: a single slide master with its blank
//! layout and theme, plus one slide part per [`Slide`]. The whole package
//! is written in a single pass.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pptx_deck::{MediaFormat, Placement, SlideDeck};
//!
//! let mut deck = SlideDeck::with_size(12_192_000, 6_858_000)?;
//! let jpeg: Vec<u8> = std::fs::read("page-1.jpg")?;
//! deck.add_blank_slide()
//!     .add_picture(jpeg, MediaFormat::Jpeg, Placement::new(0, 0, 12_192_000, 6_858_000));
//! deck.save("deck.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Units
//!
//! All geometry is in EMU (English Metric Units): 914 400 per inch,
//! 12 700 per point.

// ── Modules ──────────────────────────────────────────────────────────────

mod deck;
mod error;
mod package;
mod parts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use deck::{MediaFormat, Picture, Placement, Slide, SlideDeck};
pub use error::DeckError;
pub use package::{inspect_deck, DeckSummary, PictureSummary, SlideSummary};

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Default slide width: 10 in.
pub const DEFAULT_SLIDE_WIDTH: i64 = 9_144_000;

/// Default slide height: 7.5 in. This is the height of the stock 4:3 deck
/// and the baseline that callers scale a width against.
pub const DEFAULT_SLIDE_HEIGHT: i64 = 6_858_000;

/// Smallest slide edge PowerPoint accepts (1 in).
pub const MIN_SLIDE_EDGE: i64 = 914_400;

/// Largest slide edge PowerPoint accepts (56 in).
pub const MAX_SLIDE_EDGE: i64 = 51_206_400;

/// Result alias for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;
