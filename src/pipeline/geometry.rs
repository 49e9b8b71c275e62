//! Deck geometry: slide size from page 0, picture placement per fit policy.
//!
//! All lengths are EMU (914,400 per inch). The slide's aspect ratio is fixed
//! once from page 0 and never re-derived, so later pages with another shape
//! are reconciled by the [`FitPolicy`] instead of by resizing the deck.

use crate::config::FitPolicy;
use crate::output::PageSize;
use pptx_deck::Placement;

/// Slide dimensions shared by every slide of one deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckGeometry {
    pub width_emu: i64,
    pub height_emu: i64,
}

impl DeckGeometry {
    /// Keep `height_emu` and derive the width from page 0's aspect ratio.
    ///
    /// Returns `None` for a degenerate page (zero, negative or non-finite
    /// edge), which cannot define an aspect ratio.
    pub fn from_first_page(first_page: PageSize, height_emu: i64) -> Option<Self> {
        if first_page.is_degenerate() {
            return None;
        }
        let width_emu = (height_emu as f64 * first_page.aspect_ratio()).round() as i64;
        Some(Self {
            width_emu,
            height_emu,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width_emu as f64 / self.height_emu as f64
    }

    /// Where a `width_px` × `height_px` page image goes on a slide.
    pub fn place_picture(&self, fit: FitPolicy, width_px: u32, height_px: u32) -> Placement {
        let (w, h) = (width_px.max(1) as f64, height_px.max(1) as f64);
        let (slide_w, slide_h) = (self.width_emu, self.height_emu);

        match fit {
            FitPolicy::FitHeight => {
                let cx = (w * slide_h as f64 / h).round() as i64;
                Placement::new(0, 0, cx, slide_h)
            }
            FitPolicy::Stretch => Placement::new(0, 0, slide_w, slide_h),
            FitPolicy::Contain => {
                let scale = (slide_w as f64 / w).min(slide_h as f64 / h);
                let cx = ((w * scale).round() as i64).min(slide_w);
                let cy = ((h * scale).round() as i64).min(slide_h);
                Placement::new((slide_w - cx) / 2, (slide_h - cy) / 2, cx, cy)
            }
        }
    }
}
