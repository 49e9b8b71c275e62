//! In-memory deck model.

use crate::error::DeckError;
use crate::{Result, DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH, MAX_SLIDE_EDGE, MIN_SLIDE_EDGE};
use std::path::Path;

/// Encoded image formats a slide picture may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Jpeg,
    Png,
}

impl MediaFormat {
    /// File extension used for the media part.
    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Png => "png",
        }
    }

    /// MIME content type registered in `[Content_Types].xml`.
    pub fn content_type(self) -> &'static str {
        match self {
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Png => "image/png",
        }
    }
}

/// Position and size of a shape on a slide, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Placement {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// An embedded picture: encoded bytes plus where it sits on the slide.
#[derive(Debug, Clone)]
pub struct Picture {
    data: Vec<u8>,
    format: MediaFormat,
    placement: Placement,
    description: String,
}

impl Picture {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> MediaFormat {
        self.format
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Alt text written to the shape's `descr` attribute.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the alt text for this picture.
    pub fn set_description(&mut self, text: impl Into<String>) -> &mut Self {
        self.description = text.into();
        self
    }
}

/// A slide built on the blank layout.
#[derive(Debug, Clone)]
pub struct Slide {
    id: u32,
    pictures: Vec<Picture>,
}

impl Slide {
    fn new(id: u32) -> Self {
        Self {
            id,
            pictures: Vec::new(),
        }
    }

    /// Identifier written to `<p:sldId id=…>`; unique within the deck.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Embed an encoded image on this slide.
    pub fn add_picture(
        &mut self,
        data: Vec<u8>,
        format: MediaFormat,
        placement: Placement,
    ) -> &mut Picture {
        let index = self.pictures.len();
        self.pictures.push(Picture {
            data,
            format,
            placement,
            description: String::new(),
        });
        &mut self.pictures[index]
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }
}

/// A presentation under construction.
///
/// Slide size is fixed for the whole deck; slides can only be appended.
#[derive(Debug, Clone)]
pub struct SlideDeck {
    slide_width: i64,
    slide_height: i64,
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Create an empty 10 in × 7.5 in deck.
    pub fn new() -> Self {
        Self {
            slide_width: DEFAULT_SLIDE_WIDTH,
            slide_height: DEFAULT_SLIDE_HEIGHT,
            slides: Vec::new(),
        }
    }

    /// Create an empty deck with the given slide size in EMU.
    pub fn with_size(width: i64, height: i64) -> Result<Self> {
        let mut deck = Self::new();
        deck.set_slide_size(width, height)?;
        Ok(deck)
    }

    /// Change the slide size. Both edges must lie within
    /// [`MIN_SLIDE_EDGE`]..=[`MAX_SLIDE_EDGE`].
    pub fn set_slide_size(&mut self, width: i64, height: i64) -> Result<()> {
        let valid = MIN_SLIDE_EDGE..=MAX_SLIDE_EDGE;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(DeckError::InvalidSlideSize {
                width,
                height,
                min: MIN_SLIDE_EDGE,
                max: MAX_SLIDE_EDGE,
            });
        }
        self.slide_width = width;
        self.slide_height = height;
        Ok(())
    }

    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Append a slide using the blank layout and return it for editing.
    pub fn add_blank_slide(&mut self) -> &mut Slide {
        // PowerPoint reserves ids below 256.
        let index = self.slides.len();
        self.slides.push(Slide::new(256 + index as u32));
        &mut self.slides[index]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Total bytes of embedded media across all slides.
    pub fn media_bytes(&self) -> u64 {
        self.slides
            .iter()
            .flat_map(|s| s.pictures.iter())
            .map(|p| p.data.len() as u64)
            .sum()
    }

    /// Serialise the deck as a `.pptx` package into `writer`.
    pub fn write_to<W: std::io::Write + std::io::Seek>(&self, writer: W) -> Result<W> {
        crate::package::write_package(self, writer)
    }

    /// Serialise the deck to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut file = self.write_to(std::io::BufWriter::new(file))?;
        std::io::Write::flush(&mut file)?;
        Ok(())
    }
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new()
    }
}
