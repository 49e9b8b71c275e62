//! Image encoding: `DynamicImage` → compressed bytes ready to embed.

use crate::config::ImageEncoding;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use pptx_deck::MediaFormat;
use std::io::Cursor;
use tracing::debug;

/// A page image after compression.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: MediaFormat,
    pub width: u32,
    pub height: u32,
}

/// Compress a rasterised page.
///
/// JPEG has no alpha channel, so the bitmap is flattened to RGB first.
/// pdfium renders onto an opaque white background, so nothing is lost.
pub fn encode_page(
    img: &DynamicImage,
    encoding: ImageEncoding,
) -> Result<EncodedImage, image::ImageError> {
    let mut buf = Vec::new();
    match encoding {
        ImageEncoding::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
        }
        ImageEncoding::Png => {
            img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
    }

    debug!(
        "Encoded {}x{} image → {} bytes {:?}",
        img.width(),
        img.height(),
        buf.len(),
        encoding
    );

    Ok(EncodedImage {
        data: buf,
        format: encoding.media_format(),
        width: img.width(),
        height: img.height(),
    })
}
