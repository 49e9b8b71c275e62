//! PDF rasterisation: open a document and render pages to `DynamicImage`.
//!
//! The converter only talks to [`PageSource`]. [`PdfiumSource`] is the real
//! implementation; tests substitute an in-memory source so deck assembly can
//! be exercised without a pdfium library on the machine.
//!
//! Everything here is blocking. Async callers reach it through
//! `tokio::task::spawn_blocking` in [`crate::convert`].

use crate::error::Pdf2PptxError;
use crate::output::{DocumentInfo, PageSize};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// A paginated document that can report page sizes and rasterise pages.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Size of page `index` (zero-based) in PDF points.
    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError>;

    /// Render page `index` with each PDF point mapped to `zoom` pixels.
    fn render_page(&self, index: usize, zoom: f32) -> Result<DynamicImage, Pdf2PptxError>;

    /// Information dictionary and version, when the backend exposes them.
    fn document_info(&self) -> DocumentInfo {
        DocumentInfo::default()
    }
}

/// A PDF opened through pdfium.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    /// Open `path` with an already bound pdfium instance.
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> Result<Self, Pdf2PptxError> {
        let document =
            pdfium
                .load_pdf_from_file(path, None)
                .map_err(|e| Pdf2PptxError::UnreadableDocument {
                    path: path.to_path_buf(),
                    detail: format!("{:?}", e),
                })?;

        info!(
            "PDF loaded: {} ({} pages)",
            path.display(),
            document.pages().len()
        );

        Ok(Self { document })
    }

    fn page(&self, index: usize) -> Result<PdfPage<'_>, Pdf2PptxError> {
        let page_index =
            PdfPageIndex::try_from(index).map_err(|_| Pdf2PptxError::PageOutOfRange {
                start: index,
                count: None,
                total: self.page_count(),
            })?;

        self.document
            .pages()
            .get(page_index)
            .map_err(|e| Pdf2PptxError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        let page = self.page(index)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn render_page(&self, index: usize, zoom: f32) -> Result<DynamicImage, Pdf2PptxError> {
        let page = self.page(index)?;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(zoom);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2PptxError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );

        Ok(image)
    }

    fn document_info(&self) -> DocumentInfo {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().trim().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentInfo {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            pdf_version: Some(format!("{:?}", self.document.version())),
        }
    }
}

/// Sizes of every page, in document order.
pub fn page_sizes<S: PageSource + ?Sized>(source: &S) -> Result<Vec<PageSize>, Pdf2PptxError> {
    (0..source.page_count())
        .map(|i| source.page_size(i))
        .collect()
}
