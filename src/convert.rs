//! Conversion entry points.
//!
//! The core ([`build_deck`], [`convert_source`]) is synchronous and generic
//! over [`PageSource`], so it runs the same against pdfium and against an
//! in-memory source in tests. [`convert_sync`] binds pdfium and drives the
//! core on the calling thread; [`convert`] does the same on a
//! `spawn_blocking` thread for async callers.
//!
//! A conversion either writes a complete deck or writes nothing: the deck is
//! assembled in memory, serialised to a temporary file next to the
//! destination and renamed into place only once fully written.

use crate::config::ConversionConfig;
use crate::engine::bind_pdfium;
use crate::error::Pdf2PptxError;
use crate::output::{ConversionStats, DocumentMetadata};
use crate::pipeline::geometry::DeckGeometry;
use crate::pipeline::render::{self, PageSource, PdfiumSource};
use crate::pipeline::{encode, input};
use pdfium_render::prelude::Pdfium;
use pptx_deck::SlideDeck;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF file to a PPTX deck.
///
/// This is the primary async entry point for the library. The blocking
/// pdfium work runs on tokio's blocking pool.
///
/// # Arguments
/// * `input` : path to a local PDF
/// * `output`: destination deck; `None` writes `<input stem>.pptx` next to
///   the input
/// * `config`: conversion configuration
///
/// # Errors
/// Every failure is fatal for this document and leaves no output file.
pub async fn convert(
    input: impl AsRef<Path>,
    output: Option<PathBuf>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let input = input.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_sync(&input, output.as_deref(), &config))
        .await
        .map_err(|e| Pdf2PptxError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Synchronous counterpart of [`convert`]. Binds pdfium for the duration of
/// the call.
pub fn convert_sync(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    config.validate()?;
    let input = input::resolve_input(input.as_ref())?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input::derive_output_path(&input));

    let pdfium = bind_pdfium()?;
    convert_document(&pdfium, &input, &output, config)
}

/// Convert one PDF with an already bound pdfium instance.
///
/// The batch driver binds pdfium once and calls this for every file.
pub fn convert_document(
    pdfium: &Pdfium,
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let source = PdfiumSource::open(pdfium, input)?;
    convert_source(&source, input, output, config)
}

/// Build a deck from `source` and write it atomically to `output`.
///
/// `input` is only used for events, logs and the returned stats.
pub fn convert_source<S: PageSource + ?Sized>(
    source: &S,
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let total_start = Instant::now();
    info!("Starting conversion: {} → {}", input.display(), output.display());

    let (deck, mut stats) = build_deck(source, input, config)?;
    write_deck(&deck, output)?;

    stats.output = Some(output.to_path_buf());
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {} slides, {} KiB of images, {}ms total",
        stats.converted_pages,
        stats.image_bytes / 1024,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(stats.total_pages, deck.slide_count());
    }

    Ok(stats)
}

/// Rasterise the selected pages of `source` into an in-memory deck.
///
/// Nothing touches the file system here. The page range is validated
/// against the document before the first page is rendered.
pub fn build_deck<S: PageSource + ?Sized>(
    source: &S,
    input: &Path,
    config: &ConversionConfig,
) -> Result<(SlideDeck, ConversionStats), Pdf2PptxError> {
    let build_start = Instant::now();
    config.validate()?;

    // ── Step 1: Open & count ─────────────────────────────────────────────
    let total_pages = source.page_count();
    info!("PDF has {} pages", total_pages);
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_opened(input, total_pages);
    }
    if total_pages == 0 {
        return Err(unreadable(input, "document has no pages"));
    }

    // ── Step 2: Resolve page range ───────────────────────────────────────
    let range = config.pages.resolve(total_pages)?;
    let selected = range.len();
    debug!("Selected pages {}..{} of {}", range.start, range.end, total_pages);

    // ── Step 3: Deck geometry from page 0 ────────────────────────────────
    let first_page = source.page_size(0)?;
    let geometry = DeckGeometry::from_first_page(first_page, config.slide_height_emu)
        .ok_or_else(|| {
            unreadable(
                input,
                &format!(
                    "page 1 has degenerate size {}x{} pt",
                    first_page.width, first_page.height
                ),
            )
        })?;
    let mut deck = SlideDeck::with_size(geometry.width_emu, geometry.height_emu)
        .map_err(|e| unreadable(input, &format!("page 1 cannot define a slide: {e}")))?;
    debug!(
        "Slide size {}x{} EMU (aspect {:.4})",
        geometry.width_emu,
        geometry.height_emu,
        geometry.aspect_ratio()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(selected);
    }

    // ── Step 4: One slide per page ───────────────────────────────────────
    let zoom = config.zoom();
    let mut render_ms = 0u64;

    for (completed, index) in range.clone().enumerate() {
        if config.is_cancelled() {
            warn!("Conversion cancelled after {}/{} pages", completed, selected);
            return Err(Pdf2PptxError::Cancelled {
                completed,
                total: selected,
            });
        }

        let page_num = index + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, total_pages);
        }

        let render_start = Instant::now();
        let encoded = source.render_page(index, zoom).and_then(|img| {
            encode::encode_page(&img, config.encoding)
                .map_err(|source| Pdf2PptxError::EncodingFailed { page: page_num, source })
        });
        render_ms += render_start.elapsed().as_millis() as u64;

        let encoded = match encoded {
            Ok(encoded) => encoded,
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, total_pages, &e.to_string());
                }
                return Err(e);
            }
        };

        let placement = geometry.place_picture(config.fit, encoded.width, encoded.height);
        let embedded = encoded.data.len();

        deck.add_blank_slide()
            .add_picture(encoded.data, encoded.format, placement)
            .set_description(format!("Page {page_num}"));

        debug!(
            "Page {} → slide {} ({}x{} px, {} bytes)",
            page_num,
            deck.slide_count(),
            encoded.width,
            encoded.height,
            embedded
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total_pages, embedded);
        }
    }

    let stats = ConversionStats {
        source: input.to_path_buf(),
        output: None,
        total_pages,
        converted_pages: deck.slide_count(),
        start_page: range.start,
        slide_width_emu: deck.slide_width(),
        slide_height_emu: deck.slide_height(),
        image_bytes: deck.media_bytes(),
        render_duration_ms: render_ms,
        total_duration_ms: build_start.elapsed().as_millis() as u64,
    };

    Ok((deck, stats))
}

/// Write `deck` to `output`, replacing any existing file.
///
/// Atomic write: serialise to a temp file in the destination directory,
/// then rename. On any error the temp file is removed when dropped.
pub fn write_deck(deck: &SlideDeck, output: &Path) -> Result<(), Pdf2PptxError> {
    let write_failed = |detail: String| Pdf2PptxError::OutputWriteFailed {
        path: output.to_path_buf(),
        detail,
    };

    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".pdf2pptx-").suffix(".pptx.tmp");
    // New decks get the umask default rather than tempfile's 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(parent)
        .map_err(|e| write_failed(e.to_string()))?;

    let mut writer = deck
        .write_to(BufWriter::new(tmp.as_file_mut()))
        .map_err(|e| write_failed(e.to_string()))?;
    writer.flush().map_err(|e| write_failed(e.to_string()))?;
    drop(writer);

    // An overwritten deck keeps its mode.
    if let Ok(existing) = std::fs::metadata(output) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| write_failed(e.to_string()))?;
    }

    tmp.persist(output)
        .map_err(|e| write_failed(e.error.to_string()))?;

    debug!("Wrote {}", output.display());
    Ok(())
}

/// Extract PDF metadata and page sizes without rendering anything.
pub async fn inspect(input: impl AsRef<Path>) -> Result<DocumentMetadata, Pdf2PptxError> {
    let input = input.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || inspect_sync(&input))
        .await
        .map_err(|e| Pdf2PptxError::Internal(format!("Metadata task panicked: {}", e)))?
}

/// Synchronous counterpart of [`inspect`].
pub fn inspect_sync(input: impl AsRef<Path>) -> Result<DocumentMetadata, Pdf2PptxError> {
    let input = input::resolve_input(input.as_ref())?;
    let pdfium = bind_pdfium()?;
    let source = PdfiumSource::open(&pdfium, &input)?;
    describe_source(&source, &input)
}

/// Metadata for an already opened source.
pub fn describe_source<S: PageSource + ?Sized>(
    source: &S,
    input: &Path,
) -> Result<DocumentMetadata, Pdf2PptxError> {
    let page_sizes = render::page_sizes(source)?;
    Ok(DocumentMetadata {
        path: input.to_path_buf(),
        page_count: page_sizes.len(),
        page_sizes,
        info: source.document_info(),
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn unreadable(path: &Path, detail: &str) -> Pdf2PptxError {
    Pdf2PptxError::UnreadableDocument {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}
