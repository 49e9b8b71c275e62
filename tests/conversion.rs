//! Conversion tests against an in-memory page source.
//!
//! These run everywhere: no pdfium library is needed. Each written deck is
//! read back with `pptx_deck::inspect_deck` and its embedded images are
//! decoded to check pixel dimensions.

use image::{DynamicImage, Rgb, RgbImage};
use pdf2pptx::{
    convert_source, CancelToken, ConversionConfig, ConversionProgressCallback, FitPolicy,
    ImageEncoding, PageSize, PageSource, Pdf2PptxError,
};
use pptx_deck::{inspect_deck, DeckSummary};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Pages of fixed sizes; each renders to a solid colour image of
/// `round(points * zoom)` pixels.
struct FakeSource {
    pages: Vec<PageSize>,
    fail_on: Option<usize>,
}

impl FakeSource {
    fn uniform(n: usize, width: f32, height: f32) -> Self {
        Self {
            pages: vec![PageSize::new(width, height); n],
            fail_on: None,
        }
    }

    /// Page `i` is `(100 + 10 i) × 80` points, so every page has a distinct
    /// rendered width.
    fn distinct(n: usize) -> Self {
        Self {
            pages: (0..n)
                .map(|i| PageSize::new(100.0 + 10.0 * i as f32, 80.0))
                .collect(),
            fail_on: None,
        }
    }
}

impl PageSource for FakeSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        Ok(self.pages[index])
    }

    fn render_page(&self, index: usize, zoom: f32) -> Result<DynamicImage, Pdf2PptxError> {
        if self.fail_on == Some(index) {
            return Err(Pdf2PptxError::RasterisationFailed {
                page: index + 1,
                detail: "injected failure".into(),
            });
        }
        let size = self.pages[index];
        let w = (size.width * zoom).round() as u32;
        let h = (size.height * zoom).round() as u32;
        let shade = (index * 40 % 256) as u8;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            w,
            h,
            Rgb([shade, 128, 255 - shade]),
        )))
    }
}

fn config(resolution: u32) -> ConversionConfig {
    ConversionConfig::builder()
        .resolution(resolution)
        .build()
        .unwrap()
}

fn run(source: &FakeSource, out: &Path, config: &ConversionConfig) -> DeckSummary {
    convert_source(source, Path::new("fake.pdf"), out, config).expect("conversion should succeed");
    inspect_deck(out).expect("deck should read back")
}

/// Pixel dimensions of every slide's picture, in slide order.
fn image_dims(summary: &DeckSummary) -> Vec<(u32, u32)> {
    summary
        .slides
        .iter()
        .map(|s| {
            assert_eq!(s.pictures.len(), 1, "{} should hold one picture", s.part_name);
            let img = image::load_from_memory(&s.pictures[0].media).expect("decodable media");
            (img.width(), img.height())
        })
        .collect()
}

fn scratch() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("deck.pptx");
    (dir, out)
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, e: String) {
        self.events.lock().unwrap().push(e);
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversionProgressCallback for Recorder {
    fn on_document_opened(&self, _path: &Path, page_count: usize) {
        self.push(format!("opened {page_count}"));
    }
    fn on_conversion_start(&self, total_pages: usize) {
        self.push(format!("start {total_pages}"));
    }
    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.push(format!("page {page_num}"));
    }
    fn on_page_complete(&self, page_num: usize, _total: usize, _bytes: usize) {
        self.push(format!("done {page_num}"));
    }
    fn on_page_error(&self, page_num: usize, _total: usize, _error: &str) {
        self.push(format!("error {page_num}"));
    }
    fn on_conversion_complete(&self, _total: usize, slides: usize) {
        self.push(format!("complete {slides}"));
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn letter_landscape_three_pages_at_150_dpi() {
    let (_dir, out) = scratch();
    let source = FakeSource::uniform(3, 792.0, 612.0);
    let summary = run(&source, &out, &config(150));

    assert_eq!(summary.slide_count(), 3);
    assert_eq!(summary.slide_height, 6_858_000);
    assert!((summary.aspect_ratio() - 792.0 / 612.0).abs() < 1e-6);
    for dims in image_dims(&summary) {
        assert_eq!(dims, (1650, 1275));
    }
    for slide in &summary.slides {
        let pic = &slide.pictures[0];
        assert_eq!((pic.x, pic.y), (0, 0));
        assert_eq!(pic.cy, summary.slide_height);
        assert!((pic.cx - summary.slide_width).abs() <= 1);
    }
}

#[test]
fn start_and_count_select_a_window() {
    let (_dir, out) = scratch();
    let source = FakeSource::distinct(5);
    let config = ConversionConfig::builder()
        .resolution(72)
        .start_page(2)
        .page_count(2)
        .build()
        .unwrap();
    let summary = run(&source, &out, &config);

    assert_eq!(summary.slide_count(), 2);
    // Slide i holds page start + i.
    assert_eq!(image_dims(&summary), vec![(120, 80), (130, 80)]);
}

#[test]
fn start_without_count_runs_to_the_end() {
    let (_dir, out) = scratch();
    let source = FakeSource::distinct(5);
    let config = ConversionConfig::builder()
        .resolution(72)
        .start_page(3)
        .build()
        .unwrap();
    let summary = run(&source, &out, &config);
    assert_eq!(image_dims(&summary), vec![(130, 80), (140, 80)]);
}

#[test]
fn deck_shape_follows_page_zero_even_when_not_converted() {
    let (_dir, out) = scratch();
    let source = FakeSource {
        pages: vec![PageSize::new(612.0, 792.0), PageSize::new(792.0, 612.0)],
        fail_on: None,
    };
    let config = ConversionConfig::builder()
        .resolution(72)
        .start_page(1)
        .build()
        .unwrap();
    let summary = run(&source, &out, &config);

    assert!((summary.aspect_ratio() - 612.0 / 792.0).abs() < 1e-6);
    // Default fit keeps the height, so the landscape page overflows.
    let pic = &summary.slides[0].pictures[0];
    assert_eq!(pic.cy, summary.slide_height);
    assert!(pic.cx > summary.slide_width);
}

#[test]
fn contain_fit_centres_mismatched_pages() {
    let (_dir, out) = scratch();
    let source = FakeSource {
        pages: vec![PageSize::new(800.0, 600.0), PageSize::new(600.0, 800.0)],
        fail_on: None,
    };
    let config = ConversionConfig::builder()
        .resolution(72)
        .fit(FitPolicy::Contain)
        .build()
        .unwrap();
    let summary = run(&source, &out, &config);

    let portrait = &summary.slides[1].pictures[0];
    assert_eq!(portrait.cy, summary.slide_height);
    assert!(portrait.x > 0);
    assert_eq!(portrait.x * 2 + portrait.cx, summary.slide_width);
}

#[test]
fn png_encoding_embeds_png_media() {
    let (_dir, out) = scratch();
    let config = ConversionConfig::builder()
        .resolution(36)
        .encoding(ImageEncoding::Png)
        .build()
        .unwrap();
    let summary = run(&FakeSource::uniform(2, 612.0, 792.0), &out, &config);
    for slide in &summary.slides {
        assert!(slide.pictures[0].media_path.ends_with(".png"));
        assert_eq!(&slide.pictures[0].media[..4], b"\x89PNG");
    }
}

// ── Range errors ─────────────────────────────────────────────────────────────

#[test]
fn start_past_end_fails_without_output() {
    let (_dir, out) = scratch();
    let config = ConversionConfig::builder()
        .resolution(72)
        .start_page(10)
        .build()
        .unwrap();
    let err = convert_source(
        &FakeSource::uniform(3, 612.0, 792.0),
        Path::new("fake.pdf"),
        &out,
        &config,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Pdf2PptxError::PageOutOfRange {
            start: 10,
            total: 3,
            ..
        }
    ));
    assert!(!out.exists());
}

#[test]
fn overflowing_count_fails_without_output() {
    let (_dir, out) = scratch();
    let config = ConversionConfig::builder()
        .resolution(72)
        .start_page(3)
        .page_count(3)
        .build()
        .unwrap();
    let err = convert_source(&FakeSource::distinct(5), Path::new("fake.pdf"), &out, &config)
        .unwrap_err();
    assert_eq!(err.kind(), "range");
    assert!(!out.exists());
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn pixel_size_scales_with_resolution() {
    let source = FakeSource::uniform(1, 612.0, 792.0);
    let (_d1, out1) = scratch();
    let (_d2, out2) = scratch();

    let low = image_dims(&run(&source, &out1, &config(72)))[0];
    let high = image_dims(&run(&source, &out2, &config(144)))[0];

    assert_eq!(low, (612, 792));
    assert_eq!(high, (low.0 * 2, low.1 * 2));
}

#[test]
fn repeated_conversion_is_stable() {
    let (_dir, out) = scratch();
    let source = FakeSource::distinct(4);
    let first = run(&source, &out, &config(96));
    let second = run(&source, &out, &config(96));

    assert_eq!(first.slide_count(), second.slide_count());
    assert_eq!(image_dims(&first), image_dims(&second));
    assert_eq!(first.slide_width, second.slide_width);
}

#[test]
fn aspect_ratio_matches_odd_page_sizes() {
    for (w, h) in [(595.28, 841.89), (1000.0, 150.0), (100.0, 700.0), (333.3, 333.3)] {
        let (_dir, out) = scratch();
        let summary = run(&FakeSource::uniform(1, w, h), &out, &config(10));
        let expected = w as f64 / h as f64;
        assert!(
            (summary.aspect_ratio() - expected).abs() / expected < 1e-6,
            "{w}x{h}: got {}",
            summary.aspect_ratio()
        );
    }
}

// ── Failure, cancellation, progress ──────────────────────────────────────────

#[test]
fn page_failure_leaves_previous_output_untouched() {
    let (_dir, out) = scratch();
    std::fs::write(&out, b"previous deck").unwrap();

    let source = FakeSource {
        fail_on: Some(1),
        ..FakeSource::uniform(3, 612.0, 792.0)
    };
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .resolution(36)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let err = convert_source(&source, Path::new("fake.pdf"), &out, &config).unwrap_err();
    assert!(matches!(err, Pdf2PptxError::RasterisationFailed { page: 2, .. }));
    assert_eq!(std::fs::read(&out).unwrap(), b"previous deck");
    assert_eq!(recorder.events().last().map(String::as_str), Some("error 2"));
}

/// Cancels the shared token as soon as the first page completes.
struct CancelAfterFirst(CancelToken);

impl ConversionProgressCallback for CancelAfterFirst {
    fn on_page_complete(&self, _page_num: usize, _total: usize, _bytes: usize) {
        self.0.cancel();
    }
}

#[test]
fn cancellation_between_pages_writes_nothing() {
    let (_dir, out) = scratch();
    let token = CancelToken::new();
    let config = ConversionConfig::builder()
        .resolution(36)
        .cancel_token(token.clone())
        .progress_callback(Arc::new(CancelAfterFirst(token)))
        .build()
        .unwrap();

    let err = convert_source(
        &FakeSource::uniform(4, 612.0, 792.0),
        Path::new("fake.pdf"),
        &out,
        &config,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Pdf2PptxError::Cancelled {
            completed: 1,
            total: 4
        }
    ));
    assert!(!out.exists());
}

#[test]
fn progress_events_arrive_in_page_order() {
    let (_dir, out) = scratch();
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .resolution(36)
        .start_page(1)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    let stats = convert_source(&FakeSource::distinct(3), Path::new("fake.pdf"), &out, &config)
        .unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "opened 3",
            "start 2",
            "page 2",
            "done 2",
            "page 3",
            "done 3",
            "complete 2"
        ]
    );
    assert_eq!(stats.converted_pages, 2);
    assert_eq!(stats.total_pages, 3);
    assert_eq!(stats.output.as_deref(), Some(out.as_path()));
    assert!(stats.image_bytes > 0);
}

#[test]
fn range_error_reports_opened_document_first() {
    let (_dir, out) = scratch();
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .start_page(5)
        .progress_callback(recorder.clone())
        .build()
        .unwrap();

    assert!(convert_source(&FakeSource::distinct(2), Path::new("fake.pdf"), &out, &config).is_err());
    assert_eq!(recorder.events(), vec!["opened 2"]);
}
