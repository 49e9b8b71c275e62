//! CLI binary for pdf2pptx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pptx::{
    convert, convert_directory, inspect, BatchReport, CancelToken, ConversionConfig,
    ConversionProgressCallback, ConversionStats, DocumentMetadata, FileStatus, FitPolicy,
    ImageEncoding, Pdf2PptxError, ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: announces each document and drives one
/// progress bar per document.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }

    /// Remove the current bar, if any. Called after a document fails so a
    /// half-filled bar does not keep ticking.
    fn clear(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_document_opened(&self, path: &Path, page_count: usize) {
        self.clear();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        eprintln!("{} {} contains {} pages", cyan("◆"), bold(&name), page_count);
    }

    fn on_conversion_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} slides  \
             ⏱ {elapsed_precise}  ETA {eta_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let bar = ProgressBar::new(total_pages as u64);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.with_bar(|bar| bar.set_message(format!("page {page_num}")));
    }

    fn on_page_complete(&self, _page_num: usize, _total: usize, _image_bytes: usize) {
        self.with_bar(|bar| bar.inc(1));
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        self.with_bar(|bar| {
            bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                red("✗"),
                page_num,
                total,
                red(error),
            ))
        });
        self.clear();
    }

    fn on_conversion_complete(&self, _total_pages: usize, _slide_count: usize) {
        self.clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF in the current directory
  pdf2pptx

  # Convert one file to talk.pptx beside it
  pdf2pptx talk.pdf

  # Explicit output, lower resolution
  pdf2pptx -r 150 talk.pdf slides/talk.pptx

  # Pages 3-4 only (start page is zero-based)
  pdf2pptx --start-page 2 --page-count 2 talk.pdf

  # Lossless images, letterbox pages whose shape differs from page 1
  pdf2pptx --format png --fit contain handout.pdf

  # Page count and page sizes, no conversion
  pdf2pptx --inspect-only talk.pdf

  # Convert a directory and print a JSON report
  pdf2pptx --json --quiet ./lectures > report.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   pdfium shared library, or the directory containing it
  RUST_LOG          Override the log filter (e.g. pdf2pptx=debug)
  PDF2PPTX_*        Default for the flag of the same name

PDFIUM:
  A pdfium build (e.g. from bblanchon/pdfium-binaries) must be loadable.
  It is looked up via PDFIUM_LIB_PATH, then next to the executable, then
  in the working directory, then through the system loader.
"#;

/// Convert PDF files to PowerPoint decks, one page image per slide.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert PDF files to PowerPoint decks, one page image per slide",
    long_about = "Convert PDF documents to PPTX by rendering every page to an image and \
placing it on its own slide. The slide shape follows the first page. With no INPUT, every \
*.pdf in the current directory is converted.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, or a directory whose *.pdf files are all converted.
    #[arg(default_value = ".")]
    input: PathBuf,

    /// Output .pptx (single-file mode only). Default: input with .pptx extension.
    output: Option<PathBuf>,

    /// Rendering resolution in DPI (pixels per 72 PDF points).
    #[arg(short, long, env = "PDF2PPTX_RESOLUTION", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(1..))]
    resolution: u32,

    /// Zero-based index of the first page to convert.
    #[arg(short, long, env = "PDF2PPTX_START_PAGE", default_value_t = 0)]
    start_page: usize,

    /// Number of pages to convert. Default: through the last page.
    #[arg(short = 'n', long, env = "PDF2PPTX_PAGE_COUNT",
          value_parser = clap::value_parser!(u64).range(1..))]
    page_count: Option<u64>,

    /// Embedded image format.
    #[arg(long, env = "PDF2PPTX_FORMAT", value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// JPEG quality (1–100). Ignored for PNG.
    #[arg(long, env = "PDF2PPTX_JPEG_QUALITY", default_value_t = 95,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// How pages whose shape differs from page 1 are fitted to the slide.
    #[arg(long, env = "PDF2PPTX_FIT", value_enum, default_value = "height")]
    fit: FitArg,

    /// Print page count and page sizes only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Print stats, reports and metadata as JSON on stdout.
    #[arg(long, env = "PDF2PPTX_JSON")]
    json: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PPTX_QUIET")]
    quiet: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PPTX_VERBOSE")]
    verbose: bool,

    /// In directory mode, stop at the first file that fails.
    #[arg(long, env = "PDF2PPTX_FAIL_FAST")]
    fail_fast: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Jpeg,
    Png,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FitArg {
    /// Fill the slide height, keep the page's aspect ratio.
    Height,
    /// Fit inside the slide, centred.
    Contain,
    /// Fill the slide exactly, distorting if needed.
    Stretch,
}

impl From<FitArg> for FitPolicy {
    fn from(v: FitArg) -> Self {
        match v {
            FitArg::Height => FitPolicy::FitHeight,
            FitArg::Contain => FitPolicy::Contain,
            FitArg::Stretch => FitPolicy::Stretch,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let batch = cli.input.is_dir();
    if batch && cli.output.is_some() {
        bail!(
            "OUTPUT can only be given for a single input file, but '{}' is a directory",
            cli.input.display()
        );
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let files = if batch {
            pdf2pptx::pipeline::input::discover_pdfs(&cli.input)
                .context("Failed to list PDF files")?
        } else {
            vec![cli.input.clone()]
        };

        let (all, mut failures) = inspect_files(&files).await;
        if !batch {
            if let Some((file, err)) = failures.pop() {
                return Err(err).with_context(|| format!("Failed to inspect {}", file.display()));
            }
        } else {
            for (file, err) in &failures {
                eprintln!(
                    "  {} {}  {}  {}",
                    red("✗"),
                    file.display(),
                    dim(&format!("[{}]", err.kind())),
                    red(err.to_string().lines().next().unwrap_or_default()),
                );
            }
        }

        if cli.json {
            let json = if batch {
                serde_json::to_string_pretty(&all)
            } else {
                serde_json::to_string_pretty(&all[0])
            };
            println!("{}", json.context("Failed to serialize metadata")?);
        } else {
            all.iter().for_each(print_metadata);
        }
        return Ok(if failures.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // ── Build config ─────────────────────────────────────────────────────
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("{}", red("Interrupted, stopping after the current page…"));
                cancel.cancel();
            }
        });
    }

    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(
        &cli,
        progress
            .clone()
            .map(|cb| cb as Arc<dyn ConversionProgressCallback>),
        cancel,
    )?;

    // ── Run conversion ───────────────────────────────────────────────────
    if batch {
        let report = convert_directory(&cli.input, &config, cli.fail_fast)
            .await
            .context("Batch conversion failed")?;
        if let Some(ref cb) = progress {
            cb.clear();
        }
        print_report(&cli, &report)?;

        return Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let result = convert(&cli.input, cli.output.clone(), &config).await;
    if let Some(ref cb) = progress {
        cb.clear();
    }
    let stats = result.with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        print_stats(&stats);
    }

    Ok(ExitCode::SUCCESS)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(
    cli: &Cli,
    progress: Option<ProgressCallback>,
    cancel: CancelToken,
) -> Result<ConversionConfig> {
    let encoding = match cli.format {
        FormatArg::Jpeg => ImageEncoding::Jpeg {
            quality: cli.jpeg_quality,
        },
        FormatArg::Png => ImageEncoding::Png,
    };

    let mut builder = ConversionConfig::builder()
        .resolution(cli.resolution)
        .start_page(cli.start_page)
        .encoding(encoding)
        .fit(cli.fit.into())
        .cancel_token(cancel);

    if let Some(count) = cli.page_count {
        let count = usize::try_from(count).context("Page count is too large")?;
        builder = builder.page_count(count);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_stats(stats: &ConversionStats) {
    let output = stats
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    eprintln!(
        "{}  {} slides  {}ms  →  {}",
        green("✔"),
        stats.converted_pages,
        stats.total_duration_ms,
        bold(&output),
    );
    eprintln!(
        "   {}",
        dim(&format!(
            "{:.2} MB of images, slide {:.2} × {:.2} in",
            stats.image_bytes as f64 / 1_048_576.0,
            stats.slide_width_emu as f64 / pptx_deck::EMU_PER_INCH as f64,
            stats.slide_height_emu as f64 / pptx_deck::EMU_PER_INCH as f64,
        ))
    );
}

fn print_report(cli: &Cli, report: &BatchReport) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialise report")?
        );
        return Ok(());
    }

    if report.files.is_empty() {
        if !cli.quiet {
            eprintln!("No PDF files found in {}", cli.input.display());
        }
        return Ok(());
    }

    for file in &report.files {
        match &file.status {
            FileStatus::Converted { stats } if !cli.quiet => eprintln!(
                "  {} {}  →  {}  {}",
                green("✓"),
                file.input.display(),
                file.output.display(),
                dim(&format!("{} slides", stats.converted_pages)),
            ),
            FileStatus::Converted { .. } => {}
            FileStatus::Failed { kind, message } => eprintln!(
                "  {} {}  {}  {}",
                red("✗"),
                file.input.display(),
                dim(&format!("[{kind}]")),
                red(message.lines().next().unwrap_or_default()),
            ),
        }
    }

    if !cli.quiet {
        let failed = report.failed();
        eprintln!(
            "{} {}/{} files converted{}",
            if failed == 0 { green("✔") } else { cyan("⚠") },
            bold(&report.succeeded().to_string()),
            report.files.len(),
            if report.stopped_early {
                red("  (stopped early)")
            } else {
                String::new()
            },
        );
    }
    Ok(())
}

/// Inspect every file, collecting failures instead of stopping at the first.
async fn inspect_files(
    files: &[PathBuf],
) -> (Vec<DocumentMetadata>, Vec<(PathBuf, Pdf2PptxError)>) {
    let mut found = Vec::with_capacity(files.len());
    let mut failures = Vec::new();
    for file in files {
        match inspect(file).await {
            Ok(meta) => found.push(meta),
            Err(err) => failures.push((file.clone(), err)),
        }
    }
    (found, failures)
}

fn print_metadata(meta: &DocumentMetadata) {
    println!("File:         {}", meta.path.display());
    if let Some(ref t) = meta.info.title {
        println!("Title:        {}", t);
    }
    if let Some(ref a) = meta.info.author {
        println!("Author:       {}", a);
    }
    if let Some(ref s) = meta.info.subject {
        println!("Subject:      {}", s);
    }
    println!("Pages:        {}", meta.page_count);
    if let Some(ref v) = meta.info.pdf_version {
        println!("PDF Version:  {}", v);
    }
    if let Some(ref p) = meta.info.producer {
        println!("Producer:     {}", p);
    }
    if let Some(ref c) = meta.info.creator {
        println!("Creator:      {}", c);
    }
    for (i, size) in meta.page_sizes.iter().enumerate() {
        println!(
            "  Page {:>3}:   {:.1} × {:.1} pt",
            i + 1,
            size.width,
            size.height
        );
    }
}
