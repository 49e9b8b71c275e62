//! Batch conversion of many PDFs, one deck per file.
//!
//! Batches are best-effort: a failing file is recorded in the
//! [`BatchReport`] and the next file is still converted. `fail_fast` stops at
//! the first failure instead. A cancellation always stops the batch.

use crate::config::ConversionConfig;
use crate::convert::convert_document;
use crate::engine::bind_pdfium;
use crate::error::Pdf2PptxError;
use crate::output::ConversionStats;
use crate::pipeline::input;
use pdfium_render::prelude::Pdfium;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of one file in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Converted { stats: ConversionStats },
    Failed { kind: String, message: String },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, FileStatus::Converted { .. })
    }
}

/// Per-file outcomes in the order the files were attempted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
    /// `true` when the batch ended before every file was attempted.
    pub stopped_early: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    /// `true` when every attempted file converted and none was skipped.
    pub fn is_success(&self) -> bool {
        !self.stopped_early && self.failed() == 0
    }
}

/// Convert every PDF directly inside `dir` to a sibling `.pptx`.
///
/// Fails as a whole only when `dir` cannot be listed; per-file failures land
/// in the report.
pub async fn convert_directory(
    dir: impl AsRef<Path>,
    config: &ConversionConfig,
    fail_fast: bool,
) -> Result<BatchReport, Pdf2PptxError> {
    config.validate()?;
    let paths = input::discover_pdfs(dir.as_ref())?;
    info!(
        "Found {} PDF file(s) in {}",
        paths.len(),
        dir.as_ref().display()
    );

    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_paths(&paths, &config, fail_fast))
        .await
        .map_err(|e| Pdf2PptxError::Internal(format!("Batch task panicked: {}", e)))
}

/// Convert each path to `<stem>.pptx` beside it, binding pdfium once for the
/// whole batch.
pub fn convert_paths(paths: &[PathBuf], config: &ConversionConfig, fail_fast: bool) -> BatchReport {
    // Bound on first use so a batch of unreadable files never needs pdfium.
    let mut engine: Option<Result<Pdfium, String>> = None;

    convert_paths_with(paths, config, fail_fast, |input, output| {
        let pdfium = engine
            .get_or_insert_with(|| bind_pdfium().map_err(binding_detail))
            .as_ref()
            .map_err(|msg| Pdf2PptxError::PdfiumBindingFailed(msg.clone()))?;
        convert_document(pdfium, input, output, config)
    })
}

/// The cached binding failure is re-wrapped for every file, so keep only the
/// inner detail.
fn binding_detail(err: Pdf2PptxError) -> String {
    match err {
        Pdf2PptxError::PdfiumBindingFailed(detail) => detail,
        other => other.to_string(),
    }
}

/// Batch driver with the per-file conversion supplied by the caller.
///
/// Each input is validated (exists, readable, `%PDF` header) before
/// `convert_one` sees it.
pub fn convert_paths_with<F>(
    paths: &[PathBuf],
    config: &ConversionConfig,
    fail_fast: bool,
    mut convert_one: F,
) -> BatchReport
where
    F: FnMut(&Path, &Path) -> Result<ConversionStats, Pdf2PptxError>,
{
    let mut report = BatchReport::default();

    for (i, path) in paths.iter().enumerate() {
        let output = input::derive_output_path(path);

        if config.is_cancelled() {
            report.stopped_early = true;
            break;
        }

        let result = input::resolve_input(path).and_then(|input| convert_one(&input, &output));

        let stop = match result {
            Ok(stats) => {
                report.files.push(FileOutcome {
                    input: path.clone(),
                    output,
                    status: FileStatus::Converted { stats },
                });
                false
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                let cancelled = matches!(e, Pdf2PptxError::Cancelled { .. });
                report.files.push(FileOutcome {
                    input: path.clone(),
                    output,
                    status: FileStatus::Failed {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    },
                });
                fail_fast || cancelled
            }
        };

        if stop {
            report.stopped_early = i + 1 < paths.len();
            break;
        }
    }

    info!(
        "Batch finished: {} converted, {} failed",
        report.succeeded(),
        report.failed()
    );
    report
}
