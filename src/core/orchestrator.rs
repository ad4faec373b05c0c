//! Download orchestration: plan, probe, transfer, locate

use crate::core::{DownloadRequest, MediaMode, Progress, ProgressCallback, Selection};
use crate::error::DownloadError;
use crate::extractor::{Extractor, PostProcessor, TransferPlan};
use crate::utils::mime::is_media_extension;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Default working directory, relative to the process working directory
pub const DEFAULT_WORK_DIR: &str = "downloads";

/// Title used when the probe reports none
const FALLBACK_TITLE: &str = "video";

/// A finished download waiting to be handed to the user
#[derive(Debug)]
pub struct DownloadResult {
    pub local_file_path: PathBuf,
    pub display_title: String,
    pub mode: MediaMode,
    /// Per-request directory; removed when the result is dropped
    workspace: TempDir,
}

impl DownloadResult {
    /// Directory the transfer wrote into
    pub fn workspace(&self) -> &Path {
        self.workspace.path()
    }
}

/// Build the extractor options for a selection, writing into `dir`
pub fn build_plan(selection: &Selection, dir: &Path) -> TransferPlan {
    let output_template = TransferPlan::output_template_in(dir);
    match selection {
        Selection::Audio(bitrate) => TransferPlan {
            format: selection.format_expression(),
            output_template,
            merge_output_format: None,
            post_processor: Some(PostProcessor::ExtractAudio {
                codec: "mp3".to_string(),
                quality_kbps: bitrate.kbps(),
            }),
        },
        Selection::Video(_) => TransferPlan {
            format: selection.format_expression(),
            output_template,
            merge_output_format: Some("mp4".to_string()),
            post_processor: None,
        },
    }
}

/// Runs one download request through the extractor
pub struct Orchestrator {
    extractor: Arc<dyn Extractor>,
    work_dir: PathBuf,
    progress: Option<ProgressCallback>,
}

impl Orchestrator {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            progress: None,
        }
    }

    /// Set working directory
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Set progress callback
    pub fn with_progress(mut self, callback: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn extractor(&self) -> &dyn Extractor {
        self.extractor.as_ref()
    }

    /// Download the request into a fresh per-request directory.
    ///
    /// On failure the directory and anything partially written to it are
    /// removed.
    #[instrument(skip(self, request), fields(url = %request.url, mode = %request.mode()))]
    pub async fn download(&self, request: &DownloadRequest) -> Result<DownloadResult, DownloadError> {
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|source| DownloadError::WorkDir {
                path: self.work_dir.clone(),
                source,
            })?;
        let workspace = tempfile::Builder::new()
            .prefix("uvd-")
            .tempdir_in(&self.work_dir)
            .map_err(|source| DownloadError::WorkDir {
                path: self.work_dir.clone(),
                source,
            })?;

        let mode = request.mode();
        let plan = build_plan(&request.selection, workspace.path());
        debug!(format = %plan.format, template = %plan.output_template, "Transfer plan ready");

        let probe = self.extractor.probe(&request.url, Some(&plan)).await?;
        let display_title = probe.title.clone().unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let expected = probe.predicted_filename().map(|path| match mode {
            MediaMode::Audio => path.with_extension("mp3"),
            MediaMode::Video => path,
        });

        let realized = self
            .extractor
            .transfer(&request.url, &plan, self.progress.clone())
            .await?;

        let local_file_path = if let Some(path) = realized {
            path
        } else if let Some(path) = expected.filter(|p| p.exists()) {
            path
        } else {
            warn!("Extractor did not report the output path; scanning request directory");
            find_output(workspace.path(), mode)
                .ok_or_else(|| DownloadError::MissingOutput(workspace.path().to_path_buf()))?
        };

        info!(path = %local_file_path.display(), title = %display_title, "Download finished");
        Ok(DownloadResult {
            local_file_path,
            display_title,
            mode,
            workspace,
        })
    }
}

/// Find the produced media file in a request directory, preferring the mode's extension
fn find_output(dir: &Path, mode: MediaMode) -> Option<PathBuf> {
    let wanted = crate::utils::mime::artifact_extension(mode);
    let candidates: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(is_media_extension)
        })
        .collect();

    candidates
        .iter()
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some(wanted))
        .or_else(|| candidates.first())
        .cloned()
}
