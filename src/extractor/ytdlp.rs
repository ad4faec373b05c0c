//! yt-dlp process backend

use crate::core::{ProgressCallback, ProgressTracker, Stage};
use crate::error::ExtractorError;
use crate::extractor::{Extractor, PostProcessor, ProbeInfo, TransferPlan};
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, trace, warn};

/// Prefix of download progress lines; yt-dlp strips the `download:` selector
const PROGRESS_MARKER: &str = "uvd-progress:";
/// Prefix of post-processor status lines
const POSTPROCESS_MARKER: &str = "uvd-postprocess:";
/// Prefix of the final output path line
const FILEPATH_MARKER: &str = "uvd-filepath:";

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid ANSI escape regex"));

/// Extractor that shells out to the `yt-dlp` binary
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlp {
    /// Use `yt-dlp` from `PATH`
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
        }
    }

    /// Set the yt-dlp executable
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set where yt-dlp looks for ffmpeg
    pub fn with_ffmpeg_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.ffmpeg_location = Some(location.into());
        self
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--no-playlist").arg("--no-warnings");
        if let Some(location) = &self.ffmpeg_location {
            cmd.arg("--ffmpeg-location").arg(location);
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate a transfer plan into yt-dlp arguments
pub fn plan_args(plan: &TransferPlan) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        plan.format.clone(),
        "-o".to_string(),
        plan.output_template.clone(),
    ];
    if let Some(container) = &plan.merge_output_format {
        args.push("--merge-output-format".to_string());
        args.push(container.clone());
    }
    match &plan.post_processor {
        Some(PostProcessor::ExtractAudio { codec, quality_kbps }) => {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push(codec.clone());
            args.push("--audio-quality".to_string());
            args.push(format!("{}K", quality_kbps));
        }
        None => {}
    }
    args
}

#[async_trait]
impl Extractor for YtDlp {
    #[instrument(skip(self, plan))]
    async fn probe(&self, url: &str, plan: Option<&TransferPlan>) -> Result<ProbeInfo, ExtractorError> {
        info!(event = "probe_start", url = %url, planned = plan.is_some());
        let mut cmd = self.base_command();
        cmd.arg("--dump-single-json");
        if let Some(plan) = plan {
            cmd.args(plan_args(plan));
        }
        cmd.arg("--").arg(url);

        let output = cmd.output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(event = "probe_failed", status = %output.status, stderr = %stderr);
            return Err(ExtractorError::Failed {
                status: output.status,
                stderr,
            });
        }

        let info: ProbeInfo = serde_json::from_slice(&output.stdout)?;
        info!(
            event = "probe_success",
            format_count = info.formats.as_ref().map_or(0, Vec::len)
        );
        Ok(info)
    }

    #[instrument(skip(self, plan, progress))]
    async fn transfer(
        &self,
        url: &str,
        plan: &TransferPlan,
        progress: Option<ProgressCallback>,
    ) -> Result<Option<PathBuf>, ExtractorError> {
        info!(event = "transfer_start", url = %url, format = %plan.format);
        let mut cmd = self.base_command();
        cmd.args(plan_args(plan))
            .arg("--newline")
            .arg("--progress")
            .arg("--progress-template")
            .arg(format!("download:{}%(progress._percent_str)s", PROGRESS_MARKER))
            .arg("--progress-template")
            .arg(format!("postprocess:{}%(progress.postprocessor)s", POSTPROCESS_MARKER))
            .arg("--print")
            .arg(format!("after_move:{}%(filepath)s", FILEPATH_MARKER))
            .arg("--")
            .arg(url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExtractorError::MissingOutput("stdout".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExtractorError::MissingOutput("stderr".into()))?;

        // Both streams feed one channel so a single tracker sees every line.
        let (tx, mut rx) = mpsc::unbounded_channel::<(bool, String)>();
        let stdout_task = tokio::spawn(forward_lines(stdout, true, tx.clone()));
        let stderr_task = tokio::spawn(forward_lines(stderr, false, tx));

        let mut tracker = ProgressTracker::new();
        let mut realized: Option<PathBuf> = None;
        let mut stderr_text = String::new();
        while let Some((from_stdout, line)) = rx.recv().await {
            trace!(event = "yt_dlp_line", stdout = from_stdout, line = %line);
            let update = if let Some(percent) = parse_progress_line(&line) {
                tracker.observe_percent(percent)
            } else if is_post_processing_line(&line) {
                tracker.advance(Stage::PostProcessing)
            } else if let Some(path) = parse_filepath_line(&line) {
                realized = Some(path);
                None
            } else {
                if !from_stdout {
                    stderr_text.push_str(&line);
                    stderr_text.push('\n');
                }
                None
            };
            if let (Some(update), Some(callback)) = (update, progress.as_ref()) {
                callback(update);
            }
        }

        let _ = stdout_task.await;
        let _ = stderr_task.await;
        let status = child.wait().await?;

        if !status.success() {
            let stderr = stderr_text.trim().to_string();
            error!(event = "transfer_failed", status = %status, stderr = %stderr);
            return Err(ExtractorError::Failed { status, stderr });
        }

        if let (Some(done), Some(callback)) = (tracker.advance(Stage::Finished), progress.as_ref()) {
            callback(done);
        }
        debug!(event = "transfer_complete", path = ?realized);
        Ok(realized)
    }
}

/// Send every line of `reader` to `tx` until EOF
///
/// Lines are decoded lossily so a stray non-UTF-8 byte never stops the pipe
/// from being drained.
async fn forward_lines<R>(reader: R, from_stdout: bool, tx: mpsc::UnboundedSender<(bool, String)>)
where
    R: AsyncRead + Unpin,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(bytes)) => {
                let line = String::from_utf8_lossy(&bytes).trim_end_matches('\r').to_string();
                let _ = tx.send((from_stdout, line));
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, stdout = from_stdout, "Failed reading yt-dlp output");
                break;
            }
        }
    }
}

/// Parse an `uvd-progress:<percent>` line produced by the progress template
pub fn parse_progress_line(line: &str) -> Option<f64> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?;
    let plain = strip_ansi(rest);
    plain.trim().trim_end_matches('%').trim().parse::<f64>().ok()
}

/// Drop terminal color sequences
fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Lines printed by the post-processing template while merging or transcoding
pub fn is_post_processing_line(line: &str) -> bool {
    line.trim_start().starts_with(POSTPROCESS_MARKER)
}

/// The output path printed after yt-dlp moved the file into place
pub fn parse_filepath_line(line: &str) -> Option<PathBuf> {
    let path = line.trim().strip_prefix(FILEPATH_MARKER)?.trim();
    if path.is_empty() {
        return None;
    }
    Some(PathBuf::from(path))
}
