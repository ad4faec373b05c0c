//! The extraction collaborator: metadata probes and configured transfers

pub mod ytdlp;

#[cfg(test)]
pub(crate) mod fake;

pub use ytdlp::*;

use crate::core::{Format, ProgressCallback};
use crate::error::ExtractorError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw metadata reported by a probe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Seconds; yt-dlp reports fractional durations for some sites
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub formats: Option<Vec<Format>>,
    /// Output filename the extractor would write, when probed with a plan
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "_filename")]
    pub legacy_filename: Option<String>,
}

impl ProbeInfo {
    /// Output filename predicted by the probe
    pub fn predicted_filename(&self) -> Option<PathBuf> {
        self.filename
            .as_deref()
            .or(self.legacy_filename.as_deref())
            .filter(|name| !name.is_empty())
            .map(PathBuf::from)
    }
}

/// Post-transfer step the extractor delegates to the external transcoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcessor {
    /// Extract the audio track and transcode it
    ExtractAudio { codec: String, quality_kbps: u32 },
}

/// Options for one configured transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// Format-selection expression
    pub format: String,
    /// Output path template, e.g. `downloads/abc/%(title)s.%(ext)s`
    pub output_template: String,
    /// Container used when separate streams are merged
    pub merge_output_format: Option<String>,
    pub post_processor: Option<PostProcessor>,
}

impl TransferPlan {
    /// Template writing `<title>.<ext>` into `dir`
    pub fn output_template_in(dir: &Path) -> String {
        dir.join("%(title)s.%(ext)s").to_string_lossy().into_owned()
    }
}

/// A library able to probe and download media URLs
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Metadata-only probe; no media bytes are transferred.
    ///
    /// With a plan, the reported filename is the one the transfer would use.
    async fn probe(&self, url: &str, plan: Option<&TransferPlan>) -> Result<ProbeInfo, ExtractorError>;

    /// Perform the transfer and any post-processing.
    ///
    /// Returns the final output path when the extractor reports one.
    async fn transfer(
        &self,
        url: &str,
        plan: &TransferPlan,
        progress: Option<ProgressCallback>,
    ) -> Result<Option<PathBuf>, ExtractorError>;
}
