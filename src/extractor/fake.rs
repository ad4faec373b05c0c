//! In-process extractor used by unit tests

use crate::core::{Format, Progress, ProgressCallback, Stage};
use crate::error::ExtractorError;
use crate::extractor::{Extractor, PostProcessor, ProbeInfo, TransferPlan};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Pretends to be yt-dlp: answers probes and writes a small file on transfer
pub(crate) struct FakeExtractor {
    pub title: Option<String>,
    pub fail_probe: Option<String>,
    pub fail_transfer: Option<String>,
    /// Write the output file during transfer
    pub write_file: bool,
    /// Report the realized path from transfer
    pub report_path: bool,
    pub plans: Mutex<Vec<TransferPlan>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self {
            title: Some("Test Clip: Part 1".to_string()),
            fail_probe: None,
            fail_transfer: None,
            write_file: true,
            report_path: true,
            plans: Mutex::new(Vec::new()),
        }
    }

    fn source_ext(plan: &TransferPlan) -> &'static str {
        if plan.merge_output_format.is_some() {
            "mp4"
        } else {
            "webm"
        }
    }

    fn render(plan: &TransferPlan, title: &str, ext: &str) -> PathBuf {
        PathBuf::from(
            plan.output_template
                .replace("%(title)s", title)
                .replace("%(ext)s", ext),
        )
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn probe(&self, _url: &str, plan: Option<&TransferPlan>) -> Result<ProbeInfo, ExtractorError> {
        if let Some(message) = &self.fail_probe {
            return Err(ExtractorError::MissingOutput(message.clone()));
        }
        let title = self.title.clone().unwrap_or_else(|| "NA".to_string());
        Ok(ProbeInfo {
            title: self.title.clone(),
            thumbnail: Some("https://img.example.com/thumb.jpg".to_string()),
            duration: Some(125.0),
            formats: Some(vec![
                Format {
                    format_id: "18".into(),
                    ext: Some("mp4".into()),
                    height: Some(360),
                    vcodec: Some("avc1".into()),
                    acodec: Some("mp4a".into()),
                    ..Default::default()
                },
                Format {
                    format_id: "251".into(),
                    ext: Some("webm".into()),
                    vcodec: Some("none".into()),
                    acodec: Some("opus".into()),
                    ..Default::default()
                },
            ]),
            filename: plan.map(|p| Self::render(p, &title, Self::source_ext(p)).to_string_lossy().into_owned()),
            legacy_filename: None,
        })
    }

    async fn transfer(
        &self,
        _url: &str,
        plan: &TransferPlan,
        progress: Option<ProgressCallback>,
    ) -> Result<Option<PathBuf>, ExtractorError> {
        self.plans.lock().unwrap().push(plan.clone());
        if let Some(message) = &self.fail_transfer {
            return Err(ExtractorError::MissingOutput(message.clone()));
        }
        let title = self.title.clone().unwrap_or_else(|| "NA".to_string());
        let ext = match &plan.post_processor {
            Some(PostProcessor::ExtractAudio { codec, .. }) => codec.as_str(),
            None => Self::source_ext(plan),
        };
        let path = Self::render(plan, &title, ext);
        if self.write_file {
            std::fs::write(&path, b"media bytes")?;
        }
        if let Some(callback) = progress {
            for percent in [25.0, 100.0] {
                callback(Progress {
                    percent,
                    stage: Stage::Downloading,
                    elapsed: Duration::from_millis(1),
                });
            }
        }
        Ok(self.report_path.then_some(path))
    }
}
