//! End-to-end session flow against a scripted extractor

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_test::assert_ok;
use uvd::core::{discard_temp_file, ProgressCallback, DOWNLOAD_FAILED_MESSAGE};
use uvd::extractor::{PostProcessor, ProbeInfo, TransferPlan};
use uvd::{
    DownloadError, Extractor, ExtractorError, FetchError, FlowError, MediaMode, Orchestrator, Progress, Session,
    SessionState,
};

/// What the scripted transfer should do
#[derive(Clone, Copy)]
enum TransferBehavior {
    /// Write the file and report it
    Write,
    /// Report a path without writing anything
    ReportMissing,
}

struct ScriptedExtractor {
    probe_error: Option<&'static str>,
    behavior: TransferBehavior,
    plans: Mutex<Vec<TransferPlan>>,
}

impl ScriptedExtractor {
    fn new(behavior: TransferBehavior) -> Self {
        Self {
            probe_error: None,
            behavior,
            plans: Mutex::new(Vec::new()),
        }
    }

    fn failing_probe(message: &'static str) -> Self {
        Self {
            probe_error: Some(message),
            ..Self::new(TransferBehavior::Write)
        }
    }
}

#[async_trait]
impl Extractor for ScriptedExtractor {
    async fn probe(&self, _url: &str, plan: Option<&TransferPlan>) -> Result<ProbeInfo, ExtractorError> {
        if let Some(message) = self.probe_error {
            return Err(ExtractorError::MissingOutput(message.to_string()));
        }
        Ok(ProbeInfo {
            title: Some("Lecture 1 / Intro?".to_string()),
            thumbnail: None,
            duration: Some(3661.4),
            formats: None,
            filename: plan.map(|p| p.output_template.replace("%(title)s", "Lecture 1").replace("%(ext)s", "webm")),
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
        let ext = if plan.post_processor.is_some() { "mp3" } else { "webm" };
        let path = PathBuf::from(
            plan.output_template
                .replace("%(title)s", "Lecture 1")
                .replace("%(ext)s", ext),
        );
        if let Some(callback) = progress {
            callback(Progress {
                percent: 100.0,
                stage: uvd::core::Stage::Finished,
                elapsed: std::time::Duration::ZERO,
            });
        }
        match self.behavior {
            TransferBehavior::Write => {
                std::fs::write(&path, b"0123456789")?;
                Ok(Some(path))
            }
            TransferBehavior::ReportMissing => Ok(Some(path)),
        }
    }
}

fn session(work_dir: &Path, extractor: Arc<ScriptedExtractor>) -> Session {
    Session::new(Orchestrator::new(extractor).with_work_dir(work_dir))
}

async fn shown(session: &Session, url: &str) -> SessionState {
    let state = assert_ok!(SessionState::Idle.submit_url(url));
    assert_ok!(session.fetch(state).await)
}

#[tokio::test]
async fn video_flow_hands_off_mp4_and_cleans_up() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let extractor = Arc::new(ScriptedExtractor::new(TransferBehavior::Write));
    let session = session(work.path(), extractor.clone());

    let state = shown(&session, "https://videos.example.com/lecture-1").await;
    match &state {
        SessionState::MetadataShown { metadata, .. } => {
            assert_eq!(metadata.title, "Lecture 1 / Intro?");
            assert_eq!(metadata.duration_seconds, 3661);
            assert_eq!(uvd::utils::format_minutes_seconds(metadata.duration_seconds), "61m 1s");
            assert!(metadata.formats.is_empty());
        }
        other => panic!("unexpected state {}", other.name()),
    }

    let state = assert_ok!(state.choose(MediaMode::Video, Some("720p"), Some("320kbps")));
    let state = assert_ok!(session.download(state).await);
    let artifact = match state {
        SessionState::ResultReady(artifact) => artifact,
        other => panic!("unexpected state {}", other.name()),
    };

    // webm container renamed to mp4 for the suggested name
    assert_eq!(artifact.file_name, "Lecture_1.mp4");
    assert_eq!(artifact.mime, "video/mp4");
    assert_eq!(artifact.title, "Lecture 1 / Intro?");

    let plans = extractor.plans.lock().unwrap().clone();
    assert_eq!(plans.len(), 1);
    assert!(plans[0].format.contains("height<=720"));
    assert!(plans[0].format.ends_with("/best"));
    assert_eq!(plans[0].merge_output_format.as_deref(), Some("mp4"));
    assert!(plans[0].post_processor.is_none());

    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);

    let saved = assert_ok!(artifact.save_to(out.path()).await);
    assert_eq!(saved, out.path().join("Lecture_1.mp4"));
    assert_eq!(std::fs::read(&saved).unwrap(), b"0123456789");
}

#[tokio::test]
async fn audio_flow_passes_numeric_quality() {
    let work = tempfile::tempdir().unwrap();
    let extractor = Arc::new(ScriptedExtractor::new(TransferBehavior::Write));
    let session = session(work.path(), extractor.clone());

    let state = shown(&session, "https://videos.example.com/lecture-1").await;
    let state = assert_ok!(state.choose(MediaMode::Audio, Some("1080p"), Some("256kbps")));
    let state = assert_ok!(session.download(state).await);

    match state {
        SessionState::ResultReady(artifact) => {
            assert_eq!(artifact.file_name, "Lecture_1.mp3");
            assert_eq!(artifact.mime, "audio/mp3");
        }
        other => panic!("unexpected state {}", other.name()),
    }

    let plans = extractor.plans.lock().unwrap().clone();
    assert_eq!(plans[0].format, "bestaudio/best");
    assert_eq!(
        plans[0].post_processor,
        Some(PostProcessor::ExtractAudio {
            codec: "mp3".to_string(),
            quality_kbps: 256
        })
    );
}

#[tokio::test]
async fn probe_failure_is_recoverable() {
    let work = tempfile::tempdir().unwrap();
    let session = session(work.path(), Arc::new(ScriptedExtractor::failing_probe("Unsupported URL: nope")));

    let state = shown(&session, "nope").await;
    match &state {
        SessionState::Error(FlowError::Fetch(FetchError::Extractor(_))) => {}
        other => panic!("unexpected state {}", other.name()),
    }

    let state = assert_ok!(state.submit_url("https://videos.example.com/other"));
    assert!(matches!(state, SessionState::FetchingMetadata { .. }));
}

#[tokio::test]
async fn reported_but_absent_file_is_download_error() {
    let work = tempfile::tempdir().unwrap();
    let session = session(work.path(), Arc::new(ScriptedExtractor::new(TransferBehavior::ReportMissing)));

    let state = shown(&session, "https://videos.example.com/lecture-1").await;
    let state = assert_ok!(state.choose(MediaMode::Video, Some("360p"), None));
    let state = assert_ok!(session.download(state).await);

    match state {
        SessionState::Error(err @ FlowError::Download(DownloadError::MissingOutput(_))) => {
            assert_eq!(err.user_message(), DOWNLOAD_FAILED_MESSAGE);
        }
        other => panic!("unexpected state {}", other.name()),
    }
}

#[tokio::test]
async fn second_discard_does_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Lecture_1.mp4");
    std::fs::write(&path, b"x").unwrap();

    discard_temp_file(&path).await;
    discard_temp_file(&path).await;
    assert!(!path.exists());
}
