//! Interaction flow: one explicit state value per user session
//!
//! ```text
//! Idle -> FetchingMetadata -> MetadataShown -> Downloading -> ResultReady
//!              |                    |               |
//!              v                    v               v
//!         Error(Fetch)        Error(Download)  Error(Download)
//! ```
//!
//! Transitions consume the current state and return the next one. Failures
//! of the collaborator become `Error` states, never panics or early exits,
//! and a new URL can be submitted from any settled state.

use crate::core::{fetch_metadata, DownloadRequest, MediaMode, Orchestrator, Selection, VideoMetadata};
use crate::error::{DownloadError, FetchError, UvdError};
use crate::utils::{artifact_extension, artifact_mime, sanitize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Message shown when a download cannot be completed
pub const DOWNLOAD_FAILED_MESSAGE: &str =
    "Download failed. Please check the URL or try another resolution.";

/// Where the flow stopped with an error
#[derive(Debug)]
pub enum FlowError {
    Fetch(FetchError),
    Download(DownloadError),
}

impl FlowError {
    /// Text to show the user
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Fetch(e) => format!("Error getting video info: {}", e),
            FlowError::Download(_) => DOWNLOAD_FAILED_MESSAGE.to_string(),
        }
    }

    /// Underlying cause, for logs and verbose output
    pub fn detail(&self) -> String {
        match self {
            FlowError::Fetch(e) => e.to_string(),
            FlowError::Download(e) => e.to_string(),
        }
    }
}

/// The finished file, read into memory and ready to be saved by the user
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Sanitized name suggested for saving
    pub file_name: String,
    pub mime: &'static str,
    pub title: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write the artifact into `dir`, creating it if needed
    pub async fn save_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(&self.file_name);
        tokio::fs::write(&target, &self.bytes).await?;
        Ok(target)
    }
}

/// State of one session
#[derive(Debug)]
pub enum SessionState {
    Idle,
    FetchingMetadata {
        url: String,
    },
    MetadataShown {
        url: String,
        metadata: VideoMetadata,
    },
    Downloading {
        metadata: VideoMetadata,
        request: DownloadRequest,
    },
    ResultReady(Artifact),
    Error(FlowError),
}

impl SessionState {
    /// Short state name for logs and transition errors
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::FetchingMetadata { .. } => "FetchingMetadata",
            SessionState::MetadataShown { .. } => "MetadataShown",
            SessionState::Downloading { .. } => "Downloading",
            SessionState::ResultReady(_) => "ResultReady",
            SessionState::Error(_) => "Error",
        }
    }

    /// Check if a collaborator call is pending for this state
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SessionState::FetchingMetadata { .. } | SessionState::Downloading { .. }
        )
    }

    /// A URL value became present in the input field.
    ///
    /// An empty value leaves the session idle; a non-empty one starts a
    /// fresh fetch and discards earlier metadata or results.
    pub fn submit_url(self, url: &str) -> Result<SessionState, UvdError> {
        if self.is_busy() {
            return Err(invalid_transition(&self, "submit a URL"));
        }
        let url = url.trim();
        if url.is_empty() {
            return Ok(SessionState::Idle);
        }
        Ok(SessionState::FetchingMetadata { url: url.to_string() })
    }

    /// The user pressed Download with the given selector values
    pub fn choose(
        self,
        mode: MediaMode,
        resolution: Option<&str>,
        bitrate: Option<&str>,
    ) -> Result<SessionState, UvdError> {
        match self {
            SessionState::MetadataShown { url, metadata } => {
                match Selection::parse(mode, resolution, bitrate) {
                    Ok(selection) => Ok(SessionState::Downloading {
                        metadata,
                        request: DownloadRequest::new(url, selection),
                    }),
                    Err(e) => {
                        warn!(error = %e, "Rejected download selection");
                        Ok(SessionState::Error(FlowError::Download(e)))
                    }
                }
            }
            other => Err(invalid_transition(&other, "choose download options")),
        }
    }
}

fn invalid_transition(state: &SessionState, action: &str) -> UvdError {
    UvdError::Session(format!("cannot {} while {}", action, state.name()))
}

/// Drives the collaborator-backed transitions of a session
pub struct Session {
    orchestrator: Orchestrator,
}

impl Session {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// `FetchingMetadata -> MetadataShown | Error(Fetch)`
    pub async fn fetch(&self, state: SessionState) -> Result<SessionState, UvdError> {
        let url = match state {
            SessionState::FetchingMetadata { url } => url,
            other => return Err(invalid_transition(&other, "fetch metadata")),
        };

        match fetch_metadata(self.orchestrator.extractor(), &url).await {
            Ok(metadata) => Ok(SessionState::MetadataShown { url, metadata }),
            Err(e) => Ok(SessionState::Error(FlowError::Fetch(e))),
        }
    }

    /// `Downloading -> ResultReady | Error(Download)`
    ///
    /// On success the file's bytes are taken into the artifact and the
    /// temporary copy is deleted right away.
    pub async fn download(&self, state: SessionState) -> Result<SessionState, UvdError> {
        let request = match state {
            SessionState::Downloading { request, .. } => request,
            other => return Err(invalid_transition(&other, "download")),
        };

        let result = match self.orchestrator.download(&request).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Download failed");
                return Ok(SessionState::Error(FlowError::Download(e)));
            }
        };

        let path = result.local_file_path.clone();
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            warn!(path = %path.display(), "Download reported a file that does not exist");
            return Ok(SessionState::Error(FlowError::Download(DownloadError::MissingOutput(path))));
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(SessionState::Error(FlowError::Download(DownloadError::Io(e)))),
        };
        let artifact = Artifact {
            file_name: suggested_file_name(&path, result.mode),
            mime: artifact_mime(result.mode),
            title: result.display_title.clone(),
            bytes,
        };
        discard_temp_file(&path).await;
        debug!(workspace = %result.workspace().display(), "Releasing request directory");
        drop(result);

        info!(file_name = %artifact.file_name, size = artifact.bytes.len(), "Result ready");
        Ok(SessionState::ResultReady(artifact))
    }
}

/// Sanitized base name of the produced file with the mode's extension forced
pub fn suggested_file_name(path: &Path, mode: MediaMode) -> String {
    let named = path.with_extension(artifact_extension(mode));
    let base = named
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize(&base)
}

/// Remove a temporary file; failure (including "already gone") is swallowed
pub async fn discard_temp_file(path: &Path) {
    if tokio::fs::remove_file(path).await.is_ok() {
        debug!(path = %path.display(), "Removed temporary file");
    }
}
