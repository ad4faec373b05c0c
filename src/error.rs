//! Error types for uvd

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure reported by the extraction collaborator
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("yt-dlp exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("could not decode yt-dlp output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing yt-dlp output: {0}")]
    MissingOutput(String),
}

/// Metadata probe failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no URL given")]
    EmptyUrl,

    #[error("{0}")]
    Extractor(#[from] ExtractorError),
}

/// Transfer, transcode or output lookup failed
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("cannot prepare working directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Extractor(#[from] ExtractorError),

    #[error("downloaded file not found: {0}")]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for uvd operations
#[derive(Debug, Error)]
pub enum UvdError {
    #[error("Error getting video info: {0}")]
    Fetch(#[from] FetchError),

    #[error("Error downloading: {0}")]
    Download(#[from] DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(String),
}
