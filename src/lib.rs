//! # uvd - Universal Video Downloader
//!
//! Fetch a video's details from any site yt-dlp understands, then save the
//! video (MP4, capped at a chosen resolution) or its audio (MP3 at a chosen
//! bitrate).
//!
//! Metadata extraction, format negotiation, transfer and transcoding are all
//! delegated to `yt-dlp` and `ffmpeg`. This crate owns the session flow
//! around them: probe, show, choose, download, hand off, clean up.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uvd::{MediaMode, Orchestrator, Session, SessionState, YtDlp};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new(Orchestrator::new(Arc::new(YtDlp::new())));
//!
//!     let state = SessionState::Idle.submit_url("VIDEO_URL")?;
//!     let state = session.fetch(state).await?;
//!     let state = state.choose(MediaMode::Audio, None, Some("256kbps"))?;
//!     if let SessionState::ResultReady(artifact) = session.download(state).await? {
//!         artifact.save_to(std::path::Path::new(".")).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod extractor;
pub mod utils;

// Re-export main types
pub use crate::core::{
    Artifact, AudioBitrate, DownloadRequest, DownloadResult, FlowError, Format, MediaMode, Orchestrator,
    Progress, Resolution, Selection, Session, SessionState, VideoMetadata,
};
pub use crate::error::{DownloadError, ExtractorError, FetchError, UvdError};
pub use crate::extractor::{Extractor, YtDlp};

/// Result type alias for uvd operations
pub type Result<T> = std::result::Result<T, UvdError>;
