//! Video metadata structures

use crate::extractor::ProbeInfo;
use serde::{Deserialize, Serialize};

/// Title shown when the extractor reports none
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Normalized result of a metadata-only probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,
    /// Thumbnail URL, if the site exposes one
    pub thumbnail_url: Option<String>,
    /// Duration in whole seconds
    pub duration_seconds: u64,
    /// Available formats, in extractor order
    pub formats: Vec<Format>,
}

impl VideoMetadata {
    /// Build metadata from raw probe output, applying the display defaults
    pub fn from_probe(probe: ProbeInfo) -> Self {
        Self {
            title: probe.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            thumbnail_url: probe.thumbnail,
            duration_seconds: whole_seconds(probe.duration),
            formats: probe.formats.unwrap_or_default(),
        }
    }

    /// Formats that carry no video stream
    pub fn audio_formats(&self) -> Vec<&Format> {
        self.formats.iter().filter(|f| f.is_audio_only()).collect()
    }

    /// Tallest video stream the site offers
    pub fn max_height(&self) -> Option<u32> {
        self.formats.iter().filter_map(|f| f.height).max()
    }
}

fn whole_seconds(duration: Option<f64>) -> u64 {
    match duration {
        Some(d) if d.is_finite() && d > 0.0 => d as u64,
        _ => 0,
    }
}

/// One format descriptor as reported by yt-dlp
///
/// Only the fields used for display are decoded; everything else the
/// extractor reports is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Format {
    /// Extractor format ID
    #[serde(default)]
    pub format_id: String,
    /// Container extension
    pub ext: Option<String>,
    /// Video width
    pub width: Option<u32>,
    /// Video height
    pub height: Option<u32>,
    /// Frame rate
    pub fps: Option<f64>,
    /// Video codec, `"none"` for audio-only
    pub vcodec: Option<String>,
    /// Audio codec, `"none"` for video-only
    pub acodec: Option<String>,
    /// Audio bitrate in kbps
    pub abr: Option<f64>,
    /// Total bitrate in kbps
    pub tbr: Option<f64>,
    /// File size in bytes; some extractors report it as a float
    pub filesize: Option<f64>,
    /// Human note (e.g. "720p", "medium")
    pub format_note: Option<String>,
}

impl Format {
    /// Check if format has no video stream
    pub fn is_audio_only(&self) -> bool {
        codec_absent(&self.vcodec) && !codec_absent(&self.acodec)
    }

    /// Check if format has no audio stream
    pub fn is_video_only(&self) -> bool {
        codec_absent(&self.acodec) && !codec_absent(&self.vcodec)
    }

    /// Get human-readable resolution string
    pub fn resolution_string(&self) -> String {
        match (self.width, self.height) {
            _ if self.is_audio_only() => "audio only".to_string(),
            (Some(width), Some(height)) => format!("{}x{}", width, height),
            (None, Some(height)) => format!("{}p", height),
            _ => "unknown".to_string(),
        }
    }

    /// Get human-readable size string
    pub fn size_string(&self) -> String {
        match self.filesize {
            Some(size) if size >= 0.0 => crate::core::progress::format_bytes(size as u64),
            _ => "Unknown".to_string(),
        }
    }
}

fn codec_absent(codec: &Option<String>) -> bool {
    codec.as_deref().map_or(true, |c| c == "none")
}
