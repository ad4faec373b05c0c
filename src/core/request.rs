//! Download selections and the format expressions they map to

use crate::error::DownloadError;
use std::fmt;
use std::str::FromStr;

/// Whether the user wants the video or only its audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    Video,
    Audio,
}

impl fmt::Display for MediaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaMode::Video => f.write_str("Video"),
            MediaMode::Audio => f.write_str("Audio"),
        }
    }
}

/// Height ceiling offered for video downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resolution {
    P144,
    P360,
    P480,
    P720,
    P1080,
}

impl Resolution {
    /// Every selectable resolution, smallest first
    pub const ALL: [Resolution; 5] = [
        Resolution::P144,
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
    ];

    /// Maximum stream height in pixels
    pub fn height(self) -> u32 {
        match self {
            Resolution::P144 => 144,
            Resolution::P360 => 360,
            Resolution::P480 => 480,
            Resolution::P720 => 720,
            Resolution::P1080 => 1080,
        }
    }

    /// Best video at or below the ceiling plus best audio, else best combined
    pub fn format_expression(self) -> String {
        format!("bestvideo[height<={}]+bestaudio/best", self.height())
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.height())
    }
}

impl FromStr for Resolution {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Resolution::ALL
            .into_iter()
            .find(|r| r.to_string() == wanted)
            .ok_or_else(|| DownloadError::InvalidSelection(format!("unknown resolution '{}'", s)))
    }
}

/// Target MP3 bitrate for audio downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioBitrate(u32);

impl AudioBitrate {
    /// Selector labels offered to the user
    pub const OPTIONS: [&'static str; 3] = ["132kbps", "256kbps", "320kbps"];

    /// Quality target in kbps
    pub fn kbps(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AudioBitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kbps", self.0)
    }
}

impl FromStr for AudioBitrate {
    type Err = DownloadError;

    /// Keep only the digits of the selector ("256kbps" -> 256)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        match digits.parse::<u32>() {
            Ok(kbps) if kbps > 0 => Ok(AudioBitrate(kbps)),
            _ => Err(DownloadError::InvalidSelection(format!("unknown bitrate '{}'", s))),
        }
    }
}

/// The option chosen for the active mode; exactly one exists per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Video(Resolution),
    Audio(AudioBitrate),
}

impl Selection {
    /// Build a selection from the raw selector values of the form
    pub fn parse(
        mode: MediaMode,
        resolution: Option<&str>,
        bitrate: Option<&str>,
    ) -> Result<Self, DownloadError> {
        match mode {
            MediaMode::Video => {
                let raw = resolution.ok_or_else(|| {
                    DownloadError::InvalidSelection("video mode needs a resolution".to_string())
                })?;
                Ok(Selection::Video(raw.parse()?))
            }
            MediaMode::Audio => {
                let raw = bitrate.ok_or_else(|| {
                    DownloadError::InvalidSelection("audio mode needs a bitrate".to_string())
                })?;
                Ok(Selection::Audio(raw.parse()?))
            }
        }
    }

    pub fn mode(&self) -> MediaMode {
        match self {
            Selection::Video(_) => MediaMode::Video,
            Selection::Audio(_) => MediaMode::Audio,
        }
    }

    /// Format-selection expression handed to the extractor
    pub fn format_expression(&self) -> String {
        match self {
            Selection::Video(resolution) => resolution.format_expression(),
            Selection::Audio(_) => "bestaudio/best".to_string(),
        }
    }
}

/// A user's download request for one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub selection: Selection,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, selection: Selection) -> Self {
        Self {
            url: url.into(),
            selection,
        }
    }

    pub fn mode(&self) -> MediaMode {
        self.selection.mode()
    }

    /// Present iff the mode is video
    pub fn resolution_ceiling(&self) -> Option<Resolution> {
        match self.selection {
            Selection::Video(resolution) => Some(resolution),
            Selection::Audio(_) => None,
        }
    }

    /// Present iff the mode is audio
    pub fn audio_bitrate_kbps(&self) -> Option<u32> {
        match self.selection {
            Selection::Audio(bitrate) => Some(bitrate.kbps()),
            Selection::Video(_) => None,
        }
    }
}
