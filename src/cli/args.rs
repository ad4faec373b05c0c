//! Command line argument parsing

use crate::core::{AudioBitrate, MediaMode, DEFAULT_WORK_DIR};
use clap::builder::PossibleValuesParser;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const RESOLUTIONS: [&str; 5] = ["144p", "360p", "480p", "720p", "1080p"];

/// Universal Video Downloader - save a video, or its audio as MP3, from any site yt-dlp supports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video URL (prompted for when omitted)
    pub url: Option<String>,

    /// Download as video or audio
    #[arg(short, long, value_enum, default_value = "video")]
    pub mode: ModeArg,

    /// Maximum video resolution (video mode)
    #[arg(short, long, value_parser = PossibleValuesParser::new(RESOLUTIONS), default_value = "144p")]
    pub resolution: String,

    /// MP3 bitrate (audio mode)
    #[arg(short, long, value_parser = PossibleValuesParser::new(AudioBitrate::OPTIONS), default_value = "132kbps")]
    pub bitrate: String,

    /// Show video details and stop
    #[arg(short, long)]
    pub info: bool,

    /// List the formats the site offers
    #[arg(long)]
    pub list_formats: bool,

    /// Directory the finished file is saved to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Working directory for in-progress downloads
    #[arg(long, value_name = "DIR", env = "UVD_WORK_DIR", default_value = DEFAULT_WORK_DIR)]
    pub work_dir: PathBuf,

    /// yt-dlp executable
    #[arg(long = "yt-dlp", value_name = "PATH", env = "UVD_YTDLP", default_value = "yt-dlp")]
    pub yt_dlp: PathBuf,

    /// ffmpeg binary or directory passed to yt-dlp
    #[arg(long, value_name = "PATH", env = "UVD_FFMPEG")]
    pub ffmpeg_location: Option<PathBuf>,

    /// Disable progress output
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Download mode
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum ModeArg {
    /// Video with audio, merged to MP4
    Video,
    /// Audio only, transcoded to MP3
    Audio,
}

impl From<ModeArg> for MediaMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Video => MediaMode::Video,
            ModeArg::Audio => MediaMode::Audio,
        }
    }
}

impl Args {
    pub fn media_mode(&self) -> MediaMode {
        self.mode.into()
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbosity_level() {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "uvd=debug,info",
        }
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            url: None,
            mode: ModeArg::Video,
            resolution: "144p".to_string(),
            bitrate: "132kbps".to_string(),
            info: false,
            list_formats: false,
            output: PathBuf::from("."),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            yt_dlp: PathBuf::from("yt-dlp"),
            ffmpeg_location: None,
            no_progress: false,
            verbose: false,
            quiet: false,
        }
    }
}
