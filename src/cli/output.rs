//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::progress::{Progress, Stage};
use crate::core::{Artifact, Format, VideoMetadata};
use crate::utils::format_minutes_seconds;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Output formatter for uvd
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            progress_bar: Mutex::new(None),
        }
    }

    /// Create a percentage progress bar for a transfer
    pub fn start_progress(&self) -> Option<ProgressBar> {
        if self.verbosity == VerbosityLevel::Quiet {
            return None;
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let progress_bar = ProgressBar::new(100);
        progress_bar.set_style(style);
        progress_bar.set_message("Downloading...");
        progress_bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.progress_bar.lock() {
            *slot = Some(progress_bar.clone());
        }
        Some(progress_bar)
    }

    /// Update progress bar
    pub fn update_progress(&self, progress: &Progress) {
        let Ok(slot) = self.progress_bar.lock() else {
            return;
        };
        if let Some(progress_bar) = slot.as_ref() {
            progress_bar.set_position(progress.percent.round() as u64);
            if progress.is_complete() {
                progress_bar.set_message("Finishing...");
            } else if progress.stage == Stage::PostProcessing {
                progress_bar.set_message("Converting...");
            }
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_progress(&self) {
        if let Ok(mut slot) = self.progress_bar.lock() {
            if let Some(progress_bar) = slot.take() {
                progress_bar.finish_and_clear();
            }
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("ℹ️  {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message.green().bold());
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message.red());
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            println!("🐛 {}", message.dimmed());
        }
    }

    /// Print video information
    pub fn print_video_info(&self, metadata: &VideoMetadata) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!();
        println!("📹 {}", metadata.title.bold());
        if let Some(thumbnail) = &metadata.thumbnail_url {
            println!("🖼️  {}", thumbnail.cyan());
        }
        println!("⏱️  Duration: {}", format_minutes_seconds(metadata.duration_seconds));
        let audio_only = metadata.audio_formats().len();
        match metadata.max_height() {
            Some(height) => println!(
                "📊 {} formats available (up to {}p, {} audio only)",
                metadata.formats.len(),
                height,
                audio_only
            ),
            None => println!("📊 {} formats available", metadata.formats.len()),
        }
        println!();
    }

    /// Print one format descriptor
    pub fn print_format_info(&self, format: &Format) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        let streams = if format.is_audio_only() {
            "audio"
        } else if format.is_video_only() {
            "video"
        } else {
            "video+audio"
        };
        println!(
            "  📋 {:>8} | {:<5} | {:<10} | {:<11} | {} | {}",
            format.format_id,
            format.ext.as_deref().unwrap_or("?"),
            format.resolution_string(),
            streams,
            format.format_note.as_deref().unwrap_or("-"),
            format.size_string()
        );
    }

    /// Print download start message
    pub fn print_download_start(&self, selection: &str) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        println!("🚀 Downloading ({})...", selection);
    }

    /// Print the saved artifact
    pub fn print_saved(&self, artifact: &Artifact, saved_to: &Path, elapsed: Duration) {
        if self.verbosity == VerbosityLevel::Quiet {
            return;
        }

        self.success("Download complete!");
        println!("📹 {}", artifact.title);
        println!("💾 Saved to: {}", saved_to.display());
        println!("🏷️  {} ({})", artifact.mime, format_size(artifact.bytes.len()));
        println!("⏱️  Time: {}", humantime::format_duration(round_to_seconds(elapsed)));
    }
}

fn format_size(bytes: usize) -> String {
    crate::core::progress::format_bytes(bytes as u64)
}

fn round_to_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}
