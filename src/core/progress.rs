//! Progress reporting for transfers

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Callback receiving progress updates from a transfer
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// What the transfer is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Media bytes are being transferred
    Downloading,
    /// Streams are being merged or transcoded
    PostProcessing,
    /// The output file is in place
    Finished,
}

/// Progress information for a transfer
#[derive(Debug, Clone)]
pub struct Progress {
    /// Progress as a percentage (0.0 to 100.0)
    pub percent: f64,
    /// Current stage
    pub stage: Stage,
    /// Time since the transfer started
    pub elapsed: Duration,
}

impl Progress {
    /// Check if transfer is complete
    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Finished
    }
}

/// Turns raw percentage readings into a non-decreasing progress sequence
///
/// yt-dlp restarts at 0% for every stream it fetches (video, then audio), so
/// raw readings go backwards; the tracker only reports new maxima.
#[derive(Debug)]
pub struct ProgressTracker {
    percent: f64,
    stage: Stage,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            stage: Stage::Downloading,
            start_time: Instant::now(),
        }
    }

    /// Record a percentage reading; returns an update only when it advances
    pub fn observe_percent(&mut self, percent: f64) -> Option<Progress> {
        if !percent.is_finite() || self.stage != Stage::Downloading {
            return None;
        }
        let percent = percent.clamp(0.0, 100.0);
        if percent <= self.percent {
            return None;
        }
        self.percent = percent;
        Some(self.snapshot())
    }

    /// Move to a later stage; earlier stages are ignored
    pub fn advance(&mut self, stage: Stage) -> Option<Progress> {
        if stage_rank(stage) <= stage_rank(self.stage) {
            return None;
        }
        self.stage = stage;
        if stage == Stage::Finished {
            self.percent = 100.0;
        }
        Some(self.snapshot())
    }

    pub fn snapshot(&self) -> Progress {
        Progress {
            percent: self.percent,
            stage: self.stage,
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn stage_rank(stage: Stage) -> u8 {
    match stage {
        Stage::Downloading => 0,
        Stage::PostProcessing => 1,
        Stage::Finished => 2,
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f64 = bytes as f64;
    let exp = (bytes_f64.ln() / THRESHOLD.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f64 / THRESHOLD.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.1} {}", value, UNITS[exp])
    }
}
