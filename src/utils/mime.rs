//! MIME labels and extensions for saved artifacts

use crate::core::MediaMode;

/// MIME type attached to the artifact handed to the user
pub fn artifact_mime(mode: MediaMode) -> &'static str {
    match mode {
        MediaMode::Audio => "audio/mp3",
        MediaMode::Video => "video/mp4",
    }
}

/// Extension forced onto the artifact name
pub fn artifact_extension(mode: MediaMode) -> &'static str {
    match mode {
        MediaMode::Audio => "mp3",
        MediaMode::Video => "mp4",
    }
}

/// Check if an extension belongs to a media container yt-dlp may produce
pub fn is_media_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.').to_lowercase();
    matches!(
        ext.as_str(),
        "mp4" | "webm" | "mkv" | "mov" | "flv" | "3gp" | "m4a" | "mp3" | "ogg" | "opus" | "aac"
            | "flac" | "wav"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_mime() {
        assert_eq!(artifact_mime(MediaMode::Audio), "audio/mp3");
        assert_eq!(artifact_mime(MediaMode::Video), "video/mp4");
    }

    #[test]
    fn test_artifact_extension() {
        assert_eq!(artifact_extension(MediaMode::Audio), "mp3");
        assert_eq!(artifact_extension(MediaMode::Video), "mp4");
    }

    #[test]
    fn test_is_media_extension() {
        assert!(is_media_extension("mp4"));
        assert!(is_media_extension(".WEBM"));
        assert!(!is_media_extension("part"));
        assert!(!is_media_extension("ytdl"));
        assert!(!is_media_extension("json"));
    }
}
