//! Format and quality selection.
//!
//! Maps the two client-facing formats and their quality keys onto yt-dlp
//! stream-selection expressions. Unknown quality keys fall back rather than
//! erroring; only the format itself is validated at the HTTP layer.

use std::fmt;

/// Client-facing download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Mp4,
    Mp3,
}

impl MediaFormat {
    /// Parse a client-supplied format string. Anything other than `mp4` or
    /// `mp3` is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mp4" => Some(MediaFormat::Mp4),
            "mp3" => Some(MediaFormat::Mp3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Mp3 => "mp3",
        }
    }

    /// Content type for the HTTP response. Note the served file's actual
    /// container can differ when yt-dlp negotiates another extension.
    pub fn content_type(self) -> &'static str {
        match self {
            MediaFormat::Mp4 => "video/mp4",
            MediaFormat::Mp3 => "audio/mpeg",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical resolutions accepted as mp4 quality keys.
pub const VIDEO_QUALITIES: &[&str] = &["1080", "720", "480", "360", "240", "144"];

/// Default mp3 bitrate when the quality key is unrecognized.
pub const DEFAULT_AUDIO_KBPS: u32 = 192;

/// yt-dlp selector for a video download: best stream at or below the
/// requested height, or unrestricted best for unknown quality keys.
pub fn video_selector(quality: &str) -> String {
    if VIDEO_QUALITIES.contains(&quality) {
        format!("bestvideo[height<=?{quality}]+bestaudio/best")
    } else {
        "bestvideo+bestaudio/best".to_string()
    }
}

/// Target mp3 bitrate for an audio quality key.
pub fn audio_bitrate_kbps(quality: &str) -> u32 {
    match quality {
        "high" => 320,
        "medium" => 192,
        "low" => 128,
        _ => DEFAULT_AUDIO_KBPS,
    }
}
