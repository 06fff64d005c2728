//! Extraction adapter: the seam between the HTTP layer and yt-dlp.
//!
//! All of the hard work (protocol negotiation, stream selection, transcode)
//! is delegated to yt-dlp and ffmpeg. This module owns the contract:
//! structured metadata out, tagged errors out, and a download that writes
//! `<base_name>.<ext>` into the download directory with the extension
//! resolved by yt-dlp.

pub mod selector;
pub mod ytdlp;

pub use selector::MediaFormat;
pub use ytdlp::YtDlpExtractor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum description length (in characters) carried in a [`VideoInfo`].
pub const DESCRIPTION_LIMIT: usize = 200;

/// Errors surfaced by the extraction adapter.
///
/// Classification happens here, at the boundary where the real failure is
/// known; downstream code dispatches on the variant, never on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Playlist URLs are not supported. Please provide a single video URL")]
    Playlist,

    #[error("This video is unavailable")]
    Unavailable,

    #[error("This video is not available in your region")]
    RegionLocked,

    #[error("ffmpeg is required for audio conversion but was not found on the server")]
    TranscoderMissing,

    #[error("failed to start yt-dlp: {0}")]
    Spawn(String),

    #[error("failed to parse yt-dlp output: {0}")]
    BadOutput(String),

    #[error("extraction failed: {0}")]
    Failed(String),
}

impl ExtractError {
    /// Best-effort classification of yt-dlp stderr into a tagged variant.
    ///
    /// The substrings mirror messages yt-dlp actually prints. Anything
    /// unrecognized falls through to [`ExtractError::Failed`] carrying the
    /// last few stderr lines.
    pub fn classify_stderr(stderr: &str) -> Self {
        let lower = stderr.to_lowercase();
        if lower.contains("ffmpeg") || lower.contains("ffprobe") {
            ExtractError::TranscoderMissing
        } else if lower.contains("in your country") || lower.contains("region") {
            ExtractError::RegionLocked
        } else if lower.contains("unavailable") || lower.contains("not available") {
            ExtractError::Unavailable
        } else {
            ExtractError::Failed(stderr_tail(stderr))
        }
    }
}

/// Last few non-empty stderr lines, for error messages.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no output captured".to_string();
    }
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}

/// Metadata for a single video, shaped for the HTTP response.
///
/// Built transiently per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    /// Formatted as `h:mm:ss` or `m:ss`.
    pub duration: String,
    /// Comma-grouped count, or `"N/A"` when the site does not report one.
    pub views: String,
    /// Truncated to [`DESCRIPTION_LIMIT`] characters plus an ellipsis marker.
    pub description: String,
    pub uploader: String,
    pub upload_date: String,
}

/// The extraction seam. [`YtDlpExtractor`] is the real implementation;
/// tests substitute their own.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Metadata-only query; no media is downloaded. Multi-entry (playlist)
    /// results are rejected with [`ExtractError::Playlist`].
    async fn fetch_metadata(&self, url: &str) -> Result<VideoInfo, ExtractError>;

    /// Download (and for mp3, transcode) media, writing
    /// `<base_name>.<ext>` into the download directory. The extension is
    /// resolved by yt-dlp, so callers locate the file by prefix scan.
    async fn download_media(
        &self,
        url: &str,
        format: MediaFormat,
        quality: &str,
        base_name: &str,
    ) -> Result<(), ExtractError>;
}

/// Format a duration in seconds the way the site UI does.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Comma-grouped view count, or `"N/A"` when unreported.
pub fn format_views(count: Option<u64>) -> String {
    let Some(n) = count else {
        return "N/A".to_string();
    };
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate a description to [`DESCRIPTION_LIMIT`] characters, appending an
/// ellipsis marker only when something was cut.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_LIMIT {
        return description.to_string();
    }
    let mut out: String = description.chars().take(DESCRIPTION_LIMIT).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_transcoder_missing() {
        let err = ExtractError::classify_stderr("ERROR: ffmpeg not found. Please install");
        assert_eq!(err, ExtractError::TranscoderMissing);
        let err = ExtractError::classify_stderr("ERROR: ffprobe and ffmpeg are required");
        assert_eq!(err, ExtractError::TranscoderMissing);
    }

    #[test]
    fn classifies_region_lock_before_generic_unavailable() {
        // "not available in your country" also contains "not available";
        // the region check must win.
        let err = ExtractError::classify_stderr(
            "ERROR: The uploader has not made this video available in your country",
        );
        assert_eq!(err, ExtractError::RegionLocked);
    }

    #[test]
    fn classifies_unavailable() {
        let err = ExtractError::classify_stderr("ERROR: Video unavailable");
        assert_eq!(err, ExtractError::Unavailable);
        let err = ExtractError::classify_stderr("ERROR: This video is not available");
        assert_eq!(err, ExtractError::Unavailable);
    }

    #[test]
    fn unrecognized_stderr_falls_through_to_failed() {
        let err = ExtractError::classify_stderr("ERROR: something nobody predicted");
        match err {
            ExtractError::Failed(msg) => assert!(msg.contains("nobody predicted")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn failed_keeps_only_the_stderr_tail() {
        let stderr = (0..20)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        match ExtractError::classify_stderr(&stderr) {
            ExtractError::Failed(msg) => {
                assert!(!msg.contains("line 0"));
                assert!(msg.contains("line 19"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn duration_formats_like_the_site() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(83), "1:23");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3700), "1:01:40");
    }

    #[test]
    fn views_group_thousands() {
        assert_eq!(format_views(None), "N/A");
        assert_eq!(format_views(Some(0)), "0");
        assert_eq!(format_views(Some(999)), "999");
        assert_eq!(format_views(Some(1_000)), "1,000");
        assert_eq!(format_views(Some(1_234_567)), "1,234,567");
    }

    #[test]
    fn description_truncates_with_marker() {
        let short = "hello";
        assert_eq!(truncate_description(short), "hello");

        let long = "x".repeat(300);
        let out = truncate_description(&long);
        assert_eq!(out.chars().count(), DESCRIPTION_LIMIT + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn description_at_exactly_the_limit_is_untouched() {
        let exact = "y".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&exact), exact);
    }
}
