//! YouTube URL shape validation.
//!
//! Matching is anchored at the start of the string only: trailing garbage
//! after a valid prefix still validates. That laxness matches what clients
//! actually paste (tracking params, timestamps) and is intentional. None of
//! this verifies the id exists; yt-dlp decides that.

use regex::Regex;
use std::sync::LazyLock;

static VIDEO_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Standard watch page.
        r"^(?:https?://)?(?:www\.)?youtube\.com/watch\?v=[\w-]+",
        // Short link.
        r"^(?:https?://)?(?:www\.)?youtu\.be/[\w-]+",
        // Embed link.
        r"^(?:https?://)?(?:www\.)?youtube\.com/embed/[\w-]+",
        // Shorts.
        r"^(?:https?://)?(?:www\.)?youtube\.com/shorts/[\w-]+",
        // Playlist listing. Accepted here; the extractor rejects multi-entry
        // results with a distinct error.
        r"^(?:https?://)?(?:www\.)?youtube\.com/playlist\?list=[\w-]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static URL pattern"))
    .collect()
});

static VIDEO_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("static id pattern"));

/// Whether the input looks like a supported YouTube URL.
pub fn is_valid_video_url(url: &str) -> bool {
    VIDEO_URL_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Whether the input looks like a bare video id: word characters and
/// dashes only. Anything else (path separators included) is rejected before
/// the id can reach a filename or header.
pub fn is_valid_video_id(id: &str) -> bool {
    VIDEO_ID_PATTERN.is_match(id)
}

/// Canonical watch URL for a bare video id.
pub fn watch_url_for_id(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
