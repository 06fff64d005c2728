//! Filename sanitation for download artifacts.
//!
//! Video titles come straight from the remote site and can contain anything;
//! the sanitized form is used both as the on-disk base name and as the
//! attachment filename served back to the client.

use chrono::{DateTime, Utc};

/// Maximum length (in characters) of a sanitized title.
pub const MAX_TITLE_LEN: usize = 100;

/// Characters that are illegal in filesystem path components on at least one
/// supported platform.
const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip illegal path characters, collapse whitespace runs to single spaces,
/// trim, and truncate to [`MAX_TITLE_LEN`] characters.
///
/// An empty result is legal; callers fall back to the video id.
pub fn sanitize_title(title: &str) -> String {
    let stripped: String = title.chars().filter(|c| !ILLEGAL.contains(c)).collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_TITLE_LEN).collect()
}

/// Build the on-disk base name for a download: the sanitized title (or the
/// video id when sanitation yields nothing) plus a millisecond timestamp.
///
/// The timestamp is a best-effort uniqueness token, not a guarantee: two
/// downloads of the same title within the same millisecond still collide.
pub fn unique_base_name(title: &str, video_id: &str, now: DateTime<Utc>) -> String {
    let base = sanitize_title(title);
    let base = if base.is_empty() { video_id } else { &base };
    format!("{}-{}", base, now.timestamp_millis())
}
