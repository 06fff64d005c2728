//! yt-dlp subprocess driver.
//!
//! All network interaction with the source site happens inside yt-dlp. This
//! module builds the command lines, parses `-J` output into [`VideoInfo`],
//! and classifies failures from stderr at this boundary.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use super::selector::{self, MediaFormat};
use super::{
    format_duration, format_views, truncate_description, ExtractError, MediaExtractor, VideoInfo,
};

/// [`MediaExtractor`] backed by the yt-dlp binary.
pub struct YtDlpExtractor {
    bin: String,
    download_dir: PathBuf,
    ffmpeg_location: Option<String>,
}

impl YtDlpExtractor {
    pub fn new(bin: impl Into<String>, download_dir: PathBuf) -> Self {
        Self {
            bin: bin.into(),
            download_dir,
            ffmpeg_location: None,
        }
    }

    /// Point yt-dlp at a specific ffmpeg install instead of `$PATH`.
    pub fn with_ffmpeg_location(mut self, location: impl Into<String>) -> Self {
        self.ffmpeg_location = Some(location.into());
        self
    }

    // Quiet mode suppresses progress output; warnings would otherwise leak
    // into the stderr we classify on. kill_on_drop ties the child's lifetime
    // to the request future, so a client disconnect aborts the download.
    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("--quiet").arg("--no-warnings").kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn fetch_metadata(&self, url: &str) -> Result<VideoInfo, ExtractError> {
        let mut cmd = self.base_command();
        cmd.arg("-J").arg(url);

        debug!(%url, "querying yt-dlp for metadata");
        let output = cmd
            .output()
            .await
            .map_err(|e| ExtractError::Spawn(e.to_string()))?;
        if !output.status.success() {
            return Err(ExtractError::classify_stderr(&String::from_utf8_lossy(
                &output.stderr,
            )));
        }

        let doc: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ExtractError::BadOutput(e.to_string()))?;
        video_info_from_doc(&doc)
    }

    async fn download_media(
        &self,
        url: &str,
        format: MediaFormat,
        quality: &str,
        base_name: &str,
    ) -> Result<(), ExtractError> {
        // The extension placeholder is resolved by yt-dlp; callers discover
        // the produced file by prefix scan.
        let template = self.download_dir.join(format!("{base_name}.%(ext)s"));

        let mut cmd = self.base_command();
        cmd.arg("--no-playlist").arg("-o").arg(&template);
        if let Some(location) = &self.ffmpeg_location {
            cmd.arg("--ffmpeg-location").arg(location);
        }

        match format {
            MediaFormat::Mp4 => {
                cmd.arg("-f")
                    .arg(selector::video_selector(quality))
                    .arg("--merge-output-format")
                    .arg("mp4");
            }
            MediaFormat::Mp3 => {
                let kbps = selector::audio_bitrate_kbps(quality);
                cmd.arg("-f")
                    .arg("bestaudio/best")
                    .arg("-x")
                    .arg("--audio-format")
                    .arg("mp3")
                    .arg("--audio-quality")
                    .arg(format!("{kbps}K"));
            }
        }
        cmd.arg(url);

        debug!(%url, format = format.as_str(), %quality, "starting yt-dlp download");
        let output = cmd
            .output()
            .await
            .map_err(|e| ExtractError::Spawn(e.to_string()))?;
        if !output.status.success() {
            return Err(ExtractError::classify_stderr(&String::from_utf8_lossy(
                &output.stderr,
            )));
        }
        Ok(())
    }
}

/// Build a [`VideoInfo`] from a yt-dlp `-J` document, rejecting multi-entry
/// (playlist) results before constructing anything.
pub(crate) fn video_info_from_doc(doc: &Value) -> Result<VideoInfo, ExtractError> {
    let is_playlist =
        doc.get("_type").and_then(Value::as_str) == Some("playlist") || doc.get("entries").is_some();
    if is_playlist {
        return Err(ExtractError::Playlist);
    }

    let duration = doc.get("duration").and_then(Value::as_f64).unwrap_or(0.0) as u64;
    Ok(VideoInfo {
        id: str_field(doc, "id"),
        title: str_field(doc, "title"),
        thumbnail: str_field(doc, "thumbnail"),
        duration: format_duration(duration),
        views: format_views(doc.get("view_count").and_then(Value::as_u64)),
        description: truncate_description(
            doc.get("description").and_then(Value::as_str).unwrap_or(""),
        ),
        uploader: doc
            .get("uploader")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        upload_date: doc
            .get("upload_date")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
    })
}

fn str_field(doc: &Value, key: &str) -> String {
    doc.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_video_info_from_full_document() {
        let doc = json!({
            "id": "dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg",
            "duration": 212.0,
            "view_count": 1_400_000_000u64,
            "description": "Official video.",
            "uploader": "Rick Astley",
            "upload_date": "20091025",
        });
        let info = video_info_from_doc(&doc).unwrap();
        assert_eq!(info.id, "dQw4w9WgXcQ");
        assert_eq!(info.duration, "3:32");
        assert_eq!(info.views, "1,400,000,000");
        assert_eq!(info.uploader, "Rick Astley");
        assert_eq!(info.upload_date, "20091025");
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let doc = json!({ "id": "abc123", "title": "Untitled" });
        let info = video_info_from_doc(&doc).unwrap();
        assert_eq!(info.duration, "0:00");
        assert_eq!(info.views, "N/A");
        assert_eq!(info.description, "");
        assert_eq!(info.uploader, "Unknown");
        assert_eq!(info.upload_date, "Unknown");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let doc = json!({ "id": "abc123", "description": "d".repeat(500) });
        let info = video_info_from_doc(&doc).unwrap();
        assert!(info.description.ends_with("..."));
        assert_eq!(info.description.chars().count(), 203);
    }

    #[test]
    fn playlist_type_is_rejected() {
        let doc = json!({ "_type": "playlist", "id": "PL123", "title": "A playlist" });
        assert_eq!(video_info_from_doc(&doc), Err(ExtractError::Playlist));
    }

    #[test]
    fn multi_entry_document_is_rejected() {
        let doc = json!({
            "id": "PL123",
            "entries": [ { "id": "a" }, { "id": "b" } ],
        });
        assert_eq!(video_info_from_doc(&doc), Err(ExtractError::Playlist));
    }
}
