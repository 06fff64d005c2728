//! Typed configuration.
//!
//! Loaded from a JSON5 file (default: the platform config dir), with
//! `VIDGRAB_*` environment variables overriding individual fields. A missing
//! file is not an error; everything has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: json5::Error },
}

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Bind address for the HTTP server.
    pub bind: String,

    /// Listen port.
    pub port: u16,

    /// Directory downloads are written into (created at startup if absent).
    pub download_dir: PathBuf,

    /// yt-dlp binary name or path.
    pub ytdlp_bin: String,

    /// Explicit ffmpeg location passed to yt-dlp; `$PATH` lookup when unset.
    pub ffmpeg_location: Option<String>,

    /// Per-request bound on download + transcode time.
    pub download_timeout_secs: u64,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            download_dir: PathBuf::from("downloads"),
            ytdlp_bin: "yt-dlp".to_string(),
            ffmpeg_location: None,
            download_timeout_secs: 600,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Default filter directive (overridable via `RUST_LOG`).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Default config file location (`<config dir>/vidgrab/config.json5`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vidgrab")
        .join("config.json5")
}

impl AppConfig {
    /// Load configuration: file (if present) then env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            Self::from_json5(&raw).map_err(|source| ConfigError::Parse { path, source })?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_json5(raw: &str) -> Result<Self, json5::Error> {
        json5::from_str(raw)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("VIDGRAB_BIND") {
            self.bind = v;
        }
        if let Ok(v) = std::env::var("VIDGRAB_PORT") {
            if let Ok(port) = v.parse() {
                self.port = port;
            }
        }
        if let Ok(v) = std::env::var("VIDGRAB_DOWNLOAD_DIR") {
            self.download_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("VIDGRAB_YTDLP_BIN") {
            self.ytdlp_bin = v;
        }
        if let Ok(v) = std::env::var("VIDGRAB_FFMPEG_LOCATION") {
            self.ffmpeg_location = Some(v);
        }
        if let Ok(v) = std::env::var("VIDGRAB_DOWNLOAD_TIMEOUT_SECS") {
            if let Ok(secs) = v.parse() {
                self.download_timeout_secs = secs;
            }
        }
        if let Ok(v) = std::env::var("VIDGRAB_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("VIDGRAB_LOG_FORMAT") {
            match v.to_ascii_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "text" => self.logging.format = LogFormat::Text,
                _ => {}
            }
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.listen_addr(), "127.0.0.1:5000");
        assert_eq!(config.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.ytdlp_bin, "yt-dlp");
        assert_eq!(config.download_timeout_secs, 600);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn parses_partial_json5() {
        let config = AppConfig::from_json5(
            r#"{
                // comments are allowed
                port: 8080,
                downloadDir: "/tmp/vids",
                logging: { format: "json" },
            }"#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/vids"));
        assert_eq!(config.logging.format, LogFormat::Json);
        // untouched fields keep their defaults
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.ytdlp_bin, "yt-dlp");
    }

    #[test]
    fn env_overrides_apply_on_load() {
        // No other test reads these variables, so the shared process
        // environment is safe to touch here.
        std::env::set_var("VIDGRAB_DOWNLOAD_TIMEOUT_SECS", "30");
        std::env::set_var("VIDGRAB_LOG_FORMAT", "json");
        let config = AppConfig::load(Some(Path::new("/nonexistent/vidgrab.json5")));
        std::env::remove_var("VIDGRAB_DOWNLOAD_TIMEOUT_SECS");
        std::env::remove_var("VIDGRAB_LOG_FORMAT");

        let config = config.unwrap();
        assert_eq!(config.download_timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn rejects_malformed_config() {
        assert!(AppConfig::from_json5("{ port: \"not a number\" }").is_err());
    }
}
