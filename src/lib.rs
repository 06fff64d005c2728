//! vidgrab service library
//!
//! HTTP service that resolves YouTube URLs to metadata and drives yt-dlp
//! (plus ffmpeg for audio extraction) to download media into a local
//! directory, streaming the result back to the caller as an attachment.

pub mod cli;
pub mod config;
pub mod extractor;
pub mod filename;
pub mod logging;
pub mod server;
pub mod store;
pub mod urls;
