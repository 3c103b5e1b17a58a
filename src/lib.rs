//! yt2mp3 - A Rust CLI tool for downloading audio as MP3
//!
//! This library provides functionality to validate YouTube and SoundCloud URLs
//! and download their audio as MP3 files by delegating to yt-dlp and ffmpeg.

pub mod cli;
pub mod config;
pub mod downloader;
pub mod interactive;
pub mod platform;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use downloader::{DownloadError, Downloader, YtDlpDownloader};
pub use platform::Platform;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
