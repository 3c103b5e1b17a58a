use async_trait::async_trait;
use chrono::Duration;
use indicatif::ProgressBar;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{classify_stderr, DownloadError, Downloader};
use crate::config::Config;
use crate::utils;
use crate::Result;

/// Metadata probed from a URL before downloading
#[derive(Debug, Clone)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub duration: Option<Duration>,
}

/// MP3 downloader delegating fetch and transcode to yt-dlp + ffmpeg
pub struct YtDlpDownloader {
    yt_dlp_path: String,
    ffmpeg_location: Option<PathBuf>,
    retries: u32,
    geo_bypass: bool,
    audio_quality: String,
}

impl YtDlpDownloader {
    pub fn new(config: &Config) -> Self {
        Self {
            yt_dlp_path: config.download.yt_dlp_path.clone(),
            ffmpeg_location: config.ffmpeg_location(),
            retries: config.download.retries,
            geo_bypass: config.download.geo_bypass,
            audio_quality: config.download.audio_quality.clone(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> Result<bool> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Ok(matches!(output, Ok(o) if o.status.success()))
    }

    /// Fetch title and duration for a URL without downloading anything.
    ///
    /// Used for the status line before a download starts; callers treat a
    /// probe failure as non-fatal since the download itself decides success.
    pub async fn probe(&self, url: &str) -> Result<TrackInfo> {
        tracing::debug!("Probing track info for: {}", url);

        let output = Command::new(&self.yt_dlp_path)
            .args(["--dump-json", "--no-playlist", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp probe failed: {}", error);
        }

        let json_str = String::from_utf8(output.stdout)?;
        let info: Value = serde_json::from_str(&json_str)?;

        let title = info["title"].as_str().map(|s| s.to_string());
        let duration = info["duration"].as_f64().map(|d| Duration::seconds(d as i64));

        Ok(TrackInfo { title, duration })
    }

    fn build_args(&self, url: &str, output_dir: &Path) -> Vec<String> {
        let output_template = output_dir.join("%(title)s.%(ext)s");

        let mut args = vec![
            // Best available audio stream
            "--format".to_string(),
            "bestaudio/best".to_string(),
            // Filename from the media title, native extension
            "--output".to_string(),
            output_template.to_string_lossy().into_owned(),
            // Only the linked item, never the surrounding playlist
            "--no-playlist".to_string(),
            "--retries".to_string(),
            self.retries.to_string(),
            // Extract and transcode to MP3
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "--audio-quality".to_string(),
            self.audio_quality.clone(),
            "--newline".to_string(),
        ];

        if self.geo_bypass {
            args.push("--geo-bypass".to_string());
        }

        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().into_owned());
        }

        args.push(url.to_string());
        args
    }

    /// Print what is about to be downloaded, probing for a title first.
    /// The probe failing never fails the download.
    async fn announce(&self, url: &str, output_dir: &Path) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Fetching track info...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        let probed = self.probe(url).await;
        spinner.finish_and_clear();

        match probed {
            Ok(info) => {
                let title = info
                    .title
                    .or_else(|| utils::extract_domain(url))
                    .unwrap_or_else(|| url.to_string());
                match info.duration {
                    Some(d) => println!(
                        "\nDownloading: {} ({})",
                        title,
                        utils::format_duration(d.num_seconds() as f64)
                    ),
                    None => println!("\nDownloading: {}", title),
                }
            }
            Err(e) => {
                tracing::debug!("Probe failed, continuing with download: {}", e);
                println!("\nDownloading from: {}", url);
            }
        }
        println!("Saving to: {}", output_dir.display());
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(&self, url: &str, output_dir: &Path) -> std::result::Result<(), DownloadError> {
        // Idempotent: creating an existing directory is not an error
        fs_err::create_dir_all(output_dir)?;

        self.announce(url, output_dir).await;

        let args = self.build_args(url, output_dir);
        tracing::debug!("Running {} {:?}", self.yt_dlp_path, args);

        // stdout inherited so yt-dlp's own progress output stays visible;
        // stderr captured for failure classification
        let child = Command::new(&self.yt_dlp_path)
            .args(&args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()?;

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("yt-dlp exited with {}: {}", output.status, stderr);
            return Err(classify_stderr(&stderr));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downloader() -> YtDlpDownloader {
        YtDlpDownloader::new(&Config::default())
    }

    #[test]
    fn args_carry_the_fixed_option_set() {
        let args = downloader().build_args("https://youtu.be/abc", Path::new("/tmp/out"));

        let has_pair = |flag: &str, value: &str| {
            args.windows(2).any(|w| w[0] == flag && w[1] == value)
        };

        assert!(has_pair("--format", "bestaudio/best"));
        assert!(has_pair("--retries", "2"));
        assert!(has_pair("--audio-format", "mp3"));
        assert!(has_pair("--audio-quality", "0"));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--extract-audio".to_string()));
        assert!(args.contains(&"--geo-bypass".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn output_template_uses_title_and_native_extension() {
        let args = downloader().build_args("https://youtu.be/abc", Path::new("/tmp/out"));
        let idx = args.iter().position(|a| a == "--output").unwrap();
        assert_eq!(args[idx + 1], "/tmp/out/%(title)s.%(ext)s");
    }

    #[test]
    fn geo_bypass_can_be_disabled() {
        let mut config = Config::default();
        config.download.geo_bypass = false;
        let args = YtDlpDownloader::new(&config).build_args("u", Path::new("/tmp"));
        assert!(!args.contains(&"--geo-bypass".to_string()));
    }

    // `true` exits 0 and ignores its arguments, standing in for yt-dlp
    fn noop_downloader() -> YtDlpDownloader {
        let mut config = Config::default();
        config.download.yt_dlp_path = "true".to_string();
        YtDlpDownloader::new(&config)
    }

    #[tokio::test]
    async fn repeated_downloads_tolerate_existing_output_dir() {
        let dl = noop_downloader();
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("output");

        dl.download("https://youtu.be/abc", &dir).await.unwrap();
        // Second invocation must not error on the already-present directory
        dl.download("https://youtu.be/abc", &dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn check_availability_reflects_the_configured_binary() {
        assert!(noop_downloader().check_availability().await.unwrap());

        let mut config = Config::default();
        config.download.yt_dlp_path = "/nonexistent/yt-dlp-for-test".to_string();
        let dl = YtDlpDownloader::new(&config);
        assert!(!dl.check_availability().await.unwrap());
    }

    #[tokio::test]
    async fn download_surfaces_spawn_failure_as_io() {
        let mut config = Config::default();
        config.download.yt_dlp_path = "/nonexistent/yt-dlp-for-test".to_string();
        let dl = YtDlpDownloader::new(&config);

        let tmp = tempfile::tempdir().unwrap();
        let err = dl
            .download("https://youtu.be/abc", tmp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Io(_)));
    }
}
