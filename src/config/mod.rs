use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// yt-dlp invocation settings
    pub download: DownloadConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Path or command name of the yt-dlp binary
    pub yt_dlp_path: String,

    /// Directory containing the ffmpeg binaries (auto-detected if not set)
    pub ffmpeg_location: Option<PathBuf>,

    /// Retry count forwarded to yt-dlp (not retried by this program)
    pub retries: u32,

    /// Bypass geographic restrictions via faked headers
    pub geo_bypass: bool,

    /// ffmpeg VBR quality for the MP3 extraction, "0" is best
    pub audio_quality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where downloaded MP3s are written (defaults to <install_dir>/output)
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download: DownloadConfig {
                yt_dlp_path: "yt-dlp".to_string(),
                ffmpeg_location: None,
                retries: 2,
                geo_bypass: true,
                audio_quality: "0".to_string(),
            },
            app: AppConfig { output_dir: None },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt2mp3").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.download.yt_dlp_path.trim().is_empty() {
            anyhow::bail!("yt-dlp path must not be empty");
        }

        Ok(())
    }

    /// Resolve the output directory, falling back to <install_dir>/output
    pub fn output_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.app.output_dir {
            return Ok(dir.clone());
        }

        Ok(Self::install_dir()?.join("output"))
    }

    /// Resolve the ffmpeg location: configured value, or the bundled layout
    /// <install_dir>/ffmpeg/tools/ffmpeg/bin when it exists, else rely on PATH
    pub fn ffmpeg_location(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.download.ffmpeg_location {
            return Some(dir.clone());
        }

        let bundled = Self::install_dir()
            .ok()?
            .join("ffmpeg")
            .join("tools")
            .join("ffmpeg")
            .join("bin");

        bundled.exists().then_some(bundled)
    }

    fn install_dir() -> Result<PathBuf> {
        let exe = std::env::current_exe()
            .context("Could not determine program location")?;

        exe.parent()
            .map(|p| p.to_path_buf())
            .context("Program location has no parent directory")
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  yt-dlp: {}", self.download.yt_dlp_path);
        match self.ffmpeg_location() {
            Some(dir) => println!("  ffmpeg location: {}", dir.display()),
            None => println!("  ffmpeg location: (from PATH)"),
        }
        println!("  Retries: {}", self.download.retries);
        println!("  Geo bypass: {}", self.download.geo_bypass);
        println!("  Audio quality: {}", self.download.audio_quality);
        match self.output_dir() {
            Ok(dir) => println!("  Output directory: {}", dir.display()),
            Err(_) => println!("  Output directory: (unresolved)"),
        }
    }
}
