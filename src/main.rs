use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt2mp3::cli::{Cli, Commands};
use yt2mp3::config::Config;
use yt2mp3::downloader::{Downloader, YtDlpDownloader};
use yt2mp3::interactive::InteractiveLoop;
use yt2mp3::{platform, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt2mp3=debug"
    } else {
        "yt2mp3=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().await?;
    let downloader = YtDlpDownloader::new(&config);

    // Check for required external dependencies (non-fatal, tools may still resolve)
    let mut missing_deps = Vec::new();
    if !downloader.check_availability().await? {
        missing_deps.push(format!(
            "yt-dlp ('{}') - required for downloading from YouTube and SoundCloud",
            config.download.yt_dlp_path
        ));
    }
    if config.ffmpeg_location().is_none() && !utils::check_command_available("ffmpeg").await {
        missing_deps.push("ffmpeg - required for extracting audio as MP3".to_string());
    }
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    match cli.command {
        None => {
            let output_dir = config.output_dir()?;
            let session = InteractiveLoop::new(&downloader, output_dir);
            session.run(BufReader::new(tokio::io::stdin())).await?;
        }
        Some(Commands::Download { url, output }) => {
            let Some(platform) = platform::classify(&url) else {
                anyhow::bail!(
                    "Unsupported URL (expected a YouTube or SoundCloud link): {}",
                    url
                );
            };
            tracing::info!("Starting {} download for URL: {}", platform, url);

            let output_dir = match output {
                Some(dir) => dir,
                None => config.output_dir()?,
            };

            if let Err(e) = downloader.download(&url, &output_dir).await {
                return Err(anyhow::anyhow!(e.user_hint()));
            }
            println!("Download complete!");
        }
        Some(Commands::Config { show }) => {
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                println!("  {}", Config::config_path()?.display());
            }
        }
        Some(Commands::Platforms) => {
            println!("Supported platforms:");
            println!("  • YouTube (youtube.com, youtu.be)");
            println!("  • SoundCloud (soundcloud.com)");
        }
    }

    Ok(())
}
