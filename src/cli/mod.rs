use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt2mp3",
    about = "Download audio as MP3 from YouTube and SoundCloud",
    version,
    long_about = "A CLI tool that validates YouTube and SoundCloud URLs and downloads \
their audio as MP3 files using yt-dlp and ffmpeg. Run without a subcommand for the \
interactive prompt loop."
)]
pub struct Cli {
    /// Run a subcommand instead of the interactive loop
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a single URL and exit
    Download {
        /// YouTube or SoundCloud URL
        #[arg(value_name = "URL")]
        url: String,

        /// Output directory (defaults to the configured one)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show or locate the configuration
    Config {
        /// Show current configuration values
        #[arg(short, long)]
        show: bool,
    },

    /// List supported platforms
    Platforms,
}
