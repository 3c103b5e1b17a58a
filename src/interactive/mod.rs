use console::style;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::downloader::Downloader;
use crate::platform::Platform;
use crate::Result;

/// The interactive prompt loop.
///
/// Two nested states: platform selection, then URL entry bound to the chosen
/// platform. `exit` terminates from either level, `back` returns to platform
/// selection, and a downloaded (or failed) URL leaves the user at the URL
/// prompt so another link for the same platform can be pasted. End of input
/// is treated like `exit`.
pub struct InteractiveLoop<'a, D: Downloader + ?Sized> {
    downloader: &'a D,
    output_dir: PathBuf,
}

impl<'a, D: Downloader + ?Sized> InteractiveLoop<'a, D> {
    pub fn new(downloader: &'a D, output_dir: PathBuf) -> Self {
        Self {
            downloader,
            output_dir,
        }
    }

    pub async fn run<R>(&self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            println!("Select platform to download:");
            println!("1. Youtube");
            println!("2. Soundcloud");
            println!("Type 'exit' to quit.");
            prompt("Enter your choice: ")?;

            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            let choice = line.trim().to_lowercase();

            if choice == "exit" {
                println!("Exiting...");
                return Ok(());
            }

            let platform = match choice.as_str() {
                "1" => Platform::YouTube,
                "2" => Platform::SoundCloud,
                _ => {
                    println!("Invalid choice\n");
                    continue;
                }
            };

            loop {
                prompt("Paste the URL (or type 'back' to reselect platform, 'exit' to quit): ")?;

                let Some(line) = lines.next_line().await? else {
                    return Ok(());
                };
                let url = line.trim();

                if url.eq_ignore_ascii_case("exit") {
                    println!("Exiting...");
                    return Ok(());
                }
                if url.eq_ignore_ascii_case("back") {
                    println!("Returning to platform selection...\n");
                    break;
                }
                if url.is_empty() {
                    println!("Enter a URL.\n");
                    continue;
                }

                if !platform.matches(url) {
                    println!("{}", style(format!("Invalid {} URL.", platform)).red());
                    continue;
                }

                // Blocks until the download and transcode finish; failures
                // are reported and the URL prompt comes back
                match self.downloader.download(url, &self.output_dir).await {
                    Ok(()) => println!("{}\n", style("Download complete!").green()),
                    Err(e) => println!("{}\n", style(e.user_hint()).red()),
                }
            }
        }
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}
