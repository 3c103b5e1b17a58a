use async_trait::async_trait;
use std::path::Path;

pub mod ytdlp;

pub use ytdlp::YtDlpDownloader;

/// Failure kinds surfaced by a download attempt.
///
/// yt-dlp's CLI reports failures as free text on stderr, so the network
/// kinds are recovered from substrings of that text; the substring checks
/// live in [`classify_stderr`] and nowhere else. Process-level I/O errors
/// (spawn or wait failures) are a separate path from yt-dlp-reported
/// failures and stay a separate variant.
#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    #[error("connection timed out")]
    ConnectionTimedOut,

    #[error("could not reach the server")]
    ServerUnreachable,

    #[error("connection too slow or reset")]
    SlowConnection,

    #[error("yt-dlp error: {0}")]
    Tool(String),

    #[error("failed to run yt-dlp: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// One-line human-readable explanation shown in place of the raw error
    pub fn user_hint(&self) -> String {
        match self {
            DownloadError::ConnectionTimedOut => {
                "Connection timed out. Check your internet connection or try again later.".to_string()
            }
            DownloadError::ServerUnreachable => {
                "Cannot connect to the platform's servers, try again later.".to_string()
            }
            DownloadError::SlowConnection => {
                "Connection is too slow. Try again later.".to_string()
            }
            DownloadError::Tool(msg) => format!("yt-dlp error: {}", msg),
            DownloadError::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                "Socket timeout. Your internet might be unstable.".to_string()
            }
            DownloadError::Io(e) => format!("Unknown error: {}", e),
        }
    }
}

/// Map yt-dlp's free-text stderr to a failure kind, case-insensitively
pub fn classify_stderr(stderr: &str) -> DownloadError {
    let msg = stderr.to_lowercase();

    if msg.contains("timed out") {
        DownloadError::ConnectionTimedOut
    } else if msg.contains("could not connect") || msg.contains("failed to resolve") {
        DownloadError::ServerUnreachable
    } else if msg.contains("slow") || msg.contains("connection reset") {
        DownloadError::SlowConnection
    } else {
        DownloadError::Tool(stderr.trim().to_string())
    }
}

/// Trait for performing a single download-and-transcode
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download the audio of `url` as an MP3 into `output_dir`.
    ///
    /// Blocks for the duration of the network transfer and transcode.
    async fn download(&self, url: &str, output_dir: &Path) -> Result<(), DownloadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_timeout_maps_to_connection_timed_out() {
        let err = classify_stderr("ERROR: [youtube] abc: The read operation timed out");
        assert!(matches!(err, DownloadError::ConnectionTimedOut));
    }

    #[test]
    fn stderr_unreachable_is_case_insensitive() {
        let err = classify_stderr("ERROR: Could Not Connect to host");
        assert!(matches!(err, DownloadError::ServerUnreachable));

        let err = classify_stderr("error: FAILED TO RESOLVE www.youtube.com");
        assert!(matches!(err, DownloadError::ServerUnreachable));
    }

    #[test]
    fn stderr_slow_or_reset_maps_to_slow_connection() {
        let err = classify_stderr("ERROR: download is too slow, aborting");
        assert!(matches!(err, DownloadError::SlowConnection));

        let err = classify_stderr("ERROR: Connection reset by peer");
        assert!(matches!(err, DownloadError::SlowConnection));
    }

    #[test]
    fn unrecognized_stderr_keeps_raw_text() {
        let err = classify_stderr("ERROR: Video unavailable\n");
        match err {
            DownloadError::Tool(msg) => assert_eq!(msg, "ERROR: Video unavailable"),
            other => panic!("expected Tool, got {:?}", other),
        }
    }

    #[test]
    fn io_timeout_hint_differs_from_download_timeout_hint() {
        let io = DownloadError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "socket timed out",
        ));
        let dl = DownloadError::ConnectionTimedOut;
        assert_ne!(io.user_hint(), dl.user_hint());
        assert!(io.user_hint().contains("unstable"));
    }

    #[test]
    fn hints_are_single_lines() {
        let errors = [
            DownloadError::ConnectionTimedOut,
            DownloadError::ServerUnreachable,
            DownloadError::SlowConnection,
            DownloadError::Tool("boom".to_string()),
        ];
        for err in errors {
            assert!(!err.user_hint().contains('\n'));
        }
    }
}
