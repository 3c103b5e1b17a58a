use once_cell::sync::Lazy;
use regex::Regex;

// Whole-string anchored on purpose: trailing whitespace or extra text after
// the URL must fail classification rather than be trimmed away.
static YOUTUBE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/[\w\-?=&#/]+$")
        .expect("invalid YouTube URL pattern")
});

static SOUNDCLOUD_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?soundcloud\.com/[\w\-?=&#/]+$")
        .expect("invalid SoundCloud URL pattern")
});

/// The platforms this tool recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    YouTube,
    SoundCloud,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "Youtube",
            Platform::SoundCloud => "Soundcloud",
        }
    }

    /// Check if a URL belongs to this platform
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Platform::YouTube => YOUTUBE_URL_PATTERN.is_match(url),
            Platform::SoundCloud => SOUNDCLOUD_URL_PATTERN.is_match(url),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a raw string as a YouTube URL, a SoundCloud URL, or neither
pub fn classify(url: &str) -> Option<Platform> {
    if Platform::YouTube.matches(url) {
        Some(Platform::YouTube)
    } else if Platform::SoundCloud.matches(url) {
        Some(Platform::SoundCloud)
    } else {
        None
    }
}
