//! # Video reference parsing
//!
//! Extracts the 11-character video token from the URL shapes we recognize
//! (`v=ID`, `youtu.be/ID`, `youtube.com/watch?v=ID`). Anything else falls
//! back to the last path segment truncated to 11 characters, which keeps
//! caption lookup best-effort instead of rejecting unusual share links.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;

static VIDEO_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|youtu\.be/|youtube\.com/watch\?v=)([\w-]{11})").unwrap()
});

/// An opaque video identifier extracted from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef(String);

impl VideoRef {
    /// References shorter than this are too mangled to hand to the caption
    /// service; the resolver goes straight to the audio fallback.
    pub const MIN_PLAUSIBLE_LEN: usize = 5;

    pub fn parse(url: &str) -> Self {
        if let Some(id) = VIDEO_REF_RE.captures(url).and_then(|cap| cap.get(1)) {
            return VideoRef(id.as_str().to_string());
        }
        let candidate = url.trim().rsplit('/').next().unwrap_or_default();
        VideoRef(candidate.chars().take(11).collect())
    }

    pub fn is_plausible(&self) -> bool {
        self.0.chars().count() >= Self::MIN_PLAUSIBLE_LEN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for VideoRef {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for VideoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
