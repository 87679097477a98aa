pub mod audio_fetcher;
pub mod captions;

use std::{
    fmt::{Debug, Display},
    future::Future,
    path::{Path, PathBuf},
};

/// Signals from the caption service the resolver cares about. `Disabled` and
/// `NotFound` trigger the generated-caption fallback; everything else means
/// "no captions, move on".
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptionError {
    #[error("captions are disabled for this video")]
    Disabled,
    #[error("no caption track matched the requested languages")]
    NotFound,
    #[error("video is unavailable")]
    VideoUnavailable,
    #[error("caption retrieval failed: {0}")]
    Other(String),
}

/// Retrieves pre-existing caption text for a video, without touching media.
pub trait CaptionSource {
    /// Fetches caption text in the first available of `languages`, preferring
    /// human-authored tracks over auto-generated ones.
    fn fetch_captions(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> impl Future<Output = Result<String, CaptionError>> + Send;

    /// Fetches an auto-generated caption track only.
    fn fetch_generated_captions(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> impl Future<Output = Result<String, CaptionError>> + Send;
}

/// Downloads the best available audio stream for a URL into `dest_dir` and
/// returns the path of the downloaded file.
pub trait AudioFetcher {
    type Error: Debug + Display;

    fn fetch_audio(
        &self,
        url: &str,
        dest_dir: &Path,
    ) -> impl Future<Output = Result<PathBuf, Self::Error>> + Send;
}
