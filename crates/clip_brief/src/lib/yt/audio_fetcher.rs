use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use ytdlp_exec::{YtDlp, YtDlpError};

use crate::yt::AudioFetcher;

/// Production [`AudioFetcher`] backed by the `yt-dlp` executable.
pub struct YtDlpWrapper(pub YtDlp);

impl YtDlpWrapper {
    pub fn new(ytdlp: YtDlp) -> Self {
        YtDlpWrapper(ytdlp)
    }
}

impl Deref for YtDlpWrapper {
    type Target = YtDlp;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AudioFetcher for YtDlpWrapper {
    type Error = YtDlpError;

    async fn fetch_audio(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, Self::Error> {
        self.download_audio(url, dest_dir)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to download audio"))
    }
}
