use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clip_brief::yt::AudioFetcher;

/// Records every destination directory it is handed; on success it drops a
/// fake audio file there, the way yt-dlp would.
#[derive(Clone, Default)]
pub struct MockAudioFetcher {
    pub fail_with: Option<String>,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockAudioFetcher {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl AudioFetcher for MockAudioFetcher {
    type Error = anyhow::Error;

    async fn fetch_audio(&self, _url: &str, dest_dir: &Path) -> Result<PathBuf, Self::Error> {
        self.calls.lock().unwrap().push(dest_dir.to_path_buf());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        let path = dest_dir.join("audio.m4a");
        std::fs::write(&path, b"mock audio")?;
        Ok(path)
    }
}
