use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clip_brief::Transcriber;

#[derive(Clone)]
pub struct MockTranscriber {
    pub response_text: String,
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_with: Option<String>,
}

impl MockTranscriber {
    pub fn new(response_text: &str) -> Self {
        Self {
            response_text: response_text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            response_text: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Transcriber for MockTranscriber {
    const TRANSCRIPTION_MODEL: &'static str = "mock-transcribe";

    type Error = anyhow::Error;

    async fn transcribe(&self, audio_path: &Path) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(audio_path.to_path_buf());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.response_text.clone())
    }
}
