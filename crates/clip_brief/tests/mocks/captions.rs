use std::sync::{Arc, Mutex};

use clip_brief::yt::{CaptionError, CaptionSource};

type CaptionCall = (String, Vec<String>);

#[derive(Clone)]
pub struct MockCaptionSource {
    pub direct: Result<String, CaptionError>,
    pub generated: Result<String, CaptionError>,
    pub direct_calls: Arc<Mutex<Vec<CaptionCall>>>,
    pub generated_calls: Arc<Mutex<Vec<CaptionCall>>>,
}

impl MockCaptionSource {
    pub fn new(
        direct: Result<String, CaptionError>,
        generated: Result<String, CaptionError>,
    ) -> Self {
        Self {
            direct,
            generated,
            direct_calls: Arc::new(Mutex::new(Vec::new())),
            generated_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_direct(text: &str) -> Self {
        Self::new(Ok(text.to_string()), Err(CaptionError::NotFound))
    }

    pub fn unavailable() -> Self {
        Self::new(
            Err(CaptionError::VideoUnavailable),
            Err(CaptionError::VideoUnavailable),
        )
    }
}

impl CaptionSource for MockCaptionSource {
    async fn fetch_captions(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<String, CaptionError> {
        self.direct_calls.lock().unwrap().push((
            video_id.to_string(),
            languages.iter().map(|l| l.to_string()).collect(),
        ));
        self.direct.clone()
    }

    async fn fetch_generated_captions(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<String, CaptionError> {
        self.generated_calls.lock().unwrap().push((
            video_id.to_string(),
            languages.iter().map(|l| l.to_string()).collect(),
        ));
        self.generated.clone()
    }
}
