//! # Transcript resolution
//!
//! Ordered fallback chain: direct captions, auto-generated captions, then
//! audio download plus speech-to-text. Each stage either yields non-empty
//! text (done) or hands over to the next; only the exhausted chain surfaces
//! an error. Caption failures are deliberately lenient — an unavailable
//! video and an unexpected caption-service error both just mean "no
//! captions here", and the audio path gets its turn.

use crate::{
    llm::Transcriber,
    parser::VideoRef,
    yt::{AudioFetcher, CaptionError, CaptionSource},
    Error,
};

/// Preferred caption language order for the direct path.
pub const DEFAULT_CAPTION_LANGUAGES: [&str; 2] = ["ko", "en"];

/// Language order for the auto-generated fallback.
const GENERATED_CAPTION_LANGUAGES: [&str; 1] = ["en"];

pub struct TranscriptResolver<C, A, T> {
    captions: C,
    audio_fetcher: A,
    transcriber: T,
    caption_languages: Vec<String>,
}

impl<C, A, T> TranscriptResolver<C, A, T>
where
    C: CaptionSource + Send + Sync,
    A: AudioFetcher + Send + Sync,
    T: Transcriber + Send + Sync,
{
    pub fn new(captions: C, audio_fetcher: A, transcriber: T) -> Self {
        TranscriptResolver {
            captions,
            audio_fetcher,
            transcriber,
            caption_languages: DEFAULT_CAPTION_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_caption_languages(mut self, languages: Vec<String>) -> Self {
        self.caption_languages = languages;
        self
    }

    /// Resolves transcript text for `url`, stopping at the first acquisition
    /// method that yields non-empty text.
    #[tracing::instrument(skip(self))]
    pub async fn extract(&self, url: &str) -> Result<String, Error> {
        let video_ref = VideoRef::parse(url);
        if video_ref.is_plausible() {
            if let Some(text) = self.captions_text(&video_ref).await {
                if !text.trim().is_empty() {
                    tracing::info!(video_ref = %video_ref, "resolved transcript from captions");
                    return Ok(text);
                }
            }
        } else {
            tracing::debug!(video_ref = %video_ref, "implausible video reference, skipping captions");
        }

        self.transcribe_audio(url).await
    }

    /// Caption stages. Returns `None` for every failure mode: the audio
    /// fallback is the one that decides whether the request dies.
    async fn captions_text(&self, video_ref: &VideoRef) -> Option<String> {
        let languages: Vec<&str> = self.caption_languages.iter().map(String::as_str).collect();
        match self.captions.fetch_captions(video_ref, &languages).await {
            Ok(text) => Some(text),
            Err(CaptionError::Disabled) | Err(CaptionError::NotFound) => {
                match self
                    .captions
                    .fetch_generated_captions(video_ref, &GENERATED_CAPTION_LANGUAGES)
                    .await
                {
                    Ok(text) => Some(text),
                    Err(e) => {
                        tracing::debug!(error = %e, "generated caption fallback failed");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "caption retrieval failed");
                None
            }
        }
    }

    /// Audio fallback: download into a request-local scratch directory,
    /// transcribe, and always remove the directory when the guard drops.
    async fn transcribe_audio(&self, url: &str) -> Result<String, Error> {
        let scratch = tempfile::Builder::new().prefix("yt_audio_").tempdir()?;

        let audio_path = self
            .audio_fetcher
            .fetch_audio(url, scratch.path())
            .await
            .map_err(|e| {
                Error::TranscriptUnavailable(format!(
                    "audio download failed; check network, URL and ffmpeg availability: {e}"
                ))
            })?;

        tracing::info!(audio = %audio_path.display(), "transcribing downloaded audio");
        let text = self
            .transcriber
            .transcribe(&audio_path)
            .await
            .map_err(|e| Error::Transcription(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(Error::TranscriptUnavailable(
                "transcription returned empty text".into(),
            ));
        }
        Ok(text)
    }
}
