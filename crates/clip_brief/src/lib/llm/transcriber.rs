use std::{fmt::Debug, future::Future, path::Path};

/// Capability seam for speech-to-text: given an audio file on disk, return
/// the transcribed text.
pub trait Transcriber {
    const TRANSCRIPTION_MODEL: &'static str;

    type Error: Debug + std::fmt::Display;

    fn transcribe(
        &self,
        audio_path: &Path,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
