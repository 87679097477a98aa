/// Failures the pipeline can surface to its boundary.
///
/// Caption-retrieval problems never show up here: the resolver swallows them
/// and moves on to the next acquisition method. Only exhausted fallbacks,
/// missing configuration and model-call failures propagate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No acquisition method produced non-empty transcript text. The message
    /// names the stage that failed and carries any captured diagnostics.
    #[error("transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    /// The speech-to-text call itself failed.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// The completion call failed or yielded no usable summary lines.
    #[error("summarization failed: {0}")]
    SummarizationFailed(String),

    /// A required environment variable is absent.
    #[error("required configuration missing: {0}")]
    ConfigurationMissing(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
