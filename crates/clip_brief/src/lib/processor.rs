pub mod builder;

use crate::{
    llm::{ChatModel, Transcriber},
    summarizer::ChunkedSummarizer,
    types::Brief,
    yt::{AudioFetcher, CaptionSource},
    Error, TranscriptResolver,
};

/// The end-to-end pipeline: resolve a transcript for a URL, then summarize
/// it into a [`Brief`]. One instance serves many requests; each request is
/// self-contained.
pub struct BriefProcessor<C, A, T, M>
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    pub(crate) resolver: TranscriptResolver<C, A, T>,
    pub(crate) summarizer: ChunkedSummarizer<M>,
}

impl<C, A, T, M> BriefProcessor<C, A, T, M>
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self))]
    pub async fn process(&self, url: &str, language: &str) -> Result<Brief, Error> {
        let transcript = self.resolver.extract(url).await?;
        tracing::info!(chars = transcript.chars().count(), "transcript resolved");

        let summary_lines = self.summarizer.summarize(&transcript, language).await?;
        if summary_lines.is_empty() {
            return Err(Error::SummarizationFailed(
                "model returned no usable summary lines".into(),
            ));
        }

        Ok(Brief {
            summary_lines,
            language: language.to_string(),
        })
    }
}
