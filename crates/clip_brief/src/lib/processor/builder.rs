use crate::{
    llm::{ChatModel, Transcriber},
    resolver::DEFAULT_CAPTION_LANGUAGES,
    summarizer::ChunkedSummarizer,
    yt::{AudioFetcher, CaptionSource},
    BriefProcessor, TranscriptResolver,
};

/// Typestate builder for [`BriefProcessor`]: `build` only exists once all
/// four collaborators are supplied, so a half-wired processor cannot be
/// constructed.
pub struct BriefProcessorBuilder<C = (), A = (), T = (), M = ()> {
    captions: C,
    audio_fetcher: A,
    transcriber: T,
    chat_model: M,
    caption_languages: Vec<String>,
}

impl BriefProcessorBuilder {
    pub fn new() -> Self {
        Self {
            captions: (),
            audio_fetcher: (),
            transcriber: (),
            chat_model: (),
            caption_languages: DEFAULT_CAPTION_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for BriefProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, A, T, M> BriefProcessorBuilder<C, A, T, M> {
    pub fn captions<C2: CaptionSource + Send + Sync + 'static>(
        self,
        captions: C2,
    ) -> BriefProcessorBuilder<C2, A, T, M> {
        BriefProcessorBuilder {
            captions,
            audio_fetcher: self.audio_fetcher,
            transcriber: self.transcriber,
            chat_model: self.chat_model,
            caption_languages: self.caption_languages,
        }
    }

    pub fn audio_fetcher<A2: AudioFetcher + Send + Sync + 'static>(
        self,
        audio_fetcher: A2,
    ) -> BriefProcessorBuilder<C, A2, T, M> {
        BriefProcessorBuilder {
            captions: self.captions,
            audio_fetcher,
            transcriber: self.transcriber,
            chat_model: self.chat_model,
            caption_languages: self.caption_languages,
        }
    }

    pub fn transcriber<T2: Transcriber + Send + Sync + 'static>(
        self,
        transcriber: T2,
    ) -> BriefProcessorBuilder<C, A, T2, M> {
        BriefProcessorBuilder {
            captions: self.captions,
            audio_fetcher: self.audio_fetcher,
            transcriber,
            chat_model: self.chat_model,
            caption_languages: self.caption_languages,
        }
    }

    pub fn chat_model<M2: ChatModel + Send + Sync + 'static>(
        self,
        chat_model: M2,
    ) -> BriefProcessorBuilder<C, A, T, M2> {
        BriefProcessorBuilder {
            captions: self.captions,
            audio_fetcher: self.audio_fetcher,
            transcriber: self.transcriber,
            chat_model,
            caption_languages: self.caption_languages,
        }
    }

    pub fn caption_languages(mut self, languages: Vec<String>) -> Self {
        self.caption_languages = languages;
        self
    }
}

impl<C, A, T, M> BriefProcessorBuilder<C, A, T, M>
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    pub fn build(self) -> BriefProcessor<C, A, T, M> {
        BriefProcessor {
            resolver: TranscriptResolver::new(self.captions, self.audio_fetcher, self.transcriber)
                .with_caption_languages(self.caption_languages),
            summarizer: ChunkedSummarizer::new(self.chat_model),
        }
    }
}
