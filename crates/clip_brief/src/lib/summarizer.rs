//! # Chunked summarization
//!
//! Turns transcript text into at most five cleaned bullet lines. Short
//! transcripts go through a single completion call; anything above
//! [`MAX_DIRECT_CHARS`] is split into fixed-size chunks, each chunk reduced
//! to factual notes, and the concatenated notes synthesized into the final
//! lines (map-reduce). Chunk calls are strictly sequential: the synthesis
//! step needs every note, and the chunk index is only used for progress
//! logging.

use crate::{ChatMessage, ChatModel, Error};

/// Transcripts at or below this many characters are summarized in one call.
pub const MAX_DIRECT_CHARS: usize = 12_000;

/// Chunk length, in characters, for the map phase. The final chunk is
/// whatever remains.
pub const CHUNK_CHARS: usize = 3_500;

/// Hard cap on returned summary lines.
pub const MAX_SUMMARY_LINES: usize = 5;

const COMPLETION_TEMPERATURE: f32 = 0.1;

const DIRECT_SYSTEM_PROMPT: &str = include_str!("./summarizer/prompts/direct_system.txt");
const EXTRACT_SYSTEM_PROMPT: &str = include_str!("./summarizer/prompts/extract_system.txt");
const SYNTHESIZE_SYSTEM_PROMPT: &str = include_str!("./summarizer/prompts/synthesize_system.txt");

pub struct ChunkedSummarizer<M> {
    model: M,
}

impl<M> ChunkedSummarizer<M>
where
    M: ChatModel + Send + Sync,
{
    pub fn new(model: M) -> Self {
        ChunkedSummarizer { model }
    }

    /// Summarizes `transcript` into at most five bullet lines in `language`.
    ///
    /// Returns `Ok` with an empty vector when the model answered but yielded
    /// no usable lines; the caller decides whether that is an error.
    #[tracing::instrument(skip(self, transcript), fields(chars = transcript.chars().count()))]
    pub async fn summarize(&self, transcript: &str, language: &str) -> Result<Vec<String>, Error> {
        let clean = normalize_transcript(transcript);
        if clean.trim().is_empty() {
            return Err(Error::SummarizationFailed(
                "transcript is empty after normalization".into(),
            ));
        }

        if clean.chars().count() <= MAX_DIRECT_CHARS {
            let text = self
                .complete(&[
                    ChatMessage::system(DIRECT_SYSTEM_PROMPT),
                    ChatMessage::user(format!(
                        "Language: {language}. {}\nTranscript:\n{clean}",
                        line_instruction(language)
                    )),
                ])
                .await?;
            return Ok(parse_bullet_lines(&text));
        }

        // Map: reduce each chunk to factual notes, in order.
        let chunks = chunk_by_chars(&clean, CHUNK_CHARS);
        let total = chunks.len();
        let mut chunk_notes = Vec::with_capacity(total);
        for (idx, chunk) in chunks.iter().enumerate() {
            tracing::debug!(segment = idx + 1, total, "extracting key points");
            let notes = self
                .complete(&[
                    ChatMessage::system(EXTRACT_SYSTEM_PROMPT),
                    ChatMessage::user(format!(
                        "Language: {language}. From this transcript segment, list key facts as \
                         dash bullets, no fluff.\nSegment {}/{}:\n{}",
                        idx + 1,
                        total,
                        chunk
                    )),
                ])
                .await?;
            chunk_notes.push(notes.trim().to_string());
        }

        // Reduce: synthesize the final lines from the combined notes.
        let joined_notes = chunk_notes.join("\n");
        let text = self
            .complete(&[
                ChatMessage::system(SYNTHESIZE_SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "Language: {language}. {}\nKey facts collected from segments:\n{joined_notes}",
                    line_instruction(language)
                )),
            ])
            .await?;
        Ok(parse_bullet_lines(&text))
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, Error> {
        self.model
            .complete(messages, COMPLETION_TEMPERATURE)
            .await
            .map_err(|e| Error::SummarizationFailed(e.to_string()))
    }
}

fn line_instruction(language: &str) -> String {
    format!(
        "You are a helpful assistant. Given a video transcript, write exactly 5 bullet lines \
         summary in {language}. Each line must be concise, factual, and under 24 Korean \
         characters (or 18 English words). Include the most useful insights \
         (who/what/why/how/results), numbers, and concrete takeaways. Avoid generic phrasing, \
         avoid timestamps/speakers, no extra lines."
    )
}

/// Collapses carriage returns and line feeds to spaces.
pub fn normalize_transcript(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Splits `text` into contiguous chunks of `size` characters; the final chunk
/// holds the remainder. Boundaries are character-based, never byte-based.
pub fn chunk_by_chars(text: &str, size: usize) -> Vec<&str> {
    assert!(size > 0, "chunk size must be positive");
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Splits a model response into cleaned bullet lines: bullet punctuation and
/// surrounding whitespace stripped, empty lines dropped, truncated to
/// [`MAX_SUMMARY_LINES`].
pub fn parse_bullet_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_matches(&['-', '•', '\t', ' '][..]).to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUMMARY_LINES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_line_breaks() {
        let normalized = normalize_transcript("one\r\ntwo\nthree\rfour");
        assert_eq!(normalized, "one  two three four");
        assert!(!normalized.contains('\n'));
        assert!(!normalized.contains('\r'));
    }

    #[test]
    fn test_chunk_by_chars_exact_and_remainder() {
        let chunks = chunk_by_chars("abcdef", 2);
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);

        let chunks = chunk_by_chars("abcdefg", 3);
        assert_eq!(chunks, vec!["abc", "def", "g"]);

        let chunks = chunk_by_chars("ab", 10);
        assert_eq!(chunks, vec!["ab"]);
    }

    #[test]
    fn test_chunk_by_chars_counts_characters_not_bytes() {
        let text = "가나다라마바";
        let chunks = chunk_by_chars(text, 4);
        assert_eq!(chunks, vec!["가나다라", "마바"]);
    }

    #[test]
    fn test_chunk_sizes_for_8000_chars() {
        let text = "x".repeat(8_000);
        let chunks = chunk_by_chars(&text, CHUNK_CHARS);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(sizes, vec![3_500, 3_500, 1_000]);
    }

    #[test]
    fn test_parse_bullet_lines_strips_markers() {
        let lines = parse_bullet_lines("- first point\n• second point\n\t- third point  \n");
        assert_eq!(lines, vec!["first point", "second point", "third point"]);
    }

    #[test]
    fn test_parse_bullet_lines_drops_empty_before_truncating() {
        // A bullet-only line strips down to nothing and must not consume one
        // of the five output slots.
        let text = "- \n- a\n\n- b\n- c\n- d\n- e\n- f";
        let lines = parse_bullet_lines(text);
        assert_eq!(lines, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_parse_bullet_lines_caps_at_five() {
        let text = (1..=9).map(|i| format!("- line {i}")).collect::<Vec<_>>().join("\n");
        let lines = parse_bullet_lines(&text);
        assert_eq!(lines.len(), MAX_SUMMARY_LINES);
        assert_eq!(lines[0], "line 1");
        assert_eq!(lines[4], "line 5");
    }
}
