use std::path::Path;

use reqwest::Client;
use serde::Deserialize;

use crate::{ChatMessage, ChatModel, Transcriber};

/// Client for the OpenAI audio-transcription and chat-completion endpoints.
///
/// Both collaborator seams ([`Transcriber`] and [`ChatModel`]) are served by
/// the same client, so the binary constructs it once and clones it.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub async fn send_transcribe_request(
        &self,
        audio_path: &Path,
        model_name: &str,
    ) -> Result<TranscriptionResponse, OpenAIError> {
        let bytes = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".into());
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(audio_path))?;

        let form = reqwest::multipart::Form::new()
            .text("model", model_name.to_string())
            .part("file", part);

        let resp = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<TranscriptionResponse>().await?)
    }

    pub async fn send_completion_request(
        &self,
        model_name: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<CompletionResponse, OpenAIError> {
        let body = serde_json::json!({
            "model": model_name,
            "messages": messages,
            "temperature": temperature,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OpenAIError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl Transcriber for OpenAIClient {
    const TRANSCRIPTION_MODEL: &'static str = "gpt-4o-mini-transcribe";

    type Error = OpenAIError;

    async fn transcribe(&self, audio_path: &Path) -> Result<String, Self::Error> {
        let response = self
            .send_transcribe_request(audio_path, Self::TRANSCRIPTION_MODEL)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to transcribe audio"))?;

        Ok(response.text)
    }
}

impl ChatModel for OpenAIClient {
    const COMPLETION_MODEL: &'static str = "gpt-4o-mini";

    type Error = OpenAIError;

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, Self::Error> {
        let response = self
            .send_completion_request(Self::COMPLETION_MODEL, messages, temperature)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate completion"))?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| OpenAIError::Api {
                status: 0,
                message: "No content in response".into(),
            })?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_for_known_extensions() {
        assert_eq!(mime_for(Path::new("a/clip.m4a")), "audio/mp4");
        assert_eq!(mime_for(Path::new("clip.webm")), "audio/webm");
        assert_eq!(mime_for(Path::new("clip.mp3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("clip.unknown")), "application/octet-stream");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn completion_response_deserializes() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "- line"}, "finish_reason": "stop"}
            ]
        }"#;
        let resp: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("- line"));
    }

    #[test]
    fn chat_message_serializes_with_lowercase_role() {
        let msg = ChatMessage::system("hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "hello");
    }
}
