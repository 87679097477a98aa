use std::sync::{Arc, Mutex};

use clip_brief::{ChatMessage, ChatModel};

#[derive(Clone)]
pub struct MockChatModel {
    pub reply: String,
    pub calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    pub temperatures: Arc<Mutex<Vec<f32>>>,
    pub fail_with: Option<String>,
}

impl MockChatModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            temperatures: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            temperatures: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }

    /// Content of the user message of call `idx`.
    pub fn user_content(&self, idx: usize) -> String {
        let calls = self.calls.lock().unwrap();
        calls[idx]
            .iter()
            .rev()
            .map(|m| m.content.clone())
            .next()
            .unwrap_or_default()
    }
}

impl ChatModel for MockChatModel {
    const COMPLETION_MODEL: &'static str = "mock-gpt";

    type Error = anyhow::Error;

    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.temperatures.lock().unwrap().push(temperature);
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.reply.clone())
    }
}
