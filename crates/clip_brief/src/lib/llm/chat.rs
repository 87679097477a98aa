use std::{fmt::Debug, future::Future};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Capability seam for completion calls: given role-tagged messages, return
/// generated text. Keeps the summarizer testable against a fake model.
pub trait ChatModel {
    const COMPLETION_MODEL: &'static str;

    type Error: Debug + std::fmt::Display;

    fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
