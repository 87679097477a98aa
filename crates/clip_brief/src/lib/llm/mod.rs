pub mod chat;
pub mod openai;
pub mod transcriber;

pub use chat::{ChatMessage, ChatModel, Role};
pub use transcriber::Transcriber;
