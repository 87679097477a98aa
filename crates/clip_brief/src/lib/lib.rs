mod error;
pub mod http;
mod llm;
pub mod parser;
mod processor;
mod resolver;
pub mod summarizer;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::openai;
pub use llm::{ChatMessage, ChatModel, Role, Transcriber};
pub use processor::{builder::BriefProcessorBuilder, BriefProcessor};
pub use resolver::TranscriptResolver;
pub use summarizer::ChunkedSummarizer;
pub use types::Brief;
