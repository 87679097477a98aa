pub mod audio_fetcher;
pub mod captions;
pub mod chat_model;
pub mod transcriber;
