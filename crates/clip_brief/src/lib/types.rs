use serde::{Deserialize, Serialize};

/// Default summary language when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "ko";

/// Incoming summarize request.
#[derive(Debug, Clone, Deserialize)]
pub struct BriefRequest {
    pub url: String,
    pub language: Option<String>,
}

/// The pipeline's sole output artifact: at most five cleaned summary lines
/// plus the language they were written in.
#[derive(Debug, Clone, Serialize)]
pub struct Brief {
    pub summary_lines: Vec<String>,
    pub language: String,
}
