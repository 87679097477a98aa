//! # HTTP boundary
//!
//! Thin plumbing over [`BriefProcessor`]: one summarize operation, a health
//! check, permissive CORS. Failure classification: bad input / not found
//! maps to 400, upstream generation failure to 502, everything else to 500.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    llm::{ChatModel, Transcriber},
    types::{Brief, BriefRequest, DEFAULT_LANGUAGE},
    yt::{AudioFetcher, CaptionSource},
    BriefProcessor, Error,
};

pub struct AppState<C, A, T, M>
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    pub processor: BriefProcessor<C, A, T, M>,
}

impl<C, A, T, M> AppState<C, A, T, M>
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    pub fn new(processor: BriefProcessor<C, A, T, M>) -> Self {
        AppState { processor }
    }
}

pub fn create_router<C, A, T, M>(state: Arc<AppState<C, A, T, M>>) -> Router
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/summarize", post(summarize))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn summarize<C, A, T, M>(
    State(state): State<Arc<AppState<C, A, T, M>>>,
    Json(request): Json<BriefRequest>,
) -> Result<Json<Brief>, Error>
where
    C: CaptionSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    M: ChatModel + Send + Sync + 'static,
{
    let language = request.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    let brief = state.processor.process(&request.url, language).await?;
    Ok(Json(brief))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::TranscriptUnavailable(_) => StatusCode::BAD_REQUEST,
        Error::SummarizationFailed(_) => StatusCode::BAD_GATEWAY,
        Error::Transcription(_) | Error::ConfigurationMissing(_) | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        tracing::warn!(error = %self, status = %status, "request failed");
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_unavailable_is_bad_input() {
        let error = Error::TranscriptUnavailable("no captions".into());
        assert_eq!(status_for(&error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_summarization_failure_is_upstream() {
        let error = Error::SummarizationFailed("rate limited".into());
        assert_eq!(status_for(&error), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_everything_else_is_internal() {
        assert_eq!(
            status_for(&Error::ConfigurationMissing("OPENAI_API_KEY")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&Error::Transcription("api down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
