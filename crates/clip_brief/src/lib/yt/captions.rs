//! # Caption retrieval
//!
//! Fetches caption text straight from the watch page: the embedded
//! `ytInitialPlayerResponse` JSON lists the available caption tracks, and
//! each track's `baseUrl` serves the transcript itself (requested here in
//! `json3` format). No media is downloaded on this path.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_retry_after::RetryAfterMiddleware;
use serde::Deserialize;

use crate::yt::{CaptionError, CaptionSource};

static PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});").unwrap()
});

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Production [`CaptionSource`] scraping caption tracks from the watch page.
pub struct YouTubeCaptions {
    client: ClientWithMiddleware,
}

impl YouTubeCaptions {
    const MAX_RETRIES: u32 = 3;

    pub fn new() -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(Self::MAX_RETRIES);
        let client = reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(RetryAfterMiddleware::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        YouTubeCaptions { client }
    }

    async fn fetch_player_response(&self, video_id: &str) -> Result<PlayerResponse, CaptionError> {
        let html = self
            .client
            .get(format!("{WATCH_URL}?v={video_id}"))
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| CaptionError::Other(e.to_string()))?
            .text()
            .await
            .map_err(|e| CaptionError::Other(e.to_string()))?;

        WatchPage::from(html).player_response()
    }

    async fn fetch_track_text(&self, track: &CaptionTrack) -> Result<String, CaptionError> {
        let url = format!("{}&fmt=json3", track.base_url);
        let timed_text = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CaptionError::Other(e.to_string()))?
            .json::<TimedText>()
            .await
            .map_err(|e| CaptionError::Other(e.to_string()))?;

        Ok(timed_text.joined_text())
    }

    async fn fetch_with(
        &self,
        video_id: &str,
        languages: &[&str],
        preference: TrackPreference,
    ) -> Result<String, CaptionError> {
        let player_response = self.fetch_player_response(video_id).await?;
        let tracks = player_response.caption_tracks()?;
        let track =
            select_track(tracks, languages, preference).ok_or(CaptionError::NotFound)?;

        tracing::debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "fetching caption track"
        );
        self.fetch_track_text(track).await
    }
}

impl Default for YouTubeCaptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionSource for YouTubeCaptions {
    async fn fetch_captions(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<String, CaptionError> {
        self.fetch_with(video_id, languages, TrackPreference::ManualFirst)
            .await
    }

    async fn fetch_generated_captions(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<String, CaptionError> {
        self.fetch_with(video_id, languages, TrackPreference::GeneratedOnly)
            .await
    }
}

/// Raw watch-page HTML.
pub struct WatchPage(String);

impl WatchPage {
    pub fn new(html: String) -> Self {
        WatchPage(html)
    }

    /// Extracts and deserializes the embedded `ytInitialPlayerResponse`
    /// object from the page's script tag.
    fn player_response(&self) -> Result<PlayerResponse, CaptionError> {
        PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or_else(|| {
                CaptionError::Other(
                    "failed to extract ytInitialPlayerResponse from the page's script tag".into(),
                )
            })
    }
}

impl Deref for WatchPage {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<String> for WatchPage {
    fn from(value: String) -> Self {
        WatchPage(value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

impl PlayerResponse {
    fn caption_tracks(&self) -> Result<&[CaptionTrack], CaptionError> {
        if let Some(status) = &self.playability_status {
            if status.status.as_deref() == Some("ERROR") {
                return Err(CaptionError::VideoUnavailable);
            }
        }
        let tracks = self
            .captions
            .as_ref()
            .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
            .and_then(|r| r.caption_tracks.as_deref())
            .ok_or(CaptionError::Disabled)?;
        if tracks.is_empty() {
            return Err(CaptionError::NotFound);
        }
        Ok(tracks)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` marks an auto-generated track.
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackPreference {
    /// Human-authored track in language order, falling back to a generated
    /// one in the same language.
    ManualFirst,
    /// Auto-generated track only.
    GeneratedOnly,
}

fn select_track<'t>(
    tracks: &'t [CaptionTrack],
    languages: &[&str],
    preference: TrackPreference,
) -> Option<&'t CaptionTrack> {
    let lang_matches = |track: &CaptionTrack, lang: &str| {
        track.language_code == lang || track.language_code.starts_with(&format!("{lang}-"))
    };
    for lang in languages {
        if preference == TrackPreference::ManualFirst {
            if let Some(track) = tracks
                .iter()
                .find(|t| !t.is_generated() && lang_matches(t, lang))
            {
                return Some(track);
            }
        }
        if let Some(track) = tracks
            .iter()
            .find(|t| t.is_generated() && lang_matches(t, lang))
        {
            return Some(track);
        }
    }
    None
}

/// Transcript payload in `json3` format: a flat list of events, each carrying
/// text segments. Events without segments (styling, window definitions) are
/// skipped.
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

impl TimedText {
    fn joined_text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| event.segs.as_ref())
            .map(|segs| segs.iter().map(|seg| seg.utf8.as_str()).collect::<String>())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Option<Vec<TimedTextSeg>>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}
