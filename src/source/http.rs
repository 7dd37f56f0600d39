use std::io::Read;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use crate::config::SourceSettings;
use crate::error::{PlaybackError, Result};

use super::TrackSource;
use super::model::{Playlist, Track};
use super::select::select_audio_format;

/// Track catalogue served as JSON over HTTP.
///
/// `GET {base}/playlists/{id}` and `GET {base}/tracks/{id}` describe playlists and
/// tracks; format URLs are fetched as raw bytes.
pub struct HttpTrackSource {
    catalogue: Agent,
    downloads: Agent,
    base_url: String,
}

/// Agent for small JSON documents: one bound on the whole exchange.
fn catalogue_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Agent for audio streams. Connecting and the response head use the short
/// timeout; the body may take up to `whole` to arrive.
fn download_agent(timeout: Duration, whole: Duration) -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(timeout))
        .timeout_recv_response(Some(timeout))
        .timeout_global(Some(whole))
        .build()
        .into()
}

enum FetchError {
    NotFound,
    Unavailable(String),
}

impl From<ureq::Error> for FetchError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(404) => FetchError::NotFound,
            other => FetchError::Unavailable(other.to_string()),
        }
    }
}

impl HttpTrackSource {
    pub fn new(settings: &SourceSettings) -> Self {
        Self {
            catalogue: catalogue_agent(Duration::from_secs(settings.timeout_secs)),
            downloads: download_agent(
                Duration::from_secs(settings.timeout_secs),
                Duration::from_secs(settings.download_timeout_secs),
            ),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, kind: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind, urlencoding::encode(id))
    }

    fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> std::result::Result<T, FetchError> {
        debug!("GET {}", url);
        let mut response = self.catalogue.get(url).call()?;
        let body = response.body_mut().read_to_string()?;
        serde_json::from_str(&body)
            .map_err(|e| FetchError::Unavailable(format!("malformed catalogue entry at {url}: {e}")))
    }
}

impl TrackSource for HttpTrackSource {
    fn resolve_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let url = self.endpoint("playlists", playlist_id);
        self.fetch_json(&url).map_err(|e| match e {
            FetchError::NotFound => PlaybackError::PlaylistNotFound(playlist_id.to_string()),
            FetchError::Unavailable(reason) => PlaybackError::SourceUnavailable(reason),
        })
    }

    fn resolve_track(&self, track_id: &str) -> Result<Track> {
        let url = self.endpoint("tracks", track_id);
        self.fetch_json(&url).map_err(|e| match e {
            FetchError::NotFound => PlaybackError::TrackNotFound(track_id.to_string()),
            FetchError::Unavailable(reason) => PlaybackError::SourceUnavailable(reason),
        })
    }

    fn open_stream(&self, track: &Track) -> Result<Box<dyn Read>> {
        let format = select_audio_format(&track.formats)
            .ok_or_else(|| PlaybackError::NoAudioFormat(track.id.clone()))?;
        debug!(
            "streaming {} as {} ({} channels)",
            track.id, format.mime_type, format.audio_channels
        );

        let response = self.downloads.get(&format.url).call().map_err(|e| {
            PlaybackError::SourceUnavailable(format!("stream for {}: {e}", track.id))
        })?;
        Ok(Box::new(response.into_body().into_reader()))
    }
}
