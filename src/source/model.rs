use serde::Deserialize;

/// A playlist entry before per-track resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl TrackRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }

    /// Human-readable label for logs.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Playback order.
    #[serde(default)]
    pub entries: Vec<TrackRef>,
}

/// One encoding a track is available in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Format {
    pub url: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub audio_channels: u32,
    #[serde(default)]
    pub bitrate: Option<u64>,
}

impl Format {
    pub fn has_audio(&self) -> bool {
        self.audio_channels > 0
    }
}

/// A resolved track.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Where the source serves the track from.
    #[serde(default)]
    pub locator: String,
    #[serde(default)]
    pub formats: Vec<Format>,
}
