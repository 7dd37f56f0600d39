//! Error taxonomy shared by the cache, source, audio and player modules.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("track not found: {0}")]
    TrackNotFound(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("no audio-bearing format for track {0}")]
    NoAudioFormat(String),

    #[error("cache unavailable at {path:?}: {source}")]
    CacheUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("download failed for track {track}: {reason}")]
    DownloadFailed { track: String, reason: String },

    #[error("render failed: {0}")]
    RenderFailed(String),

    #[error("voice channel unavailable: {0}")]
    VoiceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
