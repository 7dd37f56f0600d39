//! Remote track resolution.
//!
//! A [`TrackSource`] turns playlist and track identifiers into descriptors and
//! opens the byte stream of a track that is not cached yet.

use std::io::Read;

use crate::error::Result;

mod http;
mod model;
mod select;

pub use http::HttpTrackSource;
pub use model::{Format, Playlist, Track, TrackRef};
pub use select::select_audio_format;

pub trait TrackSource: Send + Sync {
    /// Resolve a playlist into its ordered entries.
    fn resolve_playlist(&self, playlist_id: &str) -> Result<Playlist>;

    /// Resolve a single track and its available formats.
    fn resolve_track(&self, track_id: &str) -> Result<Track>;

    /// Open the audio stream of `track` using [`select_audio_format`].
    fn open_stream(&self, track: &Track) -> Result<Box<dyn Read>>;
}
