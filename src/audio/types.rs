//! Audio-related small types.
//!
//! Defines the result of rendering one track and the sink/connector traits the
//! playback core drives.

use std::path::Path;

use crate::error::Result;
use crate::navigation::{NavigationIntent, NavigationReceiver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The track played to its end.
    Completed,
    /// Rendering stopped early because of a navigation intent.
    Interrupted(NavigationIntent),
    /// The track could not be rendered.
    Failed(String),
}

/// A joined voice channel that can render local files.
pub trait PlaybackSink {
    /// Render `path`, polling `interrupt` at least once per output frame and
    /// stopping output as soon as an intent arrives.
    fn play(&mut self, path: &Path, interrupt: &NavigationReceiver) -> PlaybackOutcome;

    /// Leave the channel. Further `play` calls fail.
    fn disconnect(&mut self);
}

/// Joins voice channels on behalf of playback sessions.
pub trait VoiceConnector: Send + Sync {
    fn join(&self, channel: &str) -> Result<Box<dyn PlaybackSink>>;
}
