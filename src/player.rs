//! Playlist playback core.
//!
//! [`PlaylistPlayer`] walks a queue of tracks one at a time: cache lookup,
//! download on a miss, render on the joined channel, then move the cursor
//! forward or back depending on how rendering ended.

mod download;
mod engine;
mod state;

pub use engine::PlaylistPlayer;
pub use state::{PlayerState, SessionReport};
