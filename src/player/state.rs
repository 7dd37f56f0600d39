use std::path::PathBuf;

use crate::library::LocalTrack;
use crate::source::TrackRef;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Resolving,
    Downloading,
    Rendering,
    Advancing,
    Finished,
    Aborted,
}

/// One position of the traversal queue.
#[derive(Debug, Clone)]
pub enum QueueEntry {
    /// Fetched through the cache, downloading on a miss.
    Remote(TrackRef),
    /// Already on disk; never touches the source.
    Local(LocalTrack),
}

impl QueueEntry {
    pub fn label(&self) -> &str {
        match self {
            Self::Remote(r) => r.label(),
            Self::Local(t) => &t.display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTrack {
    pub index: usize,
    pub label: String,
    pub reason: String,
}

/// What a finished traversal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Cursor positions handed to the sink, in order.
    pub rendered: Vec<usize>,
    /// Paths handed to the sink, in order.
    pub rendered_paths: Vec<PathBuf>,
    pub skipped: Vec<SkippedTrack>,
    /// Whether a Stop intent ended the traversal early.
    pub stopped: bool,
    pub state: PlayerState,
}

impl Default for SessionReport {
    fn default() -> Self {
        Self {
            rendered: Vec::new(),
            rendered_paths: Vec::new(),
            skipped: Vec::new(),
            stopped: false,
            state: PlayerState::Idle,
        }
    }
}
