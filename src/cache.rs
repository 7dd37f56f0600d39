//! Local media cache.
//!
//! The cache is a flat directory where a downloaded track lives at
//! `<track id>.<extension>`; the presence of that file is the index.

use std::path::{Path, PathBuf};

use crate::error::Result;

mod dir;
mod inflight;

pub use dir::{DirCache, file_stem_for};
pub use inflight::InFlight;

pub trait MediaCache: Send + Sync {
    /// Local path of a previously downloaded track. No side effects.
    fn lookup(&self, track_id: &str) -> Result<Option<PathBuf>>;

    /// Record that `track_id` now has a local copy at `path`. Last write wins.
    /// Returns the path the entry is served from afterwards.
    fn store(&self, track_id: &str, path: &Path) -> Result<PathBuf>;

    /// Where an in-progress download of `track_id` should be written.
    /// Never reported by [`MediaCache::lookup`].
    fn staging_path(&self, track_id: &str) -> PathBuf;
}
