use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CacheSettings;
use crate::error::{PlaybackError, Result};

use super::MediaCache;

pub struct DirCache {
    dir: PathBuf,
    extension: String,
}

/// Map a track id onto a file stem that cannot escape the cache directory
/// or collide with staging files.
///
/// Path separators, `%`, control characters and a leading dot are written as
/// `%XX`, so distinct ids always get distinct stems.
pub fn file_stem_for(track_id: &str) -> String {
    if track_id.is_empty() {
        // A lone `%` is never produced by escaping.
        return "%".to_string();
    }
    let mut stem = String::with_capacity(track_id.len());
    for (i, c) in track_id.chars().enumerate() {
        let escape = matches!(c, '/' | '\\' | ':' | '%') || c.is_control();
        if escape || (i == 0 && c == '.') {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                stem.push_str(&format!("%{b:02X}"));
            }
        } else {
            stem.push(c);
        }
    }
    stem
}

fn unavailable(path: &Path, source: io::Error) -> PlaybackError {
    PlaybackError::CacheUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

impl DirCache {
    /// Open (and create if needed) the cache directory.
    pub fn open(settings: &CacheSettings) -> Result<Self> {
        fs::create_dir_all(&settings.dir).map_err(|e| unavailable(&settings.dir, e))?;
        Ok(Self {
            dir: settings.dir.clone(),
            extension: settings
                .extension
                .trim()
                .trim_start_matches('.')
                .to_string(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical location of a cached track.
    pub fn entry_path(&self, track_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem_for(track_id), self.extension))
    }
}

impl MediaCache for DirCache {
    fn lookup(&self, track_id: &str) -> Result<Option<PathBuf>> {
        let path = self.entry_path(track_id);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(Some(path)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(unavailable(&path, e)),
        }
    }

    fn store(&self, track_id: &str, path: &Path) -> Result<PathBuf> {
        let target = self.entry_path(track_id);
        if path != target {
            // Same directory as the staging file, so the rename is atomic.
            fs::rename(path, &target).map_err(|e| unavailable(&target, e))?;
        }
        debug!("cached {} at {:?}", track_id, target);
        Ok(target)
    }

    fn staging_path(&self, track_id: &str) -> PathBuf {
        self.dir.join(format!(
            ".{}.{}.part",
            file_stem_for(track_id),
            self.extension
        ))
    }
}
