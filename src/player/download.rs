use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::cache::{InFlight, MediaCache};
use crate::error::{PlaybackError, Result};
use crate::source::{TrackRef, TrackSource};

/// Fetch `entry` into the cache, unless another session already did.
///
/// The stream is written to the cache's staging path and only becomes an entry
/// once fully written, so a partial file is never a cache hit.
pub fn download(
    source: &dyn TrackSource,
    cache: &dyn MediaCache,
    downloads: &InFlight,
    entry: &TrackRef,
) -> Result<PathBuf> {
    let _claim = downloads.acquire(&entry.id);
    if let Some(path) = cache.lookup(&entry.id)? {
        debug!("{} was fetched by another session", entry.id);
        return Ok(path);
    }

    let track = source.resolve_track(&entry.id)?;
    let mut stream = source.open_stream(&track)?;

    let staging = cache.staging_path(&entry.id);
    let written = File::create(&staging).and_then(|file| {
        let mut out = BufWriter::new(file);
        let n = io::copy(&mut stream, &mut out)?;
        out.flush()?;
        Ok(n)
    });

    let bytes = match written {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&staging);
            return Err(PlaybackError::DownloadFailed {
                track: entry.id.clone(),
                reason: e.to_string(),
            });
        }
    };

    let path = cache.store(&entry.id, &staging).inspect_err(|_| {
        let _ = fs::remove_file(&staging);
    })?;
    info!(
        "downloaded {} ({} bytes)",
        track.title.as_deref().unwrap_or(entry.label()),
        bytes
    );
    Ok(path)
}
