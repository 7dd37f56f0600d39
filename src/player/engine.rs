use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::audio::{PlaybackOutcome, PlaybackSink};
use crate::cache::{InFlight, MediaCache};
use crate::error::{PlaybackError, Result};
use crate::library::LocalTrack;
use crate::navigation::{Direction, NavigationIntent, NavigationReceiver, advance};
use crate::source::{TrackRef, TrackSource};

use super::download::download;
use super::state::{PlayerState, QueueEntry, SessionReport, SkippedTrack};

/// What happens after a track has been rendered (or skipped).
enum Step {
    Advance(Direction),
    Stop,
}

/// Sequential queue player for one session.
///
/// Materializes each entry through the cache (downloading on a miss), renders it
/// on the sink, and moves the cursor according to the rendering outcome.
pub struct PlaylistPlayer<'a> {
    source: &'a dyn TrackSource,
    cache: &'a dyn MediaCache,
    downloads: &'a InFlight,
    sink: &'a mut dyn PlaybackSink,
    navigation: &'a NavigationReceiver,
    state: PlayerState,
    report: SessionReport,
}

impl<'a> PlaylistPlayer<'a> {
    pub fn new(
        source: &'a dyn TrackSource,
        cache: &'a dyn MediaCache,
        downloads: &'a InFlight,
        sink: &'a mut dyn PlaybackSink,
        navigation: &'a NavigationReceiver,
    ) -> Self {
        Self {
            source,
            cache,
            downloads,
            sink,
            navigation,
            state: PlayerState::Idle,
            report: SessionReport::default(),
        }
    }

    fn transition(&mut self, next: PlayerState) {
        debug!("player {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Resolve `playlist_id` and play every entry. A resolution failure aborts
    /// the session; per-track failures only skip that track.
    pub fn run_playlist(mut self, playlist_id: &str) -> Result<SessionReport> {
        self.transition(PlayerState::Resolving);
        let playlist = match self.source.resolve_playlist(playlist_id) {
            Ok(p) => p,
            Err(e) => {
                self.transition(PlayerState::Aborted);
                return Err(e);
            }
        };
        info!(
            "playlist {} ({} tracks)",
            playlist.title.as_deref().unwrap_or(&playlist.id),
            playlist.entries.len()
        );

        let queue = playlist.entries.into_iter().map(QueueEntry::Remote).collect();
        Ok(self.traverse(queue))
    }

    /// Play a single track by id: cached copy if present, else download first.
    pub fn run_track(self, track_id: &str) -> SessionReport {
        self.traverse(vec![QueueEntry::Remote(TrackRef::new(track_id))])
    }

    /// Play files already on disk, in the given order.
    pub fn run_local(self, tracks: Vec<LocalTrack>) -> SessionReport {
        self.traverse(tracks.into_iter().map(QueueEntry::Local).collect())
    }

    fn traverse(mut self, queue: Vec<QueueEntry>) -> SessionReport {
        let mut cursor = 0;

        while cursor < queue.len() {
            if self.navigation.take_stop() {
                self.report.stopped = true;
                break;
            }
            self.transition(PlayerState::Resolving);
            let entry = &queue[cursor];

            let step = match self.materialize(entry) {
                // Stop arrived while downloading.
                Ok(_) if self.navigation.take_stop() => Step::Stop,
                Ok(path) => self.render(cursor, entry, path),
                Err(e) => {
                    self.skip(cursor, entry, &e);
                    Step::Advance(Direction::Forward)
                }
            };

            self.transition(PlayerState::Advancing);
            match step {
                Step::Advance(direction) => cursor = advance(cursor, direction),
                Step::Stop => {
                    self.report.stopped = true;
                    break;
                }
            }
        }

        self.transition(PlayerState::Finished);
        self.report.state = self.state;
        self.report
    }

    fn materialize(&mut self, entry: &QueueEntry) -> Result<PathBuf> {
        let track = match entry {
            QueueEntry::Local(t) => return Ok(t.path.clone()),
            QueueEntry::Remote(r) => r,
        };
        if let Some(path) = self.cache.lookup(&track.id)? {
            return Ok(path);
        }
        self.transition(PlayerState::Downloading);
        download(self.source, self.cache, self.downloads, track)
    }

    fn render(&mut self, cursor: usize, entry: &QueueEntry, path: PathBuf) -> Step {
        self.transition(PlayerState::Rendering);
        info!("now playing [{}] {}", cursor, entry.label());
        self.report.rendered.push(cursor);
        self.report.rendered_paths.push(path.clone());

        match self.sink.play(&path, self.navigation) {
            PlaybackOutcome::Completed => Step::Advance(Direction::Forward),
            PlaybackOutcome::Interrupted(NavigationIntent::Next) => {
                Step::Advance(Direction::Forward)
            }
            PlaybackOutcome::Interrupted(NavigationIntent::Previous) => {
                Step::Advance(Direction::Backward)
            }
            PlaybackOutcome::Interrupted(NavigationIntent::Stop) => Step::Stop,
            PlaybackOutcome::Failed(reason) => {
                self.skip(cursor, entry, &PlaybackError::RenderFailed(reason));
                Step::Advance(Direction::Forward)
            }
        }
    }

    fn skip(&mut self, cursor: usize, entry: &QueueEntry, error: &PlaybackError) {
        warn!("skipping [{}] {}: {}", cursor, entry.label(), error);
        self.report.skipped.push(SkippedTrack {
            index: cursor,
            label: entry.label().to_string(),
            reason: error.to_string(),
        });
    }
}
