//! Playback sessions keyed by voice channel.
//!
//! Each session runs a [`PlaylistPlayer`] on its own thread. The registry keeps
//! the navigation sender of the session currently playing on each channel, and
//! a per-channel turn lock so two sessions never render into one channel at once.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{VoiceConnector, VoiceGuard};
use crate::cache::{InFlight, MediaCache};
use crate::config::LibrarySettings;
use crate::error::Result;
use crate::library;
use crate::navigation::{NavigationIntent, NavigationSender, navigation_channel};
use crate::player::{PlaylistPlayer, SessionReport};
use crate::source::TrackSource;

/// What a new session should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRequest {
    /// Every audio file in the media folder.
    LocalAll,
    Track(String),
    Playlist(String),
}

/// Collaborators shared by every session.
pub struct Services {
    pub source: Arc<dyn TrackSource>,
    pub cache: Arc<dyn MediaCache>,
    pub voice: Arc<dyn VoiceConnector>,
    pub downloads: Arc<InFlight>,
    pub media_dir: PathBuf,
    pub library: LibrarySettings,
}

#[derive(Default)]
struct ChannelSlot {
    turn: Arc<Mutex<()>>,
    current: Option<NavigationSender>,
}

struct Inner {
    services: Services,
    channels: Mutex<HashMap<String, ChannelSlot>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shutting_down: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Inner>,
}

/// Removes a session's navigation sender from the registry when the session
/// thread ends, however it ends. The channel's slot goes too once no other
/// session is queued on it.
struct Registration<'a> {
    inner: &'a Inner,
    channel: String,
    sender: NavigationSender,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        let mut channels = lock(&self.inner.channels);
        let Some(slot) = channels.get_mut(&self.channel) else {
            return;
        };
        // A later session may already own the slot.
        if slot
            .current
            .as_ref()
            .is_some_and(|s| s.same_session(&self.sender))
        {
            slot.current = None;
        }
        // One turn handle lives in the map, one in this session's thread; any
        // other belongs to a queued session.
        if slot.current.is_none() && Arc::strong_count(&slot.turn) <= 2 {
            channels.remove(&self.channel);
        }
    }
}

impl SessionRegistry {
    pub fn new(services: Services) -> Self {
        Self {
            inner: Arc::new(Inner {
                services,
                channels: Mutex::new(HashMap::new()),
                workers: Mutex::new(Vec::new()),
                shutting_down: AtomicBool::new(false),
            }),
        }
    }

    /// Start a session on `channel`. It waits for any session already playing
    /// there to finish first.
    pub fn start(&self, channel: &str, request: SessionRequest) {
        let turn = {
            let mut channels = lock(&self.inner.channels);
            channels.entry(channel.to_string()).or_default().turn.clone()
        };

        let inner = self.inner.clone();
        let channel = channel.to_string();
        let handle = thread::spawn(move || {
            let _turn = lock(&turn);
            match run_session(&inner, &channel, &request) {
                Ok(Some(report)) => info!(
                    "session on {} finished: {} rendered, {} skipped{}",
                    channel,
                    report.rendered.len(),
                    report.skipped.len(),
                    if report.stopped { ", stopped" } else { "" }
                ),
                Ok(None) => debug!("session on {} dropped at shutdown", channel),
                Err(e) => warn!("session on {} aborted: {}", channel, e),
            }
        });

        let mut workers = lock(&self.inner.workers);
        workers.retain(|w| !w.is_finished());
        workers.push(handle);
    }

    /// Deliver `intent` to the session playing on `channel`.
    /// Returns `false` when nothing is playing there.
    pub fn navigate(&self, channel: &str, intent: NavigationIntent) -> bool {
        let channels = lock(&self.inner.channels);
        match channels.get(channel).and_then(|slot| slot.current.as_ref()) {
            Some(sender) => sender.send(intent).is_ok(),
            None => false,
        }
    }

    pub fn is_playing(&self, channel: &str) -> bool {
        lock(&self.inner.channels)
            .get(channel)
            .is_some_and(|slot| slot.current.as_ref().is_some_and(|s| !s.is_closed()))
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        lock(&self.inner.channels).len()
    }

    /// Block until every started session has ended on its own.
    pub fn wait(&self) {
        loop {
            let workers: Vec<JoinHandle<()>> = lock(&self.inner.workers).drain(..).collect();
            if workers.is_empty() {
                return;
            }
            for w in workers {
                let _ = w.join();
            }
        }
    }

    /// Stop every session, drop queued ones and wait for all session threads.
    pub fn shutdown(&self) {
        {
            let channels = lock(&self.inner.channels);
            self.inner.shutting_down.store(true, Ordering::SeqCst);
            for slot in channels.values() {
                if let Some(sender) = slot.current.as_ref() {
                    let _ = sender.send(NavigationIntent::Stop);
                }
            }
        }
        self.wait();
    }
}

/// Run one session to completion. `None` means the registry was shutting
/// down before the session got its turn.
fn run_session(
    inner: &Inner,
    channel: &str,
    request: &SessionRequest,
) -> Result<Option<SessionReport>> {
    let services = &inner.services;
    let (sender, navigation) = navigation_channel();
    let _registration = {
        let mut channels = lock(&inner.channels);
        if inner.shutting_down.load(Ordering::SeqCst) {
            return Ok(None);
        }
        channels.entry(channel.to_string()).or_default().current = Some(sender.clone());
        Registration {
            inner,
            channel: channel.to_string(),
            sender,
        }
    };

    let mut voice = VoiceGuard::join(services.voice.as_ref(), channel)?;
    let player = PlaylistPlayer::new(
        services.source.as_ref(),
        services.cache.as_ref(),
        services.downloads.as_ref(),
        &mut *voice,
        &navigation,
    );

    let report = match request {
        SessionRequest::Playlist(id) => player.run_playlist(id)?,
        SessionRequest::Track(id) => player.run_track(id),
        SessionRequest::LocalAll => {
            let tracks = library::scan(&services.media_dir, &services.library);
            let total: Duration = tracks.iter().filter_map(|t| t.duration).sum();
            info!(
                "playing {} local files ({} min)",
                tracks.len(),
                total.as_secs() / 60
            );
            player.run_local(tracks)
        }
    };
    Ok(Some(report))
}
