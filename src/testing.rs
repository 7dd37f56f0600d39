//! In-memory collaborators shared by the player, session and audio tests.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::{PlaybackOutcome, PlaybackSink, VoiceConnector};
use crate::error::{PlaybackError, Result};
use crate::navigation::{NavigationIntent, NavigationReceiver, NavigationSender};
use crate::source::{Format, Playlist, Track, TrackRef, TrackSource, select_audio_format};

enum Payload {
    Bytes(Vec<u8>),
    BrokenStream,
    NoAudio,
}

/// Catalogue backed by hash maps; counts every `open_stream` call.
#[derive(Default)]
pub struct FakeSource {
    playlists: HashMap<String, Vec<String>>,
    tracks: HashMap<String, Payload>,
    unavailable: bool,
    opened: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playlist(mut self, id: &str, track_ids: &[&str]) -> Self {
        self.playlists.insert(
            id.to_string(),
            track_ids.iter().map(|t| t.to_string()).collect(),
        );
        for t in track_ids {
            self.tracks
                .entry(t.to_string())
                .or_insert_with(|| Payload::Bytes(format!("audio:{t}").into_bytes()));
        }
        self
    }

    pub fn with_track(mut self, id: &str) -> Self {
        self.tracks
            .insert(id.to_string(), Payload::Bytes(format!("audio:{id}").into_bytes()));
        self
    }

    /// Resolves fine but the stream errors half way.
    pub fn with_broken_track(mut self, id: &str) -> Self {
        self.tracks.insert(id.to_string(), Payload::BrokenStream);
        self
    }

    /// Only offers video-only formats.
    pub fn with_silent_track(mut self, id: &str) -> Self {
        self.tracks.insert(id.to_string(), Payload::NoAudio);
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.served {
            return Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ));
        }
        self.served = true;
        let n = buf.len().min(4);
        buf[..n].copy_from_slice(&b"part"[..n]);
        Ok(n)
    }
}

impl TrackSource for FakeSource {
    fn resolve_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        if self.unavailable {
            return Err(PlaybackError::SourceUnavailable("offline".to_string()));
        }
        let ids = self
            .playlists
            .get(playlist_id)
            .ok_or_else(|| PlaybackError::PlaylistNotFound(playlist_id.to_string()))?;
        Ok(Playlist {
            id: playlist_id.to_string(),
            title: None,
            entries: ids.iter().map(TrackRef::new).collect(),
        })
    }

    fn resolve_track(&self, track_id: &str) -> Result<Track> {
        if self.unavailable {
            return Err(PlaybackError::SourceUnavailable("offline".to_string()));
        }
        let payload = self
            .tracks
            .get(track_id)
            .ok_or_else(|| PlaybackError::TrackNotFound(track_id.to_string()))?;
        let channels = match payload {
            Payload::NoAudio => 0,
            _ => 2,
        };
        Ok(Track {
            id: track_id.to_string(),
            title: None,
            locator: format!("fake://{track_id}"),
            formats: vec![Format {
                url: format!("fake://{track_id}/audio"),
                mime_type: "audio/mp4".to_string(),
                audio_channels: channels,
                bitrate: None,
            }],
        })
    }

    fn open_stream(&self, track: &Track) -> Result<Box<dyn Read>> {
        select_audio_format(&track.formats)
            .ok_or_else(|| PlaybackError::NoAudioFormat(track.id.clone()))?;
        self.opened.lock().unwrap().push(track.id.clone());
        match self.tracks.get(&track.id) {
            Some(Payload::Bytes(bytes)) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Some(Payload::BrokenStream) => Ok(Box::new(FailingReader { served: false })),
            _ => Err(PlaybackError::TrackNotFound(track.id.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Joined(String),
    Played(PathBuf),
    Disconnected(String),
}

/// What a scripted sink does on a given `play` call (0-based, counted per sink).
#[derive(Clone)]
pub enum Step {
    /// A command handler sends `intent` while the track renders.
    Signal(NavigationIntent),
    /// The track cannot be rendered.
    Fail,
}

/// Shared record of everything the scripted sinks did.
#[derive(Clone, Default)]
pub struct SinkLog {
    events: Arc<Mutex<Vec<SinkEvent>>>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl SinkLog {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    /// File stems of every rendered path, in order.
    pub fn played(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Played(p) => p
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn max_concurrent_renders(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct ScriptedSink {
    channel: String,
    log: SinkLog,
    script: HashMap<usize, Step>,
    signal: Option<NavigationSender>,
    render_time: Duration,
    calls: usize,
}

impl ScriptedSink {
    pub fn new(log: SinkLog) -> Self {
        Self {
            channel: "test".to_string(),
            log,
            script: HashMap::new(),
            signal: None,
            render_time: Duration::ZERO,
            calls: 0,
        }
    }

    /// Sender used to deliver `Step::Signal` intents.
    pub fn signalling(mut self, sender: NavigationSender) -> Self {
        self.signal = Some(sender);
        self
    }

    pub fn on_call(mut self, call: usize, step: Step) -> Self {
        self.script.insert(call, step);
        self
    }

    /// How long each track renders when nothing interrupts it.
    pub fn render_time(mut self, d: Duration) -> Self {
        self.render_time = d;
        self
    }
}

impl PlaybackSink for ScriptedSink {
    fn play(&mut self, path: &Path, interrupt: &NavigationReceiver) -> PlaybackOutcome {
        let call = self.calls;
        self.calls += 1;
        self.log.push(SinkEvent::Played(path.to_path_buf()));

        let now = self.log.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_active.fetch_max(now, Ordering::SeqCst);

        let outcome = match self.script.get(&call) {
            Some(Step::Fail) => PlaybackOutcome::Failed("corrupt frame".to_string()),
            step => {
                if let (Some(Step::Signal(intent)), Some(tx)) = (step, self.signal.as_ref()) {
                    let _ = tx.send(*intent);
                }
                match interrupt.recv_timeout(self.render_time) {
                    Some(intent) => PlaybackOutcome::Interrupted(intent),
                    None => PlaybackOutcome::Completed,
                }
            }
        };

        self.log.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn disconnect(&mut self) {
        self.log.push(SinkEvent::Disconnected(self.channel.clone()));
    }
}

/// Hands out scripted sinks that all report into one [`SinkLog`].
#[derive(Default)]
pub struct FakeConnector {
    pub log: SinkLog,
    pub render_time: Duration,
    pub refuse: bool,
}

impl FakeConnector {
    pub fn new(render_time: Duration) -> Self {
        Self {
            log: SinkLog::default(),
            render_time,
            refuse: false,
        }
    }
}

impl VoiceConnector for FakeConnector {
    fn join(&self, channel: &str) -> Result<Box<dyn PlaybackSink>> {
        if self.refuse {
            return Err(PlaybackError::VoiceUnavailable(channel.to_string()));
        }
        self.log.push(SinkEvent::Joined(channel.to_string()));
        let mut sink = ScriptedSink::new(self.log.clone()).render_time(self.render_time);
        sink.channel = channel.to_string();
        Ok(Box::new(sink))
    }
}
