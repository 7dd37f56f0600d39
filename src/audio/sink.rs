//! Voice output rendered through `rodio` on the default output device.
//!
//! Joining a channel opens an output stream; each track gets a fresh `Sink`
//! on that stream's mixer.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use crate::config::AudioSettings;
use crate::error::{PlaybackError, Result};
use crate::navigation::NavigationReceiver;

use super::types::{PlaybackOutcome, PlaybackSink, VoiceConnector};

pub struct SpeakerConnector {
    settings: AudioSettings,
}

impl SpeakerConnector {
    pub fn new(settings: AudioSettings) -> Self {
        Self { settings }
    }
}

impl VoiceConnector for SpeakerConnector {
    fn join(&self, channel: &str) -> Result<Box<dyn PlaybackSink>> {
        let mut stream = OutputStreamBuilder::open_default_stream().map_err(|e| {
            PlaybackError::VoiceUnavailable(format!("{channel}: no audio output device: {e}"))
        })?;
        // rodio logs to stderr when OutputStream is dropped; the bot logs its own leave.
        stream.log_on_drop(false);

        Ok(Box::new(SpeakerSink {
            stream: Some(stream),
            poll: Duration::from_millis(self.settings.interrupt_poll_ms.max(1)),
            volume: self.settings.volume,
        }))
    }
}

pub struct SpeakerSink {
    stream: Option<OutputStream>,
    poll: Duration,
    volume: f32,
}

/// Create a playing `Sink` for the file at `path`.
fn create_sink(stream: &OutputStream, path: &Path, volume: f32) -> std::result::Result<Sink, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {:?}: {e}", path))?;
    let source =
        Decoder::new(BufReader::new(file)).map_err(|e| format!("failed to decode {:?}: {e}", path))?;

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    Ok(sink)
}

impl PlaybackSink for SpeakerSink {
    fn play(&mut self, path: &Path, interrupt: &NavigationReceiver) -> PlaybackOutcome {
        let Some(stream) = self.stream.as_ref() else {
            return PlaybackOutcome::Failed("voice channel already left".to_string());
        };
        let sink = match create_sink(stream, path, self.volume) {
            Ok(sink) => sink,
            Err(reason) => return PlaybackOutcome::Failed(reason),
        };

        loop {
            if sink.empty() {
                return PlaybackOutcome::Completed;
            }
            if let Some(intent) = interrupt.recv_timeout(self.poll) {
                sink.stop();
                debug!("interrupted {:?} by {:?}", path, intent);
                return PlaybackOutcome::Interrupted(intent);
            }
        }
    }

    fn disconnect(&mut self) {
        self.stream = None;
    }
}
