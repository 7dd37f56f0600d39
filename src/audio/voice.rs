use std::ops::{Deref, DerefMut};

use tracing::info;

use crate::error::Result;

use super::types::{PlaybackSink, VoiceConnector};

/// Scoped handle on a joined channel: disconnects when dropped, whichever way
/// the session ends.
pub struct VoiceGuard {
    channel: String,
    sink: Box<dyn PlaybackSink>,
}

impl VoiceGuard {
    pub fn join(connector: &dyn VoiceConnector, channel: &str) -> Result<Self> {
        let sink = connector.join(channel)?;
        info!("joined voice channel {}", channel);
        Ok(Self {
            channel: channel.to_string(),
            sink,
        })
    }
}

impl Deref for VoiceGuard {
    type Target = dyn PlaybackSink;

    fn deref(&self) -> &Self::Target {
        self.sink.as_ref()
    }
}

impl DerefMut for VoiceGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.sink.as_mut()
    }
}

impl Drop for VoiceGuard {
    fn drop(&mut self) {
        self.sink.disconnect();
        info!("left voice channel {}", self.channel);
    }
}
