//! Voice output: the sink contract, the scoped channel guard and the `rodio`
//! speaker implementation.

mod sink;
mod types;
mod voice;

pub use sink::{SpeakerConnector, SpeakerSink};
pub use types::*;
pub use voice::VoiceGuard;
