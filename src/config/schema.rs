use std::path::PathBuf;

use serde::Deserialize;

/// Top-level bot settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/allegro/config.toml` or `~/.config/allegro/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ALLEGRO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bot: BotSettings,
    pub cache: CacheSettings,
    pub source: SourceSettings,
    pub audio: AudioSettings,
    pub library: LibrarySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Leading word a message must carry to be treated as a command.
    pub prefix: String,
    /// Channel used by console lines that do not name one with `@channel`.
    pub default_channel: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            prefix: "!bot".to_string(),
            default_channel: "console".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Flat directory holding downloaded tracks as `<id>.<extension>`.
    pub dir: PathBuf,
    /// Extension (without dot) given to downloaded tracks.
    pub extension: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("music"),
            extension: "mp4".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Base URL of the track catalogue (`/playlists/{id}`, `/tracks/{id}`).
    pub base_url: String,
    /// Whole-request timeout for catalogue lookups, and the connect/response
    /// timeout for audio downloads (seconds).
    pub timeout_secs: u64,
    /// Upper bound on one complete audio download (seconds).
    pub download_timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
            download_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often a rendering track checks for next/prev/stop (milliseconds).
    /// One voice frame is 20ms.
    pub interrupt_poll_ms: u64,
    /// Output volume multiplier (1.0 = unchanged).
    pub volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            interrupt_poll_ms: 20,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions `play all` treats as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether `play all` includes dotfiles. Staged downloads are dotfiles.
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp4".into(),
                "m4a".into(),
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
            ],
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "allegro=info".to_string(),
        }
    }
}
