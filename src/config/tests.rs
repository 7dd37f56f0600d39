use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Sets (or clears) one variable and restores the previous value on drop.
struct EnvGuard {
    key: &'static str,
    previous: Option<OsString>,
}

impl EnvGuard {
    fn replace(key: &'static str, value: Option<&str>) -> Self {
        let previous = env::var_os(key);
        apply(key, value.map(OsString::from));
        Self { key, previous }
    }

    fn set(key: &'static str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    fn remove(key: &'static str) -> Self {
        Self::replace(key, None)
    }
}

fn apply(key: &str, value: Option<OsString>) {
    // Callers hold `env_lock`, so no other test reads the environment meanwhile.
    unsafe {
        match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        apply(self.key, self.previous.take());
    }
}

#[test]
fn resolve_config_path_prefers_allegro_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", "/tmp/allegro-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/allegro-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/xdg-config-home")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("allegro")
            .join("config.toml")
    );
}

#[test]
fn defaults_describe_a_local_music_folder() {
    let s = Settings::default();
    assert_eq!(s.bot.prefix, "!bot");
    assert_eq!(s.cache.dir, PathBuf::from("music"));
    assert_eq!(s.cache.extension, "mp4");
    assert_eq!(s.audio.interrupt_poll_ms, 20);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[bot]
prefix = "!dj"
default_channel = "lounge"

[cache]
dir = "/srv/allegro/cache"
extension = "m4a"

[source]
base_url = "https://catalogue.example"
timeout_secs = 5

[audio]
interrupt_poll_ms = 10
volume = 0.5

[library]
extensions = ["mp3"]
include_hidden = true

[log]
filter = "allegro=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ALLEGRO__AUDIO__INTERRUPT_POLL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.bot.prefix, "!dj");
    assert_eq!(s.bot.default_channel, "lounge");
    assert_eq!(s.cache.dir, PathBuf::from("/srv/allegro/cache"));
    assert_eq!(s.cache.extension, "m4a");
    assert_eq!(s.source.base_url, "https://catalogue.example");
    assert_eq!(s.source.timeout_secs, 5);
    assert_eq!(s.audio.interrupt_poll_ms, 10);
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.include_hidden);
    assert_eq!(s.log.filter, "allegro=debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
interrupt_poll_ms = 40
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ALLEGRO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ALLEGRO__AUDIO__INTERRUPT_POLL_MS", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.interrupt_poll_ms, 15);
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.audio.interrupt_poll_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.source.base_url = "ftp://nope".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.cache.extension = ".".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.source.timeout_secs = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.source.download_timeout_secs = 5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.bot.prefix = "hey bot".to_string();
    assert!(s.validate().is_err());
}
