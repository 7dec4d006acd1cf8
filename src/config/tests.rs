use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_jukebox_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", "/tmp/jukebox-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/jukebox-test-config.toml")
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
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("jukebox")
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
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("jukebox")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_appliance_layout() {
    let s = Settings::default();
    assert_eq!(s.library.music_dirs, vec!["Music".to_string()]);
    assert_eq!(s.library.extensions, vec!["mp3".to_string(), "wav".to_string()]);
    assert_eq!(s.library.max_tracks, 100);
    assert_eq!(s.audio.engine_volume_max, 21);
    assert_eq!(s.playback.load_failure, LoadFailurePolicy::Skip);
    assert!(s.playback.autoplay);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_and_parse_policy_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
root = "/sd"
music_dirs = ["Music", "Audio"]
extensions = ["mp3"]
max_tracks = 12
follow_links = false

[audio]
engine_volume_max = 30
initial_volume = 55

[playback]
autoplay = false
load_failure = "stop"

[runtime]
tick_interval_ms = 0
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("JUKEBOX__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.root, std::path::PathBuf::from("/sd"));
    assert_eq!(
        s.library.music_dirs,
        vec!["Music".to_string(), "Audio".to_string()]
    );
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert_eq!(s.library.max_tracks, 12);
    assert!(!s.library.follow_links);
    assert_eq!(s.audio.engine_volume_max, 30);
    assert_eq!(s.audio.initial_volume, 55);
    assert!(!s.playback.autoplay);
    assert_eq!(s.playback.load_failure, LoadFailurePolicy::Halt);
    assert_eq!(s.runtime.tick_interval_ms, 0);
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
initial_volume = 40
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("JUKEBOX__AUDIO__INITIAL_VOLUME", "75");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 75);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.engine_volume_max = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.max_tracks = 0;
    assert!(s.validate().is_err());
}

#[test]
fn list_settings_parse_comma_separated_env_values() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let _g1 = EnvGuard::set("JUKEBOX_CONFIG_PATH", missing.to_str().unwrap());
    let _g2 = EnvGuard::set("JUKEBOX__LIBRARY__MUSIC_DIRS", "Music,Audio");
    let _g3 = EnvGuard::remove("JUKEBOX__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.music_dirs, vec!["Music", "Audio"]);
    assert_eq!(s.library.extensions, LibrarySettings::default().extensions);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_reports_the_offending_key() {
    let mut s = Settings::default();
    s.audio.initial_volume = 101;
    let msg = s.validate().unwrap_err();
    assert!(msg.contains("audio.initial_volume"), "{msg}");
}
