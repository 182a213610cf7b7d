use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
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
fn resolve_config_path_prefers_sonata_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SONATA_CONFIG_PATH", "/tmp/sonata-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/sonata-test-config.toml")
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
            .join("sonata")
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
            .join("sonata")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.audio.initial_volume, 0.5);
    assert_eq!(s.audio.completion_poll_ms, 200);
    assert!(s.library.recursive);
    assert!(s.library.follow_links);
    assert!(s.library.include_hidden);
    assert_eq!(s.library.max_depth, None);
    assert_eq!(s.playback.tick_interval_ms, 500);
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
[audio]
initial_volume = 0.8
completion_poll_ms = 50

[library]
recursive = false
include_hidden = false
follow_links = false
max_depth = 3

[playback]
tick_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SONATA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SONATA__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 0.8);
    assert_eq!(s.audio.completion_poll_ms, 50);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.playback.tick_interval_ms, 250);
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
completion_poll_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SONATA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SONATA__AUDIO__COMPLETION_POLL_MS", "75");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.completion_poll_ms, 75);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("does-not-exist.toml");
    let _g1 = EnvGuard::set("SONATA_CONFIG_PATH", cfg_path.to_str().unwrap());

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.tick_interval_ms, 500);
}

#[test]
fn validate_rejects_zero_intervals() {
    let mut s = Settings::default();
    s.audio.completion_poll_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.tick_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = f32::NAN;
    assert!(s.validate().is_err());
}
