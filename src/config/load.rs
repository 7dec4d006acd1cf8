use std::{env, path::PathBuf};

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

/// Variables look like `JUKEBOX__AUDIO__INITIAL_VOLUME=60`.
const ENV_PREFIX: &str = "JUKEBOX";
const ENV_SEPARATOR: &str = "__";
/// Points at an explicit config file, bypassing the XDG lookup.
const CONFIG_PATH_VAR: &str = "JUKEBOX_CONFIG_PATH";
/// Keys whose env values are comma-separated lists, e.g. `Music,Audio`.
const LIST_KEYS: [&str; 2] = ["library.music_dirs", "library.extensions"];

fn env_source() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

impl Settings {
    /// Layer the environment over the config file (if one exists) over the
    /// built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        builder.add_source(env_source()).build()?.try_deserialize()
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let problem = if self.audio.engine_volume_max == 0 {
            "audio.engine_volume_max must be >= 1"
        } else if self.audio.initial_volume > 100 {
            "audio.initial_volume must be <= 100"
        } else if self.library.max_tracks == 0 {
            "library.max_tracks must be >= 1"
        } else {
            return Ok(());
        };
        Err(problem.to_string())
    }
}

/// `$JUKEBOX_CONFIG_PATH` when set, otherwise the per-user default.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `jukebox/config.toml` under `$XDG_CONFIG_HOME`, or under `~/.config`.
/// `None` when neither variable is set.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join("jukebox").join("config.toml"))
}
