//! CLI configuration

use crate::error::{CliError, Result};
use config::{builder::DefaultState, ConfigBuilder, Environment, File, FileFormat};
use riff_core::UserId;
use riff_playback::PlayerConfig;
use riff_remote::RemoteConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "riff.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RiffConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
    Remote,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Playlist owner; empty means signed out
    #[serde(default = "default_owner_id")]
    pub owner_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_simulated_track_ms")]
    pub simulated_track_ms: u64,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_max_playlist_name_len")]
    pub max_playlist_name_len: usize,
}

impl RiffConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `riff.toml` is optional.
    /// `RIFF_`-prefixed variables override the file, with `__` between
    /// section and key (`RIFF_STORAGE__BACKEND=memory`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(File::from(path.to_path_buf()).required(true)),
            None => settings.add_source(File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        settings = settings.add_source(
            Environment::with_prefix("RIFF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::build(settings)
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        Self::build(config::Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn build(settings: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.storage.backend {
            StorageBackend::Sqlite if self.storage.database_url.trim().is_empty() => {
                return Err(CliError::Config(
                    "database_url is required for the sqlite backend (set RIFF_STORAGE__DATABASE_URL)"
                        .to_string(),
                ));
            }
            StorageBackend::Remote => {
                if is_blank(self.remote.url.as_deref()) {
                    return Err(CliError::Config(
                        "remote.url is required for the remote backend (set RIFF_REMOTE__URL)"
                            .to_string(),
                    ));
                }
                if is_blank(self.remote.api_key.as_deref()) {
                    return Err(CliError::Config(
                        "remote.api_key is required for the remote backend (set RIFF_REMOTE__API_KEY)"
                            .to_string(),
                    ));
                }
            }
            _ => {}
        }

        if self.playback.simulated_track_ms == 0 || self.playback.tick_ms == 0 {
            return Err(CliError::Config(
                "playback.simulated_track_ms and playback.tick_ms must be positive".to_string(),
            ));
        }

        if self.playback.max_playlist_name_len == 0 {
            return Err(CliError::Config(
                "playback.max_playlist_name_len must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Signed-in owner, if any
    pub fn owner(&self) -> Option<UserId> {
        let owner = self.session.owner_id.trim();
        (!owner.is_empty()).then(|| UserId::new(owner))
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            owner: self.owner(),
            max_playlist_name_len: self.playback.max_playlist_name_len,
        }
    }

    pub fn remote_config(&self) -> Option<RemoteConfig> {
        let url = self.remote.url.clone()?;
        let api_key = self.remote.api_key.clone()?;
        let config = RemoteConfig::new(url, api_key);
        Some(match &self.remote.access_token {
            Some(token) => config.with_access_token(token.clone()),
            None => config,
        })
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.playback.tick_ms)
    }

    /// Copy safe to print: secrets are masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>".to_string());
        let mut copy = self.clone();
        copy.remote.api_key = mask(&self.remote.api_key);
        copy.remote.access_token = mask(&self.remote.access_token);
        copy
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

// Default values
impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: default_database_url(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            owner_id: default_owner_id(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            simulated_track_ms: default_simulated_track_ms(),
            tick_ms: default_tick_ms(),
            max_playlist_name_len: default_max_playlist_name_len(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./riff.db".to_string()
}

fn default_owner_id() -> String {
    "local".to_string()
}

fn default_simulated_track_ms() -> u64 {
    30_000
}

fn default_tick_ms() -> u64 {
    500
}

fn default_max_playlist_name_len() -> usize {
    50
}
