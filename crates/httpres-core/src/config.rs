use crate::error::{ResourceError, Result};
use crate::source::parse_duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process-wide defaults loaded from `~/.config/httpres/config.toml`.
///
/// Per-resource values (URL, headers, credentials, timeout) come from the
/// request's `source`; these only fill in what a source does not say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overall request timeout when the source sets none (duration string).
    pub default_timeout: String,
    /// Maximum time to establish the connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Follow 3xx redirects.
    pub follow_redirects: bool,
    /// Redirect hop limit when `follow_redirects` is on.
    pub max_redirections: u32,
    /// `User-Agent` sent unless the source configures its own.
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_timeout: "5m".to_string(),
            connect_timeout_secs: 30,
            follow_redirects: true,
            max_redirections: 10,
            user_agent: concat!("httpres/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    pub fn default_timeout(&self) -> Result<Duration> {
        parse_duration(self.default_timeout.trim()).map_err(|reason| {
            ResourceError::InvalidTimeout {
                value: self.default_timeout.clone(),
                reason,
            }
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

pub fn config_path() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("httpres").ok()?;
    Some(xdg_dirs.get_config_home().join("config.toml"))
}

/// Load settings from `path`; a missing file yields the built-in defaults.
pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        tracing::debug!("no settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    let data = fs::read_to_string(path).map_err(|e| ResourceError::Settings {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let settings: Settings = toml::from_str(&data).map_err(|e| ResourceError::Settings {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    settings.default_timeout()?;
    Ok(settings)
}

/// Load settings from the XDG config location, falling back to defaults when
/// no config home can be determined.
pub fn load() -> Result<Settings> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Settings::default()),
    }
}
