//! Runtime settings
//!
//! Replaces the process-wide option table and static margins with one value
//! that is loaded once and passed to whoever needs it.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Extra vertical offset for overlay windows on macOS (menu bar).
pub const MACOS_TITLE_BAR_OFFSET: i32 = 22;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds an element waits when it has no own timeout.
    pub auto_wait_timeout: f64,
    pub margin: i32,
    pub padding: i32,
    /// Margin used by `Element::grow_with`.
    pub grow_margin: i32,
    /// Seconds the CLI shows an overlay when no duration is given.
    pub show_time: u64,
    /// Delay before a deferred overlay appears.
    pub show_delay_ms: u64,
    /// Delay before a deferred overlay vanishes again; 0 keeps it until stopped.
    pub vanish_delay_ms: u64,
    pub display_width: u32,
    pub display_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_wait_timeout: 3.0,
            margin: 50,
            padding: 10,
            grow_margin: 20,
            show_time: 3,
            show_delay_ms: 0,
            vanish_delay_ms: 0,
            display_width: 1920,
            display_height: 1080,
        }
    }
}

impl Settings {
    /// Read settings from a TOML file. Keys not present keep their defaults.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Like `load`, but a missing file means defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = ?path, "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }

    pub fn vanish_delay(&self) -> Option<Duration> {
        (self.vanish_delay_ms > 0).then(|| Duration::from_millis(self.vanish_delay_ms))
    }
}
