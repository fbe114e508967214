//! Scalar display and voice preferences.
//!
//! Stored as bare strings (not JSON) under their own keys, next to the
//! conversation data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use parley_core::storage_keys;
use parley_storage::error::StorageError;
use parley_storage::kv::KeyValueStore;

pub const DEFAULT_VOICE_SPEED: f32 = 1.0;
pub const DEFAULT_FONT_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub voice_speed: f32,
    pub font_size: u32,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            voice_speed: DEFAULT_VOICE_SPEED,
            font_size: DEFAULT_FONT_SIZE,
            theme: Theme::default(),
        }
    }
}

impl Preferences {
    /// Read every preference, falling back to its default when missing or
    /// unparseable.
    pub fn load(storage: &impl KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            voice_speed: read_scalar(storage, storage_keys::VOICE_SPEED)
                .filter(|speed: &f32| speed.is_finite() && *speed > 0.0)
                .unwrap_or(defaults.voice_speed),
            font_size: read_scalar(storage, storage_keys::MESSAGE_FONT_SIZE)
                .unwrap_or(defaults.font_size),
            theme: read_scalar(storage, storage_keys::THEME).unwrap_or(defaults.theme),
        }
    }

    /// Write every preference. Each key is attempted even if an earlier one
    /// failed; the first error is returned.
    pub fn save(&self, storage: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let values = [
            (storage_keys::VOICE_SPEED, self.voice_speed.to_string()),
            (storage_keys::MESSAGE_FONT_SIZE, self.font_size.to_string()),
            (storage_keys::THEME, self.theme.to_string()),
        ];

        let mut first_err = None;
        for (key, value) in values {
            if let Err(e) = storage.set(key, &value) {
                warn!(key, error = %e, "could not save preference");
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

fn read_scalar<T>(storage: &impl KeyValueStore, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "could not read preference");
            return None;
        }
    };

    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "ignoring unparseable preference");
            None
        }
    }
}
