//! Persisted player preferences.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};

/// Preference file name within the muse data directory.
pub const PREFS_FILE: &str = "player.json";

/// Playback volume used when none has been saved.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Player preferences that survive restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPrefs {
    /// Playback volume, 0.0–1.0.
    pub volume: f32,
}

impl Default for PlayerPrefs {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlayerPrefs {
    /// Load from the data dir, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(PREFS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save to the data dir, creating it as needed.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| PlayerError::Prefs(format!("failed to create data directory: {e}")))?;
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PlayerError::Prefs(e.to_string()))?;
        std::fs::write(data_dir.join(PREFS_FILE), json)
            .map_err(|e| PlayerError::Prefs(format!("failed to write preferences: {e}")))?;
        Ok(())
    }

    /// The stored volume clamped to the valid range.
    pub fn clamped_volume(&self) -> f32 {
        self.volume.clamp(0.0, 1.0)
    }
}
