//! Config file discovery.
//!
//! Resolution order (first hit wins):
//! 1. `./muse.toml` (project-local)
//! 2. `~/.config/muse/config.toml` (XDG user config)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::types::MuseConfig;

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "muse.toml";

/// Default config filename within the XDG config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for XDG directory resolution.
const APP_NAME: &str = "muse";

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The loaded configuration.
    pub config: MuseConfig,
    /// The file it came from; `None` when built-in defaults were used.
    pub source: Option<PathBuf>,
}

/// XDG config directory for muse, honoring `MUSE_CONFIG_DIR`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("MUSE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Data directory for tokens and player preferences, honoring
/// `MUSE_DATA_DIR`.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("MUSE_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::data_dir().map(|d| d.join(APP_NAME))
}

/// Load configuration using the default discovery order.
pub fn load_config() -> Result<LoadedConfig> {
    load_config_from(Path::new("."), config_dir().as_deref())
}

/// Load configuration with explicit directories (tests and embedders).
pub fn load_config_from(project_dir: &Path, user_config_dir: Option<&Path>) -> Result<LoadedConfig> {
    let mut candidates = vec![project_dir.join(PROJECT_CONFIG_FILE)];
    if let Some(dir) = user_config_dir {
        candidates.push(dir.join(USER_CONFIG_FILE));
    }

    for path in candidates {
        if path.is_file() {
            let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
                path: path.display().to_string(),
                source: e,
            })?;
            let config = MuseConfig::from_toml(&contents)?;
            return Ok(LoadedConfig {
                config,
                source: Some(path),
            });
        }
    }

    Ok(LoadedConfig {
        config: MuseConfig::default(),
        source: None,
    })
}

/// Save configuration to a file, creating parent directories as needed.
pub fn save_config(config: &MuseConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })
}
