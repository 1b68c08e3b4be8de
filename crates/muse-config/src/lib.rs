//! Configuration system for the muse music assistant.
//!
//! TOML-based configuration with:
//! - Provider endpoints, client id, scopes, and flow mode
//! - Player defaults (volume, announced device name)
//! - File discovery (project-local `muse.toml`, then the XDG user config)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, config_dir, data_dir, load_config, load_config_from, save_config,
};
pub use error::{ConfigError, Result};
pub use types::{MuseConfig, PlayerConfig, ProviderConfig};
