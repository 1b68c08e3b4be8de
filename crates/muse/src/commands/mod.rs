//! CLI command handlers.

use std::path::PathBuf;

use muse_auth::{AuthFlow, SessionGuard, store};
use muse_client::ProviderClient;
use muse_config::MuseConfig;

pub mod chat;
pub mod devices;
pub mod login;
pub mod logout;
pub mod play;
pub mod profile;
pub mod status;
pub mod transfer;
pub mod volume;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration.
    pub config: MuseConfig,
    /// Data directory for tokens and preferences.
    pub data_dir: PathBuf,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// The auth flow over the file-backed token store.
    pub fn auth_flow(&self) -> AuthFlow {
        AuthFlow::new(
            self.config.provider.auth_config(),
            store::file_store(&self.data_dir),
        )
    }

    /// A session guard probing the provider profile endpoint.
    pub fn session_guard(&self) -> SessionGuard {
        SessionGuard::new(self.auth_flow(), self.config.provider.profile_url())
    }

    /// A provider API client backed by the auth flow.
    pub fn client(&self) -> anyhow::Result<ProviderClient> {
        Ok(ProviderClient::builder()
            .base_url(&self.config.provider.api_base_url)
            .flow(self.auth_flow())
            .build()?)
    }
}
