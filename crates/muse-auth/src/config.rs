//! Provider configuration for the OAuth flow.

use serde::{Deserialize, Serialize};

/// Capability scopes requested at login.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-library-read",
    "user-top-read",
    "user-read-recently-played",
    "streaming",
];

/// Which OAuth grant the flow controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    /// Authorization Code with PKCE. Yields a refresh token.
    #[default]
    AuthorizationCode,
    /// Implicit grant: the access token arrives directly in the redirect
    /// fragment. No code exchange, and never a refresh token.
    Implicit,
}

impl FlowMode {
    /// The `response_type` authorization parameter for this mode.
    pub fn response_type(self) -> &'static str {
        match self {
            FlowMode::AuthorizationCode => "code",
            FlowMode::Implicit => "token",
        }
    }
}

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub flow: FlowMode,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::spotify()
    }
}

impl AuthConfig {
    /// Create a config for the Spotify accounts service.
    pub fn spotify() -> Self {
        Self {
            client_id: "54cc45b87374449585152aedac126fdf".to_string(),
            auth_url: "https://accounts.spotify.com/authorize".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            flow: FlowMode::AuthorizationCode,
        }
    }

    /// The space-joined scope list sent to the authorization endpoint.
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_defaults() {
        let config = AuthConfig::default();
        assert!(config.auth_url.contains("accounts.spotify.com"));
        assert_eq!(config.scopes.len(), 11);
        assert_eq!(config.flow, FlowMode::AuthorizationCode);
    }

    #[test]
    fn test_scope_string_space_joined() {
        let config = AuthConfig {
            scopes: vec!["streaming".into(), "user-read-private".into()],
            ..AuthConfig::spotify()
        };
        assert_eq!(config.scope_string(), "streaming user-read-private");
    }

    #[test]
    fn test_response_type_by_mode() {
        assert_eq!(FlowMode::AuthorizationCode.response_type(), "code");
        assert_eq!(FlowMode::Implicit.response_type(), "token");
    }
}
