//! Error types for the authentication flow.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Callback state did not match the stored anti-CSRF state.
    /// Fatal to the current login attempt, never retried.
    #[error("callback state does not match the stored login attempt")]
    StateMismatch,

    /// Token endpoint rejected the authorization-code exchange.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// No refresh token stored, or the token endpoint rejected the refresh.
    /// Callers must treat this as "re-authentication required".
    #[error("token refresh failed: {0}")]
    Refresh(String),

    /// Network/HTTP error.
    #[error("network error: {0}")]
    Network(String),

    /// Callback parameters were missing or malformed.
    #[error("invalid callback: {0}")]
    InvalidCallback(String),

    /// Token storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Network(e.to_string())
    }
}
