//! OAuth 2.0 authentication for Spotify-compatible streaming providers.
//!
//! Implements the Authorization Code with PKCE flow (and the degraded
//! Implicit Grant variant), token persistence, and session validation.
//! The hosting application owns the pieces explicitly: a [`TokenStore`]
//! holds persisted credentials, an [`AuthFlow`] drives login, callback
//! handling, and refresh against one provider, and a [`SessionGuard`]
//! answers "can this session make privileged calls right now?".

pub mod callback;
pub mod config;
pub mod error;
pub mod flow;
pub mod listener;
pub mod pkce;
pub mod session;
pub mod store;

pub use {
    callback::CallbackParams,
    config::{AuthConfig, DEFAULT_SCOPES, FlowMode},
    error::{AuthError, Result},
    flow::AuthFlow,
    listener::CallbackListener,
    pkce::PkceContext,
    session::{SessionGuard, SessionStatus},
    store::{FileTokenStore, MemoryTokenStore, SharedTokenStore, TokenBundle, TokenStore},
};
