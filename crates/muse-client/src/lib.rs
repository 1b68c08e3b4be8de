//! HTTP client for Spotify-compatible provider APIs.
//!
//! Every privileged call attaches the stored bearer token; on a 401 the
//! client performs exactly one transparent refresh-and-retry before
//! giving up. A 204 response is a successful empty result.
//!
//! # Example
//!
//! ```no_run
//! use muse_auth::{AuthConfig, AuthFlow, store};
//! use muse_client::ProviderClient;
//!
//! # async fn example() -> muse_client::Result<()> {
//! let flow = AuthFlow::new(AuthConfig::spotify(), store::memory_store());
//! let client = ProviderClient::builder()
//!     .base_url("https://api.spotify.com/v1")
//!     .flow(flow)
//!     .build()?;
//!
//! let profile = client.profile().me().await?;
//! println!("signed in as {}", profile.id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, ProviderClient};
pub use error::{Error, Result};
pub use types::*;
