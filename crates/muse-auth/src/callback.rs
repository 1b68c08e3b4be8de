//! Parsing of the provider redirect.
//!
//! The authorization code flow returns its response in the redirect's
//! query string; the implicit flow returns it in the URL fragment. Both
//! use the same `key=value` encoding.

use crate::config::FlowMode;
use crate::error::{AuthError, Result};

/// Parameters carried by a provider redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code (code flow).
    pub code: Option<String>,
    /// Access token (implicit flow).
    pub access_token: Option<String>,
    /// Token lifetime in seconds (implicit flow).
    pub expires_in: Option<u64>,
    /// Anti-CSRF state echoed by the provider.
    pub state: Option<String>,
    /// Provider error string, e.g. `access_denied`.
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse from a query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "access_token" => params.access_token = Some(value.into_owned()),
                "expires_in" => params.expires_in = value.parse().ok(),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// Parse from a URL fragment (without the leading `#`).
    pub fn from_fragment(fragment: &str) -> Self {
        // Implicit-flow fragments use query-string encoding.
        Self::from_query(fragment)
    }

    /// Parse a full redirect URL, reading the query string or the
    /// fragment according to the active flow.
    pub fn parse_redirect_url(redirect: &str, mode: FlowMode) -> Result<Self> {
        let url = url::Url::parse(redirect.trim())
            .map_err(|e| AuthError::InvalidCallback(format!("unparseable redirect URL: {e}")))?;

        let params = match mode {
            FlowMode::AuthorizationCode => Self::from_query(url.query().unwrap_or_default()),
            FlowMode::Implicit => Self::from_fragment(url.fragment().unwrap_or_default()),
        };
        Ok(params)
    }
}
