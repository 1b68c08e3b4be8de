//! OAuth flow controller: login, callback handling, token refresh.
//!
//! One login attempt runs at a time: Idle → AwaitingCallback (after
//! [`AuthFlow::begin_login`]) → Exchanging → Authenticated, with the
//! attempt abandoned on any failure along the way. The PKCE context
//! persisted at the start of the attempt is removed once its callback
//! has been processed, success or failure, so a replayed redirect can
//! never complete a second exchange.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::callback::CallbackParams;
use crate::config::{AuthConfig, FlowMode};
use crate::error::{AuthError, Result};
use crate::pkce::PkceContext;
use crate::store::{SharedTokenStore, TokenBundle};

/// Bounded timeout for token endpoint calls.
const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Response body from the provider token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Providers may omit this, both on exchange (implicit-adjacent
    /// setups) and on refresh.
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: u64,
}

/// Drives login, callback handling, and refresh against one provider.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    config: AuthConfig,
    store: SharedTokenStore,
    http: reqwest::Client,
}

impl AuthFlow {
    pub fn new(config: AuthConfig, store: SharedTokenStore) -> Self {
        Self {
            config,
            store,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedTokenStore {
        &self.store
    }

    /// Start a login attempt: generate and persist a PKCE context, then
    /// build the authorization URL the user agent must visit.
    ///
    /// Control transfers to the identity provider from here; the attempt
    /// resumes in [`AuthFlow::handle_callback`] when the redirect comes
    /// back. Failures before the hand-off surface synchronously.
    pub async fn begin_login(&self) -> Result<String> {
        let pkce = PkceContext::generate();
        self.store.save_pkce(&pkce).await?;

        let challenge = pkce.challenge();
        let scope = self.config.scope_string();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("response_type", self.config.flow.response_type()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", challenge.as_str()),
            ("state", pkce.state.as_str()),
            ("scope", scope.as_str()),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        tracing::info!(mode = ?self.config.flow, "login attempt started");
        Ok(format!("{}?{}", self.config.auth_url, query))
    }

    /// Process the provider redirect for the current login attempt.
    ///
    /// Fails closed on a state mismatch without touching the network.
    pub async fn handle_callback(&self, params: &CallbackParams) -> Result<()> {
        let result = self.process_callback(params).await;

        // The login-attempt material is dropped on every processed
        // callback, success or failure.
        if let Err(e) = self.store.clear_pkce().await {
            tracing::warn!("failed to clear PKCE context: {e}");
        }

        match &result {
            Ok(()) => tracing::info!("login attempt completed"),
            Err(e) => tracing::warn!("login attempt failed: {e}"),
        }
        result
    }

    async fn process_callback(&self, params: &CallbackParams) -> Result<()> {
        let pkce = self
            .store
            .pkce()
            .await?
            .ok_or_else(|| AuthError::InvalidCallback("no login attempt in progress".into()))?;

        match params.state.as_deref() {
            Some(state) if state == pkce.state => {}
            _ => return Err(AuthError::StateMismatch),
        }

        if let Some(error) = &params.error {
            return Err(AuthError::TokenExchange(format!(
                "provider returned error: {error}"
            )));
        }

        match self.config.flow {
            FlowMode::AuthorizationCode => {
                let code = params
                    .code
                    .as_deref()
                    .ok_or_else(|| AuthError::InvalidCallback("no code in callback".into()))?;
                let response = self.exchange_code(code, &pkce.code_verifier).await?;
                self.persist(response, None).await
            }
            FlowMode::Implicit => {
                // No exchange phase, and never a refresh token.
                let access_token = params
                    .access_token
                    .as_deref()
                    .ok_or_else(|| AuthError::InvalidCallback("no token in fragment".into()))?;
                let expires_in = params
                    .expires_in
                    .ok_or_else(|| AuthError::InvalidCallback("no expiry in fragment".into()))?;
                let bundle = TokenBundle {
                    access_token: access_token.to_string(),
                    refresh_token: None,
                    expires_at: expires_at(expires_in),
                };
                self.store.save_tokens(&bundle).await
            }
        }
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenResponse> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .timeout(TOKEN_TIMEOUT)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("token exchange request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("HTTP {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("failed to parse token response: {e}")))
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Providers may omit `refresh_token` in the refresh response; the
    /// existing one is preserved in that case, never overwritten.
    pub async fn refresh(&self) -> Result<()> {
        let refresh_token = self
            .store
            .tokens()
            .await?
            .and_then(|t| t.refresh_token)
            .ok_or_else(|| AuthError::Refresh("no refresh token stored".into()))?;

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.config.client_id.as_str()),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .timeout(TOKEN_TIMEOUT)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("refresh request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AuthError::Refresh(format!("HTTP {}", response.status())));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Refresh(format!("failed to parse refresh response: {e}")))?;

        self.persist(parsed, Some(refresh_token)).await?;
        tracing::info!("access token refreshed");
        Ok(())
    }

    /// Remove stored credentials. Safe to call repeatedly.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear_tokens().await
    }

    /// Persist a token response, deriving the absolute expiry and keeping
    /// `previous_refresh` when the provider omitted a replacement.
    async fn persist(&self, response: TokenResponse, previous_refresh: Option<String>) -> Result<()> {
        let bundle = TokenBundle {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: expires_at(response.expires_in),
        };
        self.store.save_tokens(&bundle).await
    }
}

/// Absolute expiry in epoch milliseconds for a provider-declared
/// lifetime in seconds.
fn expires_at(expires_in_secs: u64) -> u64 {
    now_ms() + expires_in_secs * 1000
}

/// Current time as epoch milliseconds.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
