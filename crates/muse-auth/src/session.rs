//! Session validity: expiry checks and the authentication probe.

use std::time::Duration;

use crate::flow::{AuthFlow, now_ms};
use crate::store::TokenBundle;

/// Safety margin before the stored expiry at which a token already
/// counts as expired. Failing toward re-authentication beats sending a
/// request the provider will reject.
const EXPIRY_MARGIN_MS: u64 = 300_000;

/// Bounded timeout for the profile probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Session validity, computed fresh from stored credentials and the
/// clock on every check. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No credentials stored.
    Unauthenticated,
    /// Access token usable and outside the expiry margin.
    Valid,
    /// Inside the expiry margin; a refresh is due.
    ExpiringSoon,
    /// Past the stored expiry.
    Expired,
    /// The provider rejected the token and a refresh did not recover it.
    Invalid,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Unauthenticated => write!(f, "not authenticated"),
            SessionStatus::Valid => write!(f, "valid"),
            SessionStatus::ExpiringSoon => write!(f, "expiring soon"),
            SessionStatus::Expired => write!(f, "expired"),
            SessionStatus::Invalid => write!(f, "invalid"),
        }
    }
}

/// Decides, before any privileged operation, whether the current
/// session is usable, refreshing or demanding re-authentication as
/// needed.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    flow: AuthFlow,
    profile_url: String,
    http: reqwest::Client,
}

impl SessionGuard {
    /// Create a guard probing `profile_url` for token liveness.
    pub fn new(flow: AuthFlow, profile_url: impl Into<String>) -> Self {
        Self {
            flow,
            profile_url: profile_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// True when no credentials are stored, or the current time is
    /// within the 300-second safety margin of the stored expiry.
    pub fn is_expired(tokens: Option<&TokenBundle>) -> bool {
        match tokens {
            None => true,
            Some(t) => now_ms() > t.expires_at.saturating_sub(EXPIRY_MARGIN_MS),
        }
    }

    /// Classify the stored session against the clock alone.
    pub async fn status(&self) -> SessionStatus {
        let tokens = match self.flow.store().tokens().await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!("token store read failed: {e}");
                None
            }
        };

        match tokens {
            None => SessionStatus::Unauthenticated,
            Some(t) => {
                let now = now_ms();
                if now > t.expires_at {
                    SessionStatus::Expired
                } else if now > t.expires_at.saturating_sub(EXPIRY_MARGIN_MS) {
                    SessionStatus::ExpiringSoon
                } else {
                    SessionStatus::Valid
                }
            }
        }
    }

    /// Check whether the session can make privileged calls right now.
    ///
    /// An expired token skips the probe and goes straight to refresh. A
    /// live-looking token is probed against the profile endpoint; a 401
    /// triggers exactly one refresh, any other failure is reported as-is.
    /// Failures surface as `false` with the cause logged; callers treat
    /// `false` as "re-authenticate or ask the user to retry".
    pub async fn check_auth(&self) -> bool {
        let tokens = match self.flow.store().tokens().await {
            Ok(Some(tokens)) => tokens,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("token store read failed: {e}");
                return false;
            }
        };

        if Self::is_expired(Some(&tokens)) {
            return self.try_refresh().await;
        }

        match self.probe(&tokens.access_token).await {
            Ok(status) if status.is_success() => true,
            Ok(status) if status == reqwest::StatusCode::UNAUTHORIZED => self.try_refresh().await,
            Ok(status) => {
                tracing::warn!(%status, "profile probe failed");
                false
            }
            Err(e) => {
                tracing::warn!("profile probe error: {e}");
                false
            }
        }
    }

    /// Like [`SessionGuard::check_auth`], but distinguishing a
    /// provider-rejected token from a missing one.
    pub async fn check_auth_status(&self) -> SessionStatus {
        let clock_status = self.status().await;
        match clock_status {
            SessionStatus::Unauthenticated => SessionStatus::Unauthenticated,
            _ => {
                if self.check_auth().await {
                    SessionStatus::Valid
                } else {
                    SessionStatus::Invalid
                }
            }
        }
    }

    async fn probe(&self, access_token: &str) -> reqwest::Result<reqwest::StatusCode> {
        let response = self
            .http
            .get(&self.profile_url)
            .bearer_auth(access_token)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;
        Ok(response.status())
    }

    async fn try_refresh(&self) -> bool {
        match self.flow.refresh().await {
            Ok(()) => true,
            Err(e) => {
                tracing::info!("refresh failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, FlowMode};
    use crate::store::MemoryTokenStore;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bundle(expires_at: u64, refresh: Option<&str>) -> TokenBundle {
        TokenBundle {
            access_token: "access".to_string(),
            refresh_token: refresh.map(|s| s.to_string()),
            expires_at,
        }
    }

    fn guard_for(server: &MockServer, tokens: Option<TokenBundle>) -> SessionGuard {
        let store: Arc<MemoryTokenStore> = match tokens {
            Some(t) => Arc::new(MemoryTokenStore::with_tokens(t)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let config = AuthConfig {
            client_id: "test-client".to_string(),
            auth_url: format!("{}/authorize", server.uri()),
            token_url: format!("{}/api/token", server.uri()),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            scopes: vec![],
            flow: FlowMode::AuthorizationCode,
        };
        let flow = AuthFlow::new(config, store);
        SessionGuard::new(flow, format!("{}/v1/me", server.uri()))
    }

    fn mock_refresh_ok(expect: u64) -> Mock {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "refreshed",
                "expires_in": 3600
            })))
            .expect(expect)
    }

    #[test]
    fn test_is_expired_margin() {
        assert!(SessionGuard::is_expired(None));
        // Less than 300 000 ms in the future: expired.
        assert!(SessionGuard::is_expired(Some(&bundle(now_ms() + 100_000, None))));
        // More than 300 000 ms in the future: live.
        assert!(!SessionGuard::is_expired(Some(&bundle(now_ms() + 400_000, None))));
        // Already past.
        assert!(SessionGuard::is_expired(Some(&bundle(now_ms().saturating_sub(1000), None))));
    }

    #[tokio::test]
    async fn test_status_classification() {
        let server = MockServer::start().await;

        let guard = guard_for(&server, None);
        assert_eq!(guard.status().await, SessionStatus::Unauthenticated);

        let guard = guard_for(&server, Some(bundle(now_ms() + 3_600_000, None)));
        assert_eq!(guard.status().await, SessionStatus::Valid);

        let guard = guard_for(&server, Some(bundle(now_ms() + 100_000, None)));
        assert_eq!(guard.status().await, SessionStatus::ExpiringSoon);

        let guard = guard_for(&server, Some(bundle(now_ms().saturating_sub(1000), None)));
        assert_eq!(guard.status().await, SessionStatus::Expired);
    }

    #[tokio::test]
    async fn test_check_auth_unauthenticated() {
        let server = MockServer::start().await;
        let guard = guard_for(&server, None);
        assert!(!guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_expiring_skips_probe_and_refreshes() {
        let server = MockServer::start().await;
        mock_refresh_ok(1).mount(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 100_000, Some("refresh"))));
        assert!(guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_expired_refresh_failure_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 100_000, Some("refresh"))));
        assert!(!guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_probe_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "u1"})))
            .expect(1)
            .mount(&server)
            .await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 3_600_000, None)));
        assert!(guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_probe_401_refreshes_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        mock_refresh_ok(1).mount(&server).await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 3_600_000, Some("refresh"))));
        assert!(guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_probe_401_no_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 3_600_000, None)));
        assert!(!guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_other_probe_failure_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 3_600_000, Some("refresh"))));
        assert!(!guard.check_auth().await);
    }

    #[tokio::test]
    async fn test_check_auth_status_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let guard = guard_for(&server, Some(bundle(now_ms() + 3_600_000, Some("refresh"))));
        assert_eq!(guard.check_auth_status().await, SessionStatus::Invalid);
    }
}
