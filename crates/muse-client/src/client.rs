//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use muse_auth::AuthFlow;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::api::{PlayerApi, ProfileApi};
use crate::error::{Error, ErrorResponse, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider API client.
///
/// Reads the bearer token from the token store on every request so a
/// refresh performed mid-session is picked up immediately, and retries
/// exactly once after a transparent refresh when the provider answers
/// 401.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
#[derive(Debug)]
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Auth flow used for token reads and the 401 refresh.
    pub(crate) flow: AuthFlow,
}

impl ProviderClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the profile API.
    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.clone())
    }

    /// Access the player API.
    pub fn player(&self) -> PlayerApi {
        PlayerApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self.execute(Method::GET, url, None).await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Make a GET request where the provider may answer 204 for "no
    /// content right now".
    pub(crate) async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>> {
        let url = self.url(path)?;
        let response = self.execute(Method::GET, url, None).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Make a PUT request expecting an empty success (200/202/204).
    pub(crate) async fn put_empty<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        self.put_empty_with_query(path, &[], body).await
    }

    /// Like [`ProviderClient::put_empty`] with extra query parameters.
    pub(crate) async fn put_empty_with_query<B>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let mut url = self.url(path)?;
        for (key, value) in query {
            url.query_pairs_mut().append_pair(key, value);
        }
        let body = serde_json::to_value(body)?;
        let response = self.execute(Method::PUT, url, Some(&body)).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Send a request with the stored bearer token, refreshing and
    /// retrying exactly once on a 401. A second 401, or a failed
    /// refresh, is final.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let response = self.send_once(method.clone(), url.clone(), body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(%url, "provider answered 401, refreshing and retrying once");
        self.inner
            .flow
            .refresh()
            .await
            .map_err(|e| Error::Auth(format!("token refresh failed: {e}")))?;

        let response = self.send_once(method, url, body).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Auth(
                "provider rejected the refreshed token".to_string(),
            ));
        }
        Ok(response)
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let token = self.access_token().await?;
        let mut request = self
            .inner
            .http
            .request(method, url)
            .bearer_auth(token)
            .timeout(self.inner.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn access_token(&self) -> Result<String> {
        let tokens = self
            .inner
            .flow
            .store()
            .tokens()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;
        tokens
            .map(|t| t.access_token)
            .ok_or_else(|| Error::Auth("no access token stored".to_string()))
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        match response.json::<ErrorResponse>().await {
            Ok(body) => Error::Api {
                status,
                message: body.error.message,
            },
            Err(_) => Error::Api {
                status,
                message: format!("HTTP {status}"),
            },
        }
    }
}

/// Builder for creating a [`ProviderClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    flow: Option<AuthFlow>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            flow: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the auth flow supplying tokens and refreshes.
    pub fn flow(mut self, flow: AuthFlow) -> Self {
        self.flow = Some(flow);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ProviderClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;
        let flow = self
            .flow
            .ok_or_else(|| Error::Config("auth flow is required".to_string()))?;

        // Parse and normalize the base URL so `join` appends paths.
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("muse-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(ProviderClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                flow,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
