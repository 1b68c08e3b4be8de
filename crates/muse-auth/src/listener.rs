//! Local HTTP listener that captures the provider redirect.
//!
//! Code flow only: the implicit grant carries its response in the URL
//! fragment, which never reaches a server; that variant accepts a
//! pasted redirect URL instead (see [`crate::callback::CallbackParams`]).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::RawQuery;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tokio::sync::{Mutex, oneshot};

use crate::callback::CallbackParams;
use crate::error::{AuthError, Result};

/// Page shown in the browser once the redirect has been captured.
const CALLBACK_PAGE: &str = "<!DOCTYPE html>\
<html><head><title>Muse</title></head>\
<body><p>Signed in. You can close this tab and return to the terminal.</p></body></html>";

/// One-shot listener bound to the host and port of the redirect URI.
#[derive(Debug)]
pub struct CallbackListener {
    addr: SocketAddr,
    path: String,
    listener: tokio::net::TcpListener,
}

impl CallbackListener {
    /// Bind to the address named by `redirect_uri`.
    pub async fn bind(redirect_uri: &str) -> Result<Self> {
        let url = url::Url::parse(redirect_uri)
            .map_err(|e| AuthError::InvalidCallback(format!("unparseable redirect URI: {e}")))?;
        let host = url.host_str().unwrap_or("127.0.0.1").to_string();
        let port = url.port().unwrap_or(80);
        let path = if url.path().is_empty() {
            "/".to_string()
        } else {
            url.path().to_string()
        };

        let listener = tokio::net::TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|e| AuthError::Network(format!("failed to bind callback listener: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AuthError::Network(e.to_string()))?;

        tracing::debug!(%addr, path, "callback listener bound");
        Ok(Self { addr, path, listener })
    }

    /// The bound address (useful when the redirect URI names port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until the first request hits the callback path, then return
    /// its parsed query parameters.
    pub async fn wait(self) -> Result<CallbackParams> {
        let (query_tx, query_rx) = oneshot::channel::<String>();
        let query_tx = Arc::new(Mutex::new(Some(query_tx)));

        let app = Router::new().route(
            &self.path,
            get(move |RawQuery(query): RawQuery| {
                let query_tx = query_tx.clone();
                async move {
                    if let Some(tx) = query_tx.lock().await.take() {
                        let _ = tx.send(query.unwrap_or_default());
                    }
                    Html(CALLBACK_PAGE)
                }
            }),
        );

        // Forward the captured query out of the graceful-shutdown future
        // so the response is flushed before the server stops.
        let (result_tx, result_rx) = oneshot::channel::<String>();
        let shutdown = async move {
            if let Ok(query) = query_rx.await {
                let _ = result_tx.send(query);
            }
        };

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AuthError::Network(format!("callback listener failed: {e}")))?;

        let query = result_rx.await.map_err(|_| {
            AuthError::Network("callback listener stopped without a redirect".into())
        })?;
        Ok(CallbackParams::from_query(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_first_redirect() {
        let listener = CallbackListener::bind("http://127.0.0.1:0/callback")
            .await
            .unwrap();
        let addr = listener.local_addr();

        let request = tokio::spawn(async move {
            reqwest::get(format!("http://{addr}/callback?code=abc&state=xyz"))
                .await
                .unwrap()
        });

        let params = listener.wait().await.unwrap();
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert_eq!(params.state.as_deref(), Some("xyz"));

        let response = request.await.unwrap();
        assert!(response.status().is_success());
        assert!(response.text().await.unwrap().contains("return to the terminal"));
    }

    #[tokio::test]
    async fn test_rejects_unparseable_redirect_uri() {
        assert!(CallbackListener::bind("not a url").await.is_err());
    }
}
