//! # HTTP Client Wrapper
//!
//! One place where requests are signed, sent and normalized.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service ──► request(method, "/categorias")                             │
//! │                 │  url    = <base>/api/<version>/categorias            │
//! │                 │  header = Authorization: Bearer <session token>      │
//! │                 ▼                                                       │
//! │              execute()                                                  │
//! │                 ├── no response       → ApiError(status 0, NETWORK)    │
//! │                 ├── 401               → session cleared, ApiError      │
//! │                 ├── other non-2xx     → ApiError from body             │
//! │                 └── 2xx               → Response                       │
//! │                                                                         │
//! │              execute_json::<T>()                                        │
//! │                 └── undecodable body  → ApiError(INVALID_RESPONSE)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ClientResult};
use crate::session::Session;

/// Shared REST client. Cheap to clone.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    session: Session,
}

impl HttpClient {
    /// Builds the client with the configured request timeout.
    pub fn new(config: Arc<ClientConfig>, session: Session) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(HttpClient {
            client,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying client, for unauthenticated calls outside the API tree.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Starts a request to `<base>/api/<version><endpoint>`, signed with the
    /// session token when one is present.
    pub fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.config.api_url(endpoint);
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub fn get(&self, endpoint: &str) -> RequestBuilder {
        self.request(Method::GET, endpoint)
    }

    pub fn post(&self, endpoint: &str) -> RequestBuilder {
        self.request(Method::POST, endpoint)
    }

    pub fn put(&self, endpoint: &str) -> RequestBuilder {
        self.request(Method::PUT, endpoint)
    }

    pub fn delete(&self, endpoint: &str) -> RequestBuilder {
        self.request(Method::DELETE, endpoint)
    }

    /// Sends the request and normalizes every failure into an [`ApiError`].
    pub async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed without a response");
            ApiError::network()
        })?;

        let status = response.status();
        debug!(
            path = %response.url().path(),
            status = status.as_u16(),
            "API response"
        );

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            warn!("API answered 401, clearing session");
            self.session.clear();
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response_body(status.as_u16(), &body);
        warn!(
            status = err.status,
            code = err.code.as_deref().unwrap_or("-"),
            message = %err.message,
            "API error"
        );
        Err(err)
    }

    /// Sends the request and decodes a JSON body.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `T = serde_json::Value`
    /// or `Option<_>` accept it.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.execute(request).await?;
        let status = response.status().as_u16();

        let body = response.text().await.map_err(|e| {
            warn!(error = %e, "Response body was lost");
            ApiError::network()
        })?;

        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::invalid_response(status, e))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url())
            .field("session", &self.session)
            .finish()
    }
}

// =============================================================================
// Test Support
// =============================================================================

/// In-process HTTP server for round-trip tests.
#[cfg(test)]
pub(crate) mod test_server {
    use super::*;
    use crate::session::MemoryTokenStore;

    /// Serves `router` on an ephemeral port and returns its base URL.
    pub async fn serve(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// A client pointed at `base_url`, signed in with `token` when given.
    pub fn client(base_url: &str, token: Option<&str>) -> HttpClient {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.to_string();
        config.api.timeout_secs = 5;

        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let session = Session::restore(Arc::new(store));
        HttpClient::new(Arc::new(config), session).unwrap()
    }
}
