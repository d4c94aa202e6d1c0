//! Login service.

use backoffice_core::Credentials;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::http::HttpClient;

const ENDPOINT: &str = "/login";

/// Successful login body. Fields besides the token are passed through.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// `POST /login`; stores the token in the session on success.
#[derive(Debug, Clone)]
pub struct AuthService {
    http: HttpClient,
}

impl AuthService {
    pub fn new(http: HttpClient) -> Self {
        AuthService { http }
    }

    /// Signs in and returns the access token.
    ///
    /// A 2xx answer without a non-empty `accessToken` is an error
    /// (`NO_TOKEN`, status 200).
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        info!(username = %credentials.username, "Signing in");

        let request = self.http.post(ENDPOINT).json(credentials);
        let response: LoginResponse = self.http.execute_json(request).await?;

        let token = response
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::no_token(200))?;

        self.http.session().set_token(token.clone());
        info!(username = %credentials.username, "Signed in");
        Ok(token)
    }

    /// Drops the session token.
    pub fn logout(&self) {
        self.http.session().clear();
    }
}
