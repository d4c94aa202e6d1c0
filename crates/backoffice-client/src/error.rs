//! # Client Error Types
//!
//! Error types for the REST layer and the client runtime.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    ApiError     │  │ DomainErrorCode │  │      ClientError        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  message        │  │  C.ITDx0001     │  │  InvalidConfig          │ │
//! │  │  status (0=net) │──│  S.ITDx0001     │  │  InvalidUrl             │ │
//! │  │  code           │  │  P.ITDx0001/2   │  │  ConfigLoad/SaveFailed  │ │
//! │  │                 │  │  NETWORK_ERROR  │  │  Session                │ │
//! │  │                 │  │  NO_TOKEN ...   │  │  Serialization          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Services return ApiResult. Stores absorb every ApiError into a        │
//! │  MutationOutcome or their error field; nothing reaches the operator    │
//! │  as a panic or an Err.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoffice_core::messages;
use thiserror::Error;

/// Result type alias for REST calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for client runtime operations.
pub type ClientResult<T> = Result<T, ClientError>;

// =============================================================================
// Domain Error Codes
// =============================================================================

/// Machine-readable codes carried in `errorCode` of an error body, plus the
/// codes the client assigns itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainErrorCode {
    /// `C.ITDx0001`: category still has products.
    CategoryHasProducts,
    /// `S.ITDx0001`: subcategory still has products.
    SubcategoryHasProducts,
    /// `P.ITDx0001`: product references a missing or inactive category.
    ProductInvalidCategory,
    /// `P.ITDx0002`: product name already taken.
    ProductDuplicateName,
    /// No response was received.
    Network,
    /// Login succeeded but carried no access token.
    NoToken,
    /// A 2xx body could not be decoded.
    InvalidResponse,
    /// The request could not be built.
    InvalidRequest,
}

impl DomainErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainErrorCode::CategoryHasProducts => "C.ITDx0001",
            DomainErrorCode::SubcategoryHasProducts => "S.ITDx0001",
            DomainErrorCode::ProductInvalidCategory => "P.ITDx0001",
            DomainErrorCode::ProductDuplicateName => "P.ITDx0002",
            DomainErrorCode::Network => "NETWORK_ERROR",
            DomainErrorCode::NoToken => "NO_TOKEN",
            DomainErrorCode::InvalidResponse => "INVALID_RESPONSE",
            DomainErrorCode::InvalidRequest => "INVALID_REQUEST",
        }
    }

    /// Parses a wire code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "C.ITDx0001" => Some(DomainErrorCode::CategoryHasProducts),
            "S.ITDx0001" => Some(DomainErrorCode::SubcategoryHasProducts),
            "P.ITDx0001" => Some(DomainErrorCode::ProductInvalidCategory),
            "P.ITDx0002" => Some(DomainErrorCode::ProductDuplicateName),
            "NETWORK_ERROR" => Some(DomainErrorCode::Network),
            "NO_TOKEN" => Some(DomainErrorCode::NoToken),
            "INVALID_RESPONSE" => Some(DomainErrorCode::InvalidResponse),
            "INVALID_REQUEST" => Some(DomainErrorCode::InvalidRequest),
            _ => None,
        }
    }

    /// Curated operator message for the server-side conflict codes.
    pub fn curated_message(&self) -> Option<&'static str> {
        match self {
            DomainErrorCode::CategoryHasProducts => Some(messages::CATEGORY_DELETE_WITH_PRODUCTS),
            DomainErrorCode::SubcategoryHasProducts => {
                Some(messages::SUBCATEGORY_DELETE_WITH_PRODUCTS)
            }
            DomainErrorCode::ProductInvalidCategory => Some(messages::PRODUCT_INVALID_CATEGORY),
            DomainErrorCode::ProductDuplicateName => Some(messages::PRODUCT_DUPLICATE_NAME),
            _ => None,
        }
    }
}

impl std::fmt::Display for DomainErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// API Error
// =============================================================================

/// A failed REST call, normalized.
///
/// ## Status Semantics
/// - `0`: no response (connection refused, timeout, body lost)
/// - `200`: the call succeeded but its body was unusable (e.g. no token)
/// - anything else: the HTTP status the server answered with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Operator-facing message (server text or a pt-BR fallback).
    pub message: String,

    /// HTTP status, or 0 when no response arrived.
    pub status: u16,

    /// Server `errorCode` or a client-assigned code.
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, code: Option<String>) -> Self {
        ApiError {
            message: message.into(),
            status,
            code,
        }
    }

    /// No response was received from the server.
    pub fn network() -> Self {
        ApiError::new(
            messages::CONNECTION_ERROR,
            0,
            Some(DomainErrorCode::Network.as_str().to_string()),
        )
    }

    /// Login answered 2xx without an access token.
    pub fn no_token(status: u16) -> Self {
        ApiError::new(
            messages::TOKEN_MISSING,
            status,
            Some(DomainErrorCode::NoToken.as_str().to_string()),
        )
    }

    /// A 2xx body could not be decoded.
    pub fn invalid_response(status: u16, detail: impl std::fmt::Display) -> Self {
        ApiError::new(
            format!("Resposta inválida do servidor: {}", detail),
            status,
            Some(DomainErrorCode::InvalidResponse.as_str().to_string()),
        )
    }

    /// The request itself could not be assembled.
    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        ApiError::new(
            format!("Requisição inválida: {}", detail),
            0,
            Some(DomainErrorCode::InvalidRequest.as_str().to_string()),
        )
    }

    /// Builds the error for a non-2xx response from its body text.
    ///
    /// ## Body Rules
    /// ```text
    /// JSON object   → message = .message (or "Erro <status>"), code = .errorCode
    /// non-empty text → message = text
    /// empty body    → message = "Erro <status>"
    /// ```
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let fallback = format!("Erro {}", status);

        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
            let message = map
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(fallback);
            let code = map
                .get("errorCode")
                .and_then(|c| c.as_str())
                .map(str::to_string);
            return ApiError::new(message, status, code);
        }

        let text = body.trim();
        if text.is_empty() {
            ApiError::new(fallback, status, None)
        } else {
            ApiError::new(text, status, None)
        }
    }

    // =========================================================================
    // Categorization
    // =========================================================================

    /// 401 or 403.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// No response was received.
    pub fn is_network_error(&self) -> bool {
        self.status == 0 && self.domain_code() == Some(DomainErrorCode::Network)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// The known code carried by this error, if any.
    pub fn domain_code(&self) -> Option<DomainErrorCode> {
        self.code.as_deref().and_then(DomainErrorCode::from_code)
    }

    /// The message, or `fallback` when the message is blank.
    pub fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}

// =============================================================================
// Client Error
// =============================================================================

/// Errors raised by the client runtime outside of individual REST calls.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// API base URL is malformed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Token could not be read or persisted.
    #[error("Session storage error: {0}")]
    Session(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Failed to serialize a value.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::HttpClient(err.to_string())
    }
}

impl ClientError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }
}
