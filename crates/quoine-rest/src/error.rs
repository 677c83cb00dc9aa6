//! Error types for REST API operations

use quoine_auth::AuthError;

/// Error body returned when a `client_order_id` has already been used
///
/// Matched byte for byte against non-200 response bodies.
pub const ORDER_ALREADY_EXISTS_BODY: &str = r#"{"errors":{"client_order_id":["exists"]}}"#;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Missing or empty API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Base URL is not a valid absolute URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The request token could not be signed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Client configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request parameters could not be encoded
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request hit the transport timeout
    #[error("Request timed out")]
    Timeout,

    /// Caller-supplied deadline passed before the exchange finished
    #[error("Request cancelled: deadline exceeded")]
    DeadlineExceeded,

    /// The `client_order_id` of a new order is already in use
    #[error("Order already exists: client_order_id is taken")]
    OrderAlreadyExists,

    /// Non-200 response; carries the raw response body
    #[error("{0}")]
    Api(String),

    /// Non-200 response whose body is not valid UTF-8; carries the raw bytes
    #[error("Non-UTF-8 error body ({} bytes)", .0.len())]
    NonUtf8Body(Vec<u8>),

    /// 200 response whose body does not match the expected shape
    #[error("Failed to decode response: {source}")]
    Decode {
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Raw response body
        body: Vec<u8>,
    },
}

impl RestError {
    /// Classify the body of a non-200 response
    pub fn from_error_body(body: Vec<u8>) -> Self {
        if body == ORDER_ALREADY_EXISTS_BODY.as_bytes() {
            return Self::OrderAlreadyExists;
        }
        match String::from_utf8(body) {
            Ok(text) => Self::Api(text),
            Err(e) => Self::NonUtf8Body(e.into_bytes()),
        }
    }

    /// Map a transport error, separating timeouts from other failures
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Check if this error is the duplicate `client_order_id` conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::OrderAlreadyExists)
    }

    /// Check if this error came from the network exchange itself
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout | Self::DeadlineExceeded)
    }

    /// Check if this error prevented a client from being created
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials(_)
                | Self::EnvVarNotSet(_)
                | Self::InvalidEndpoint(_)
                | Self::InvalidConfig(_)
        )
    }

    /// Server response body as text, if there is one and it is valid UTF-8
    pub fn api_body(&self) -> Option<&str> {
        match self {
            Self::Api(body) => Some(body),
            Self::OrderAlreadyExists => Some(ORDER_ALREADY_EXISTS_BODY),
            Self::Decode { body, .. } => std::str::from_utf8(body).ok(),
            _ => None,
        }
    }

    /// Server response body exactly as received
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Self::Api(body) => Some(body.as_bytes()),
            Self::OrderAlreadyExists => Some(ORDER_ALREADY_EXISTS_BODY.as_bytes()),
            Self::NonUtf8Body(body) | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials(msg) => Self::InvalidCredentials(msg),
            AuthError::EnvVarNotSet(var) => Self::EnvVarNotSet(var),
            AuthError::Signing(e) => Self::Signing(e.to_string()),
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
