//! Error types for authentication operations

/// Errors that can occur while handling credentials or signing tokens
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// The secret could not be used to sign or verify a token
    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
