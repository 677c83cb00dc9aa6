//! API credentials for the Quoine/Liquid REST API
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Keeps the secret out of `Debug` output
//! - Requires explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AuthError, AuthResult};

/// Environment variable holding the API token id
pub const TOKEN_ID_ENV: &str = "QUOINE_API_TOKEN_ID";
/// Environment variable holding the API secret
pub const SECRET_ENV: &str = "QUOINE_API_SECRET";

/// API credentials used to sign requests
///
/// Both the token id and the secret must be non-empty. Neither is ever sent
/// in a request body; the token id only appears inside the signed token.
pub struct Credentials {
    /// API token id (public)
    token_id: String,
    /// API secret (zeroized on drop)
    secret: SecretString,
}

impl Credentials {
    /// Create new credentials from a token id and secret
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if either value is empty.
    pub fn new(token_id: impl Into<String>, secret: impl Into<String>) -> AuthResult<Self> {
        let token_id = token_id.into();
        let secret = secret.into();

        if token_id.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "API token id is not set".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "API secret is not set".to_string(),
            ));
        }

        Ok(Self {
            token_id,
            secret: SecretString::from(secret),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `QUOINE_API_TOKEN_ID` and `QUOINE_API_SECRET` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let token_id = std::env::var(TOKEN_ID_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(TOKEN_ID_ENV.to_string()))?;
        let secret = std::env::var(SECRET_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(SECRET_ENV.to_string()))?;

        Self::new(token_id, secret)
    }

    /// Get the API token id
    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            token_id: self.token_id.clone(),
            secret: SecretString::from(self.secret.expose_secret().to_owned()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.token_id.chars().take(4).collect();
        f.debug_struct("Credentials")
            .field("token_id", &format!("{}...", prefix))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
