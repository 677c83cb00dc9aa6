//! Request token signing
//!
//! Produces the HS256 JWT carried in the `X-Quoine-Auth` header.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::credentials::Credentials;
use crate::error::AuthResult;

/// Claims carried by every request token
///
/// The server checks `path` against the request it received, so it must be
/// exactly the path and query string that goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Request path plus `?query` when a query string is present
    pub path: String,
    /// Wall-clock seconds at signing time
    pub nonce: i64,
    /// API token id of the signing client
    pub token_id: String,
}

impl AuthClaims {
    /// Create claims for `path`, stamped with the current time
    pub fn new(path: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self::with_nonce(path, Utc::now().timestamp(), token_id)
    }

    /// Create claims with an explicit nonce
    pub fn with_nonce(path: impl Into<String>, nonce: i64, token_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            nonce,
            token_id: token_id.into(),
        }
    }
}

/// Signs request tokens with the client's secret
///
/// Holds no mutable state, so one signer can be shared across tasks.
#[derive(Clone)]
pub struct TokenSigner {
    credentials: Credentials,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenSigner {
    /// Create a signer for the given credentials
    pub fn new(credentials: Credentials) -> Self {
        let encoding_key = EncodingKey::from_secret(credentials.secret_bytes());
        let decoding_key = DecodingKey::from_secret(credentials.secret_bytes());

        Self {
            credentials,
            encoding_key,
            decoding_key,
        }
    }

    /// Get the credentials used by this signer
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build fresh claims for `path`
    pub fn claims_for(&self, path: impl Into<String>) -> AuthClaims {
        AuthClaims::new(path, self.credentials.token_id())
    }

    /// Sign a set of claims into a compact JWT
    pub fn sign(&self, claims: &AuthClaims) -> AuthResult<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
        trace!(path = %claims.path, nonce = claims.nonce, "Signed request token");
        Ok(token)
    }

    /// Mint and sign a new token for `path`
    pub fn sign_path(&self, path: impl Into<String>) -> AuthResult<String> {
        let claims = self.claims_for(path);
        self.sign(&claims)
    }

    /// Verify a token produced by this signer and return its claims
    ///
    /// Only the signature is checked; the tokens carry no expiry.
    pub fn verify(&self, token: &str) -> AuthResult<AuthClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<AuthClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("credentials", &self.credentials)
            .field("algorithm", &"HS256")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    fn signer() -> TokenSigner {
        TokenSigner::new(Credentials::new("apiTokenID", "secret").unwrap())
    }

    #[test]
    fn test_token_has_three_parts() {
        let token = signer().sign_path("/products").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_claims_round_trip() {
        let signer = signer();
        let claims = AuthClaims::with_nonce("/orders?product_id=1", 1_462_123_639, "apiTokenID");
        let token = signer.sign(&claims).unwrap();

        assert_eq!(signer.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_claims_carry_token_id_and_current_time() {
        let signer = signer();
        let before = Utc::now().timestamp();
        let claims = signer.claims_for("/orders/1");
        let after = Utc::now().timestamp();

        assert_eq!(claims.token_id, "apiTokenID");
        assert_eq!(claims.path, "/orders/1");
        assert!(claims.nonce >= before && claims.nonce <= after);
    }

    #[test]
    fn test_claim_names_on_the_wire() {
        let claims = AuthClaims::with_nonce("/products", 10, "id");
        let json = serde_json::to_value(&claims).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(object["path"], "/products");
        assert_eq!(object["nonce"], 10);
        assert_eq!(object["token_id"], "id");
    }

    #[test]
    fn test_same_nonce_signs_twice() {
        let signer = signer();
        let claims = AuthClaims::with_nonce("/products", 100, "apiTokenID");

        let first = signer.sign(&claims).unwrap();
        let second = signer.sign(&claims).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_foreign_secret_fails_verification() {
        let token = signer().sign_path("/products").unwrap();
        let other = TokenSigner::new(Credentials::new("apiTokenID", "other").unwrap());

        assert!(matches!(other.verify(&token), Err(AuthError::Signing(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("HS256"));
        assert!(debug.contains("[REDACTED]"));
    }
}
