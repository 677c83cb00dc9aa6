//! Credentials and request token signing for the Quoine/Liquid REST API
//!
//! Every private request to the exchange carries an `X-Quoine-Auth` header
//! holding a compact HS256 JWT. The token binds three claims together:
//! the request path (including its query string), a nonce taken from the
//! wall clock, and the caller's API token id. Tokens are minted per request
//! and never reused.
//!
//! # Example
//!
//! ```
//! use quoine_auth::{Credentials, TokenSigner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let creds = Credentials::new("12345", "my-api-secret")?;
//! let signer = TokenSigner::new(creds);
//!
//! let token = signer.sign_path("/orders?product_id=1")?;
//! assert_eq!(token.split('.').count(), 3);
//! # Ok(())
//! # }
//! ```

mod credentials;
mod error;
mod token;

pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use token::{AuthClaims, TokenSigner};
