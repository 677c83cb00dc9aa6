//! Signed request construction
//!
//! Turns a verb, path, optional query and optional JSON body into a
//! [`SignedRequest`] carrying the `X-Quoine-Auth` token. Building a request
//! never touches the network.

use std::collections::BTreeMap;
use std::fmt;

use quoine_auth::TokenSigner;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Url};
use tracing::trace;

use crate::error::{RestError, RestResult};

/// Header carrying the API version marker
pub const API_VERSION_HEADER: &str = "x-quoine-api-version";
/// Header carrying the signed request token
pub const AUTH_HEADER: &str = "x-quoine-auth";
/// API version sent with every request
pub const API_VERSION: &str = "2";

/// Default `User-Agent`: client name, version and platform
pub fn default_user_agent() -> String {
    format!(
        "quoine-rest/{} (rust; {}-{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Query string parameters
///
/// Keys are unique and kept sorted, so the same set of parameters always
/// encodes to the same string. Parameters with empty values are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value.to_string());
        self
    }

    /// Add a parameter only when a value is present
    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Check if no parameter would be sent
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }

    /// Form-urlencode the non-empty parameters in key order
    pub fn encode(&self) -> RestResult<String> {
        let pairs: Vec<(&str, &str)> = self
            .0
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        serde_urlencoded::to_string(pairs).map_err(|e| RestError::InvalidParameter(e.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A fully built, signed outbound request
///
/// Built once per call, handed to the dispatcher and consumed there.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: Method,
    url: Url,
    signing_path: String,
    headers: HeaderMap,
    body: Option<String>,
}

impl SignedRequest {
    /// HTTP verb
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Final request URL, including the query string
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Path and query exactly as signed into the token's `path` claim
    pub fn signing_path(&self) -> &str {
        &self.signing_path
    }

    /// All request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Signed request token
    pub fn token(&self) -> Option<&str> {
        self.headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok())
    }

    /// JSON body, if any
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub(crate) fn into_reqwest(self, client: &Client) -> reqwest::RequestBuilder {
        let builder = client.request(self.method, self.url).headers(self.headers);
        match self.body {
            Some(body) => builder.body(body),
            None => builder,
        }
    }
}

impl fmt::Display for SignedRequest {
    /// Renders the request like a wire dump, with the token elided
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} HTTP/1.1", self.method, self.url)?;
        for (name, value) in &self.headers {
            if name.as_str() == AUTH_HEADER {
                writeln!(f, "{}: [signed token]", name)?;
            } else {
                writeln!(f, "{}: {}", name, value.to_str().unwrap_or("<binary>"))?;
            }
        }
        if let Some(body) = &self.body {
            writeln!(f)?;
            write!(f, "{}", body)?;
        }
        Ok(())
    }
}

/// Builds signed requests against a fixed base URL
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
    signer: TokenSigner,
    user_agent: HeaderValue,
}

impl RequestBuilder {
    /// Create a builder
    ///
    /// # Errors
    /// Returns [`RestError::InvalidEndpoint`] if `base_url` is not an absolute
    /// URL usable as a base, or carries its own query or fragment.
    pub fn new(base_url: &str, signer: TokenSigner, user_agent: &str) -> RestResult<Self> {
        let base_url = parse_base_url(base_url)?;
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| RestError::InvalidConfig(format!("user agent: {}", e)))?;

        Ok(Self {
            base_url,
            signer,
            user_agent,
        })
    }

    /// Base URL requests are built against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Signer used for request tokens
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Build and sign a request
    ///
    /// `path` is appended verbatim to the base URL's path and percent-encoded
    /// where needed. The token's `path` claim is that encoded path, without
    /// the base URL's own prefix, plus `?` and the encoded query when one is
    /// present.
    pub fn build(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        query: Option<&QueryParams>,
    ) -> RestResult<SignedRequest> {
        let query = match query {
            Some(params) => params.encode()?,
            None => String::new(),
        };

        let mut url = self.base_url.clone();
        let base_path = match self.base_url.path() {
            "/" => "",
            p => p,
        };
        url.set_path(&format!("{}{}", base_path, path));

        // Sign the percent-encoded path exactly as it goes on the wire
        let sent_path = url.path();
        let sent_path = sent_path.strip_prefix(base_path).unwrap_or(sent_path);

        let signing_path = if query.is_empty() {
            sent_path.to_string()
        } else {
            let signing_path = format!("{}?{}", sent_path, query);
            url.set_query(Some(&query));
            signing_path
        };

        let token = self.signer.sign_path(signing_path.as_str())?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(USER_AGENT, self.user_agent.clone());
        headers.insert(
            HeaderName::from_static(AUTH_HEADER),
            HeaderValue::from_str(&token).map_err(|e| RestError::Signing(e.to_string()))?,
        );

        trace!(%method, %url, "Built signed request");

        Ok(SignedRequest {
            method,
            url,
            signing_path,
            headers,
            body,
        })
    }
}

fn parse_base_url(base_url: &str) -> RestResult<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| RestError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(RestError::InvalidEndpoint(format!(
            "{}: not a base URL",
            base_url
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(RestError::InvalidEndpoint(format!(
            "{}: base URL must not carry a query or fragment",
            base_url
        )));
    }

    Ok(url)
}
