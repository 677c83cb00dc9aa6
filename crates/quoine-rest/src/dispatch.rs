//! Request dispatch and response classification
//!
//! Sends a [`SignedRequest`] over the shared HTTP client and maps the result:
//!
//! - status 200: the body is returned (or decoded into the caller's type)
//! - any other status: the body is read in full and becomes
//!   [`RestError::OrderAlreadyExists`] when it is exactly the duplicate
//!   `client_order_id` payload, or [`RestError::Api`] carrying the raw body
//!   otherwise ([`RestError::NonUtf8Body`] when it is not valid UTF-8)
//!
//! Nothing is retried.

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::diagnostics::{DiagnosticEvent, SharedSink};
use crate::error::{RestError, RestResult};
use crate::request::SignedRequest;

/// A response as received, with its body fully read
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl RawResponse {
    /// HTTP status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Response body bytes, untouched
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Response body as text, if it is valid UTF-8
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Take the body bytes
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Decode the body as JSON
    pub fn decode<T: DeserializeOwned>(self) -> RestResult<T> {
        serde_json::from_slice(&self.body).map_err(|source| RestError::Decode {
            source,
            body: self.body,
        })
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HTTP/1.1 {}", self.status)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value.to_str().unwrap_or("<binary>"))?;
        }
        writeln!(f)?;
        write!(f, "{}", String::from_utf8_lossy(&self.body))
    }
}

/// Sends signed requests and classifies the responses
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct Dispatcher {
    http_client: Client,
    timeout: Duration,
    sink: SharedSink,
}

impl Dispatcher {
    /// Create a dispatcher with a per-call `timeout`
    pub fn new(timeout: Duration, sink: SharedSink) -> RestResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            timeout,
            sink,
        })
    }

    /// Per-call transport timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request and return the raw 200 response
    ///
    /// When `deadline` is set, the exchange is aborted once it passes and
    /// [`RestError::DeadlineExceeded`] is returned.
    pub async fn send(
        &self,
        request: SignedRequest,
        deadline: Option<Instant>,
    ) -> RestResult<RawResponse> {
        self.sink.record(&DiagnosticEvent::Request(&request));

        let result = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, self.exchange(request))
                .await
                .unwrap_or(Err(RestError::DeadlineExceeded)),
            None => self.exchange(request).await,
        };

        if let Err(err) = &result {
            self.sink.record(&DiagnosticEvent::Error(err));
        }

        result
    }

    /// Send a request and decode the 200 response body into `T`
    pub async fn send_and_decode<T: DeserializeOwned>(
        &self,
        request: SignedRequest,
        deadline: Option<Instant>,
    ) -> RestResult<T> {
        self.send(request, deadline).await?.decode()
    }

    async fn exchange(&self, request: SignedRequest) -> RestResult<RawResponse> {
        let method = request.method().clone();
        let path = request.signing_path().to_string();

        let response = request
            .into_reqwest(&self.http_client)
            .send()
            .await
            .map_err(RestError::from_transport)?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(RestError::from_transport)?;
        let raw = RawResponse {
            status,
            headers,
            body: bytes.to_vec(),
        };

        self.sink.record(&DiagnosticEvent::Response(&raw));

        if status != StatusCode::OK {
            warn!(%method, %path, %status, "Request failed");
            return Err(RestError::from_error_body(raw.body));
        }

        debug!(%method, %path, bytes = raw.body.len(), "Request succeeded");
        Ok(raw)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("timeout", &self.timeout)
            .field("sink", &"...")
            .finish()
    }
}
