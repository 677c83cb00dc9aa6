//! Diagnostic sink for request/response dumps
//!
//! The dispatcher hands every outbound request, every raw response and every
//! dispatch error to a [`DiagnosticSink`]. Sinks only observe: they run
//! synchronously, cannot fail, and have no influence on the call's result.
//!
//! # Example
//!
//! ```
//! use quoine_rest::diagnostics::DiagnosticEvent;
//! use quoine_rest::{ClientConfig, Credentials};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new(Credentials::new("12345", "secret")?)
//!     .with_diagnostics(|event: &DiagnosticEvent<'_>| eprintln!("{}", event));
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::dispatch::RawResponse;
use crate::error::RestError;
use crate::request::SignedRequest;

/// Something worth recording about a dispatch
#[derive(Debug, Clone, Copy)]
pub enum DiagnosticEvent<'a> {
    /// Request about to be sent
    Request(&'a SignedRequest),
    /// Raw response as received, before classification
    Response(&'a RawResponse),
    /// Dispatch ended in an error
    Error(&'a RestError),
}

impl fmt::Display for DiagnosticEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(req) => write!(f, "Request:  {}", req),
            Self::Response(res) => write!(f, "Response: {}", res),
            Self::Error(err) => write!(f, "err: {}", err),
        }
    }
}

/// Receiver for diagnostic events
///
/// Implemented for any `Fn(&DiagnosticEvent<'_>) + Send + Sync` closure.
pub trait DiagnosticSink: Send + Sync {
    /// Record one event. Keep this fast; it runs inline with the request.
    fn record(&self, event: &DiagnosticEvent<'_>);
}

/// Shared, type-erased sink
pub type SharedSink = Arc<dyn DiagnosticSink>;

impl<F> DiagnosticSink for F
where
    F: Fn(&DiagnosticEvent<'_>) + Send + Sync,
{
    fn record(&self, event: &DiagnosticEvent<'_>) {
        self(event)
    }
}

/// Sink that discards everything (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _event: &DiagnosticEvent<'_>) {}
}

/// Sink that writes full dumps to `tracing` at DEBUG level
///
/// Events go to the `quoine_rest::wire` target so they can be enabled
/// separately, e.g. `RUST_LOG=quoine_rest::wire=debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &DiagnosticEvent<'_>) {
        debug!(target: "quoine_rest::wire", "{}", event);
    }
}
