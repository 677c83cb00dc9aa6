//! API endpoint implementations
//!
//! Each endpoint is a thin instantiation of the signing and dispatch
//! pipeline: a verb, a path, and optionally a query string or JSON body.

pub mod market;
pub mod orders;

pub use market::MarketEndpoints;
pub use orders::OrderEndpoints;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::Instant;

use crate::dispatch::Dispatcher;
use crate::error::{RestError, RestResult};
use crate::request::{QueryParams, RequestBuilder};
use crate::types::OrderEnvelope;

/// Everything one endpoint call needs
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallContext<'a> {
    builder: &'a RequestBuilder,
    dispatcher: &'a Dispatcher,
    deadline: Option<Instant>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(
        builder: &'a RequestBuilder,
        dispatcher: &'a Dispatcher,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            builder,
            dispatcher,
            deadline,
        }
    }

    /// Build, sign, send and decode one request
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        query: Option<&QueryParams>,
    ) -> RestResult<T> {
        let request = self.builder.build(method, path, body, query)?;
        self.dispatcher.send_and_decode(request, self.deadline).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&QueryParams>,
    ) -> RestResult<T> {
        self.call(Method::GET, path, None, query).await
    }
}

/// Serialize an order mutation inside its `{"order": ...}` envelope
pub(crate) fn order_body<T: Serialize>(order: &T) -> RestResult<String> {
    serde_json::to_string(&OrderEnvelope { order }).map_err(RestError::Encode)
}
