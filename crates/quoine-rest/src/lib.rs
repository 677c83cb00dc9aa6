//! REST API client for the Quoine/Liquid cryptocurrency exchange
//!
//! This crate provides a typed client for the exchange's HTTP API:
//! products, order books, interest rate ladders, executions, and order
//! placement and management.
//!
//! # Authentication
//!
//! Every request carries an HS256 JWT in the `X-Quoine-Auth` header. The
//! token's claims hold the request path (including the query string), a
//! nonce and the API token id, signed with the API secret.
//!
//! # Errors
//!
//! Only HTTP 200 is treated as success. Any other status becomes
//! [`RestError::Api`] carrying the raw response body, except for the
//! duplicate `client_order_id` response, which is reported as
//! [`RestError::OrderAlreadyExists`] so callers can treat retries as
//! idempotent.
//!
//! # Example
//!
//! ```no_run
//! use quoine_rest::{CreateOrderRequest, OrderSide, QuoineClient, RestError};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = QuoineClient::from_env()?;
//!
//!     let book = client.get_order_book(5, false).await?;
//!     println!("best bid: {:?}", book.best_bid());
//!
//!     let order = CreateOrderRequest::limit(5, OrderSide::Buy, Decimal::new(1, 2), Decimal::new(500, 0))
//!         .with_client_order_id("my-order-1");
//!
//!     match client.create_order(&order).await {
//!         Ok(order) => println!("placed order {}", order.id),
//!         Err(RestError::OrderAlreadyExists) => println!("already placed"),
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod diagnostics;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod request;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, QuoineClient, DEFAULT_BASE_URL};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, NoopSink, TracingSink};
pub use dispatch::{Dispatcher, RawResponse};
pub use error::{RestError, RestResult, ORDER_ALREADY_EXISTS_BODY};
pub use quoine_auth::{AuthClaims, Credentials, TokenSigner};
pub use request::{QueryParams, RequestBuilder, SignedRequest};
pub use tokio::time::Instant;

// Re-export endpoint-specific types
pub use types::{
    // Market data
    Execution, Executions, InterestRates, PriceLevels, Product,
    // Orders
    CreateOrderRequest, EditOrderRequest, Order, OrderExecution, OrderFilter, OrderSide,
    OrderStatus, OrderType, Orders, Trade,
};
