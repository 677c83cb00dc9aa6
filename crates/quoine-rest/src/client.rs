//! Main REST client implementation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quoine_auth::{Credentials, TokenSigner};
use reqwest::{Method, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::info;

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, NoopSink, SharedSink};
use crate::dispatch::Dispatcher;
use crate::endpoints::{CallContext, MarketEndpoints, OrderEndpoints};
use crate::error::{RestError, RestResult};
use crate::request::{default_user_agent, QueryParams, RequestBuilder};
use crate::types::{
    CreateOrderRequest, Execution, Executions, InterestRates, Order, OrderFilter, Orders,
    PriceLevels, Product, Trade,
};

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.liquid.com";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Quoine/Liquid REST API client
///
/// Cloning is cheap and clones share the connection pool. The client holds
/// no mutable state, so it can be used from many tasks at once.
///
/// # Example
///
/// ```no_run
/// use quoine_rest::QuoineClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = QuoineClient::new("12345", "my-api-secret")?;
///
///     let product = client.get_product(5).await?;
///     println!("{}: {:?}", product.currency_pair_code, product.last_price());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct QuoineClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    builder: RequestBuilder,
    dispatcher: Dispatcher,
}

impl QuoineClient {
    /// Create a client for the production API
    ///
    /// # Errors
    /// Fails if either credential is empty.
    pub fn new(token_id: impl Into<String>, secret: impl Into<String>) -> RestResult<Self> {
        let credentials = Credentials::new(token_id, secret)?;
        Self::with_credentials(credentials)
    }

    /// Create a client from existing credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::new(credentials))
    }

    /// Create a client from `QUOINE_API_TOKEN_ID` and `QUOINE_API_SECRET`
    pub fn from_env() -> RestResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a client with custom configuration
    ///
    /// # Errors
    /// Fails if the base URL is not an absolute URL, the timeout is zero,
    /// the user agent is not a valid header value, or the HTTP client cannot
    /// be created.
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        if config.timeout_secs == 0 {
            return Err(RestError::InvalidConfig(
                "timeout must be at least 1 second".to_string(),
            ));
        }

        let user_agent = config.user_agent.unwrap_or_else(default_user_agent);
        let builder = RequestBuilder::new(
            &config.base_url,
            TokenSigner::new(config.credentials),
            &user_agent,
        )?;
        let dispatcher = Dispatcher::new(Duration::from_secs(config.timeout_secs), config.sink)?;

        info!(base_url = %builder.base_url(), "Created Quoine REST client");

        Ok(Self {
            inner: Arc::new(ClientInner {
                builder,
                dispatcher,
            }),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        self.inner.builder.base_url()
    }

    /// Credentials used to sign requests
    pub fn credentials(&self) -> &Credentials {
        self.inner.builder.signer().credentials()
    }

    /// Signed request builder used by this client
    pub fn request_builder(&self) -> &RequestBuilder {
        &self.inner.builder
    }

    /// Dispatcher used by this client
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    /// Sign, send and decode a request to any endpoint
    ///
    /// # Arguments
    /// * `method` - HTTP verb
    /// * `path` - Path appended to the base URL, e.g. "/accounts/balance"
    /// * `body` - JSON body
    /// * `query` - Query parameters; empty values are left out
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        query: Option<&QueryParams>,
    ) -> RestResult<T> {
        self.context(None).call(method, path, body, query).await
    }

    fn context(&self, deadline: Option<Instant>) -> CallContext<'_> {
        CallContext::new(&self.inner.builder, &self.inner.dispatcher, deadline)
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Get market data endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self.context(None))
    }

    /// Get market data endpoints whose calls are aborted at `deadline`
    pub fn market_until(&self, deadline: Instant) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self.context(Some(deadline)))
    }

    /// Get order endpoints
    pub fn orders(&self) -> OrderEndpoints<'_> {
        OrderEndpoints::new(self.context(None))
    }

    /// Get order endpoints whose calls are aborted at `deadline`
    pub fn orders_until(&self, deadline: Instant) -> OrderEndpoints<'_> {
        OrderEndpoints::new(self.context(Some(deadline)))
    }

    // ========================================================================
    // Market Endpoints
    // ========================================================================

    /// Get all products
    pub async fn get_products(&self) -> RestResult<Vec<Product>> {
        self.market().get_products().await
    }

    /// Get a single product
    pub async fn get_product(&self, product_id: u64) -> RestResult<Product> {
        self.market().get_product(product_id).await
    }

    /// Get the order book for a product
    pub async fn get_order_book(&self, product_id: u64, full: bool) -> RestResult<PriceLevels> {
        self.market().get_order_book(product_id, full).await
    }

    /// Get the interest rate ladder for a currency
    pub async fn get_interest_rates(&self, currency: &str) -> RestResult<InterestRates> {
        self.market().get_interest_rates(currency).await
    }

    /// Get a page of executions for a product
    pub async fn get_executions(
        &self,
        product_id: u64,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> RestResult<Executions> {
        self.market().get_executions(product_id, limit, page).await
    }

    /// Get executions for a product after a timestamp
    pub async fn get_executions_by_timestamp(
        &self,
        product_id: u64,
        timestamp: i64,
        limit: Option<u32>,
    ) -> RestResult<Vec<Execution>> {
        self.market()
            .get_executions_by_timestamp(product_id, timestamp, limit)
            .await
    }

    // ========================================================================
    // Order Endpoints
    // ========================================================================

    /// Get a single order
    pub async fn get_order(&self, order_id: u64) -> RestResult<Order> {
        self.orders().get_order(order_id).await
    }

    /// List orders
    pub async fn get_orders(&self, filter: &OrderFilter) -> RestResult<Orders> {
        self.orders().get_orders(filter).await
    }

    /// Place a new order
    pub async fn create_order(&self, order: &CreateOrderRequest) -> RestResult<Order> {
        self.orders().create_order(order).await
    }

    /// Cancel an order
    pub async fn cancel_order(&self, order_id: u64) -> RestResult<Order> {
        self.orders().cancel_order(order_id).await
    }

    /// Edit a live order
    pub async fn edit_order(
        &self,
        order_id: u64,
        quantity: Decimal,
        price: Decimal,
    ) -> RestResult<Order> {
        self.orders().edit_order(order_id, quantity, price).await
    }

    /// Get the trades opened by an order
    pub async fn get_order_trades(&self, order_id: u64) -> RestResult<Vec<Trade>> {
        self.orders().get_order_trades(order_id).await
    }
}

impl fmt::Debug for QuoineClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoineClient")
            .field("base_url", &self.base_url().as_str())
            .field("credentials", self.credentials())
            .field("timeout", &self.dispatcher().timeout())
            .finish()
    }
}

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// API credentials
    pub credentials: Credentials,
    /// Base URL of the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Receiver for request/response dumps
    pub sink: SharedSink,
}

impl ClientConfig {
    /// Create a configuration for the production API
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            sink: Arc::new(NoopSink),
        }
    }

    /// Create a configuration with credentials from the environment
    pub fn from_env() -> RestResult<Self> {
        Ok(Self::new(Credentials::from_env()?))
    }

    /// Set the base URL (e.g. a sandbox or a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the 10 second transport timeout
    ///
    /// Zero is rejected when the client is built.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the diagnostic sink
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: DiagnosticSink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    /// Register a closure as the diagnostic sink
    pub fn with_diagnostics<F>(self, f: F) -> Self
    where
        F: Fn(&DiagnosticEvent<'_>) + Send + Sync + 'static,
    {
        self.with_sink(f)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("sink", &"...")
            .finish()
    }
}
