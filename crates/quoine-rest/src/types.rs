//! Types for Quoine REST API requests and responses
//!
//! Response types follow the exchange's JSON field names verbatim. Numeric
//! values that the exchange sends as strings are kept as strings, with
//! `Decimal` accessors for the commonly used ones.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Field helpers
// ============================================================================

/// Accept `"5"` or `5`
fn u64_from_str_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {:?}", s))),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Accept `"500.0"` or `500.0`, keeping the textual form
fn string_from_str_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn opt_string_from_str_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string, number or null, got {}",
            other
        ))),
    }
}

fn parse_decimal(s: Option<&str>) -> Option<Decimal> {
    s.and_then(|s| s.parse().ok())
}

fn level_price(levels: &[Vec<String>]) -> Option<Decimal> {
    levels.first().and_then(|level| level.first()?.parse().ok())
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Tradable product (currency pair)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product id (sent as a string by the exchange)
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub id: u64,
    /// Product type, e.g. "CurrencyPair"
    pub product_type: String,
    /// Product code, e.g. "CASH"
    pub code: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Best ask
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub market_ask: Option<String>,
    /// Best bid
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub market_bid: Option<String>,
    /// Price movement indicator (-1, 0, 1)
    #[serde(default)]
    pub indicator: Option<i64>,
    /// Quote currency
    pub currency: String,
    /// Pair code, e.g. "BTCJPY"
    pub currency_pair_code: String,
    /// Currency symbol
    #[serde(default)]
    pub symbol: Option<String>,
    /// Minimum fiat withdrawal
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub fiat_minimum_withdraw: Option<String>,
    /// Realtime channel name
    #[serde(default)]
    pub pusher_channel: Option<String>,
    /// Taker fee rate
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub taker_fee: Option<String>,
    /// Maker fee rate
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub maker_fee: Option<String>,
    /// 24h low bid
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub low_market_bid: Option<String>,
    /// 24h high ask
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub high_market_ask: Option<String>,
    /// 24h volume
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub volume_24h: Option<String>,
    /// Last price 24h ago
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub last_price_24h: Option<String>,
    /// Last traded price
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub last_traded_price: Option<String>,
    /// Last traded quantity
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub last_traded_quantity: Option<String>,
    /// Quoted currency
    #[serde(default)]
    pub quoted_currency: Option<String>,
    /// Base currency
    #[serde(default)]
    pub base_currency: Option<String>,
    /// Exchange rate to USD
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub exchange_rate: Option<String>,
}

impl Product {
    /// Get the best ask price
    pub fn ask_price(&self) -> Option<Decimal> {
        parse_decimal(self.market_ask.as_deref())
    }

    /// Get the best bid price
    pub fn bid_price(&self) -> Option<Decimal> {
        parse_decimal(self.market_bid.as_deref())
    }

    /// Get the last traded price
    pub fn last_price(&self) -> Option<Decimal> {
        parse_decimal(self.last_traded_price.as_deref())
    }

    /// Get the mid price (average of bid and ask)
    pub fn mid_price(&self) -> Option<Decimal> {
        let ask = self.ask_price()?;
        let bid = self.bid_price()?;
        Some((ask + bid) / Decimal::TWO)
    }
}

/// Order book snapshot
///
/// Each level is `[price, quantity]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceLevels {
    /// Bid levels, best first
    pub buy_price_levels: Vec<Vec<String>>,
    /// Ask levels, best first
    pub sell_price_levels: Vec<Vec<String>>,
}

impl PriceLevels {
    /// Get the best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        level_price(&self.sell_price_levels)
    }

    /// Get the best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        level_price(&self.buy_price_levels)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// Interest rate ladder for margin funding
///
/// Each level is `[rate, amount]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterestRates {
    /// Bid side of the ladder
    pub bids: Vec<Vec<String>>,
    /// Ask side of the ladder
    pub asks: Vec<Vec<String>>,
}

impl InterestRates {
    /// Get the best bid rate
    pub fn best_bid_rate(&self) -> Option<Decimal> {
        level_price(&self.bids)
    }

    /// Get the best ask rate
    pub fn best_ask_rate(&self) -> Option<Decimal> {
        level_price(&self.asks)
    }
}

/// Public execution (market trade)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Execution {
    /// Execution id
    pub id: u64,
    /// Executed quantity
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub quantity: String,
    /// Execution price
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub price: String,
    /// Side of the taker
    pub taker_side: String,
    /// Unix timestamp
    pub created_at: i64,
}

impl Execution {
    /// Get the price as a decimal
    pub fn price_decimal(&self) -> Option<Decimal> {
        self.price.parse().ok()
    }

    /// Get the quantity as a decimal
    pub fn quantity_decimal(&self) -> Option<Decimal> {
        self.quantity.parse().ok()
    }
}

/// Page of public executions
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Executions {
    /// Executions on this page
    pub models: Vec<Execution>,
    /// Current page number
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
}

// ============================================================================
// Order Types
// ============================================================================

/// Fill of one of the caller's orders
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderExecution {
    /// Execution id
    pub id: u64,
    /// Executed quantity
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub quantity: String,
    /// Execution price
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub price: String,
    /// Side of the taker
    pub taker_side: String,
    /// Side of the caller's order
    pub my_side: String,
    /// Unix timestamp
    pub created_at: i64,
}

/// Order as reported by the exchange
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    /// Order id
    pub id: u64,
    /// Order type, e.g. "limit"
    pub order_type: String,
    /// Ordered quantity
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub quantity: String,
    /// Disclosed quantity
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub disc_quantity: Option<String>,
    /// Iceberg total quantity
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub iceberg_total_quantity: Option<String>,
    /// "buy" or "sell"
    pub side: String,
    /// Filled quantity
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub filled_quantity: String,
    /// Limit price (string or number on the wire)
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub price: Option<String>,
    /// Creation time (Unix seconds)
    pub created_at: i64,
    /// Last update time (Unix seconds)
    pub updated_at: i64,
    /// "live", "filled", "partially_filled" or "cancelled"
    pub status: String,
    /// Leverage level
    #[serde(default)]
    pub leverage_level: Option<u32>,
    /// Source exchange
    #[serde(default)]
    pub source_exchange: Option<String>,
    /// Product id
    pub product_id: u64,
    /// Product code
    #[serde(default)]
    pub product_code: Option<String>,
    /// Funding currency
    pub funding_currency: String,
    /// Pair code, e.g. "BTCUSD"
    pub currency_pair_code: String,
    /// Fee charged (string or number on the wire)
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub order_fee: Option<String>,
    /// Fills, when requested with details
    #[serde(default)]
    pub executions: Vec<OrderExecution>,
    /// Caller supplied id
    #[serde(default)]
    pub client_order_id: Option<String>,
}

impl Order {
    /// Get the limit price as a decimal
    pub fn price_decimal(&self) -> Option<Decimal> {
        parse_decimal(self.price.as_deref())
    }

    /// Get the filled quantity as a decimal
    pub fn filled_quantity_decimal(&self) -> Option<Decimal> {
        self.filled_quantity.parse().ok()
    }

    /// Remaining unfilled quantity
    pub fn remaining_quantity(&self) -> Option<Decimal> {
        let quantity: Decimal = self.quantity.parse().ok()?;
        Some(quantity - self.filled_quantity_decimal()?)
    }

    /// Check if the order is still working on the book
    pub fn is_live(&self) -> bool {
        self.status == "live" || self.status == "partially_filled"
    }
}

/// Page of orders
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Orders {
    /// Orders on this page
    pub models: Vec<Order>,
    /// Current page number
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
}

/// Margin trade opened by an order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trade {
    /// Trade id
    pub id: u64,
    /// Pair code
    pub currency_pair_code: String,
    /// "open" or "closed"
    pub status: String,
    /// "long" or "short"
    pub side: String,
    /// Margin used
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub margin_used: Option<String>,
    /// Open quantity
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub open_quantity: Option<String>,
    /// Closed quantity
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub close_quantity: Option<String>,
    /// Total quantity
    #[serde(deserialize_with = "string_from_str_or_number")]
    pub quantity: String,
    /// Leverage level
    #[serde(default)]
    pub leverage_level: Option<u32>,
    /// Product code
    #[serde(default)]
    pub product_code: Option<String>,
    /// Product id
    pub product_id: u64,
    /// Open price
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub open_price: Option<String>,
    /// Close price
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub close_price: Option<String>,
    /// Trader id
    #[serde(default)]
    pub trader_id: Option<u64>,
    /// Unrealized profit and loss
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub open_pnl: Option<String>,
    /// Realized profit and loss
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub close_pnl: Option<String>,
    /// Total profit and loss
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub pnl: Option<String>,
    /// Stop loss price
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub stop_loss: Option<String>,
    /// Take profit price
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub take_profit: Option<String>,
    /// Funding currency
    #[serde(default)]
    pub funding_currency: Option<String>,
    /// Creation time (Unix seconds)
    pub created_at: i64,
    /// Last update time (Unix seconds)
    pub updated_at: i64,
    /// Interest accrued
    #[serde(default, deserialize_with = "opt_string_from_str_or_number")]
    pub total_interest: Option<String>,
}

impl Trade {
    /// Get total profit and loss as a decimal
    pub fn pnl_decimal(&self) -> Option<Decimal> {
        parse_decimal(self.pnl.as_deref())
    }
}

// ============================================================================
// Order Requests
// ============================================================================

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Limit order
    Limit,
    /// Market order
    Market,
    /// Market order bounded by a price range
    MarketWithRange,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limit => write!(f, "limit"),
            Self::Market => write!(f, "market"),
            Self::MarketWithRange => write!(f, "market_with_range"),
        }
    }
}

/// Order status filter for listing orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Working on the book
    Live,
    /// Fully filled
    Filled,
    /// Partially filled
    PartiallyFilled,
    /// Cancelled
    Cancelled,
}

impl OrderStatus {
    /// Wire value of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Filled => "filled",
            Self::PartiallyFilled => "partially_filled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New order parameters
///
/// Serialized inside an `{"order": ...}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderRequest {
    /// Order type
    pub order_type: OrderType,
    /// Product to trade
    pub product_id: u64,
    /// Buy or sell
    pub side: OrderSide,
    /// Quantity in base currency
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    /// Limit price (limit and ranged market orders)
    #[serde(
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Allowed slippage for `market_with_range`
    #[serde(
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_range: Option<Decimal>,
    /// Caller supplied idempotency id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl CreateOrderRequest {
    /// Create a limit order
    pub fn limit(product_id: u64, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit,
            product_id,
            side,
            quantity,
            price: Some(price),
            price_range: None,
            client_order_id: None,
        }
    }

    /// Create a market order
    pub fn market(product_id: u64, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            order_type: OrderType::Market,
            product_id,
            side,
            quantity,
            price: None,
            price_range: None,
            client_order_id: None,
        }
    }

    /// Create a market order that only fills within `price ± price_range`
    pub fn market_with_range(
        product_id: u64,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
        price_range: Decimal,
    ) -> Self {
        Self {
            order_type: OrderType::MarketWithRange,
            product_id,
            side,
            quantity,
            price: Some(price),
            price_range: Some(price_range),
            client_order_id: None,
        }
    }

    /// Attach a client order id
    ///
    /// Reusing an id makes the exchange reject the order with
    /// [`RestError::OrderAlreadyExists`](crate::RestError::OrderAlreadyExists).
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// Changes to a live order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditOrderRequest {
    /// New quantity
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    /// New price
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl EditOrderRequest {
    /// Create an edit request
    pub fn new(quantity: Decimal, price: Decimal) -> Self {
        Self { quantity, price }
    }
}

/// `{"order": ...}` wrapper used by order mutation bodies
#[derive(Debug, Serialize)]
pub(crate) struct OrderEnvelope<'a, T> {
    pub order: &'a T,
}

/// Filters for listing orders
///
/// Unset filters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Only orders for this product
    pub product_id: Option<u64>,
    /// Only orders funded in this currency
    pub funding_currency: Option<String>,
    /// Only orders in this status
    pub status: Option<OrderStatus>,
    /// Include executions in each order
    pub with_details: bool,
}

impl OrderFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by product
    pub fn product(mut self, product_id: u64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Filter by funding currency
    pub fn funding_currency(mut self, currency: impl Into<String>) -> Self {
        self.funding_currency = Some(currency.into());
        self
    }

    /// Filter by status
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Include executions
    pub fn with_details(mut self) -> Self {
        self.with_details = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_id_from_string() {
        let product: Product = serde_json::from_str(
            r#"{"id":"5","product_type":"CurrencyPair","code":"CASH","currency":"JPY","currency_pair_code":"BTCJPY","market_ask":48203.05,"market_bid":"48188.15"}"#,
        )
        .unwrap();

        assert_eq!(product.id, 5);
        assert_eq!(product.market_ask.as_deref(), Some("48203.05"));
        assert_eq!(product.mid_price(), Some(dec!(48195.60)));
    }

    #[test]
    fn test_product_rejects_non_numeric_id() {
        let result: Result<Product, _> = serde_json::from_str(
            r#"{"id":"abc","product_type":"CurrencyPair","code":"CASH","currency":"JPY","currency_pair_code":"BTCJPY"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_price_levels_helpers() {
        let book = PriceLevels {
            buy_price_levels: vec![vec!["416.23000".into(), "1.75000".into()]],
            sell_price_levels: vec![vec!["416.47000".into(), "0.28675".into()]],
        };

        assert_eq!(book.best_bid(), Some(dec!(416.23)));
        assert_eq!(book.best_ask(), Some(dec!(416.47)));
        assert_eq!(book.spread(), Some(dec!(0.24)));
    }

    #[test]
    fn test_empty_ladder_has_no_rate() {
        let rates = InterestRates {
            bids: vec![],
            asks: vec![],
        };
        assert_eq!(rates.best_bid_rate(), None);
    }

    #[test]
    fn test_order_numeric_price() {
        let order: Order = serde_json::from_str(
            r#"{"id":1,"order_type":"limit","quantity":"0.5","side":"buy","filled_quantity":"0.2",
                "price":500.0,"created_at":1,"updated_at":2,"status":"live","product_id":1,
                "funding_currency":"USD","currency_pair_code":"BTCUSD"}"#,
        )
        .unwrap();

        assert_eq!(order.price_decimal(), Some(dec!(500)));
        assert_eq!(order.remaining_quantity(), Some(dec!(0.3)));
        assert!(order.is_live());
        assert!(order.executions.is_empty());
        assert_eq!(order.client_order_id, None);
    }

    #[test]
    fn test_create_order_body() {
        let order = CreateOrderRequest::limit(1, OrderSide::Sell, dec!(0.01), dec!(500.0))
            .with_client_order_id("my-order-1");
        let body = serde_json::to_value(OrderEnvelope { order: &order }).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "order": {
                    "order_type": "limit",
                    "product_id": 1,
                    "side": "sell",
                    "quantity": "0.01",
                    "price": "500.0",
                    "client_order_id": "my-order-1"
                }
            })
        );
    }

    #[test]
    fn test_market_order_omits_price() {
        let order = CreateOrderRequest::market(5, OrderSide::Buy, dec!(1));
        let body = serde_json::to_value(&order).unwrap();

        assert_eq!(body["order_type"], "market");
        assert!(body.get("price").is_none());
        assert!(body.get("price_range").is_none());
        assert!(body.get("client_order_id").is_none());
    }

    #[test]
    fn test_client_order_id_is_escaped() {
        let order = CreateOrderRequest::market(5, OrderSide::Buy, dec!(1))
            .with_client_order_id(r#"quote"d"#);
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains(r#""client_order_id":"quote\"d""#));
    }

    #[test]
    fn test_edit_order_body_is_valid_json() {
        let edit = EditOrderRequest::new(dec!(0.02), dec!(501.5));
        let json = serde_json::to_string(&OrderEnvelope { order: &edit }).unwrap();

        assert_eq!(json, r#"{"order":{"quantity":"0.02","price":"501.5"}}"#);
    }

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(OrderType::MarketWithRange.to_string(), "market_with_range");
        assert_eq!(OrderSide::Buy.to_string(), "buy");
        assert_eq!(OrderStatus::PartiallyFilled.as_str(), "partially_filled");
        assert_eq!(
            serde_json::to_value(OrderStatus::PartiallyFilled).unwrap(),
            "partially_filled"
        );
    }
}
