//! Common test utilities and fixtures for integration tests
//!
//! Response bodies are samples from the Quoine v2 API documentation.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use quoine_rest::{
    AuthClaims, ClientConfig, Credentials, DiagnosticEvent, QuoineClient, TokenSigner,
};
use wiremock::{MockServer, Request};

pub const TOKEN_ID: &str = "apiToken";
pub const SECRET: &str = "apiSecret";

/// Single product, id sent as a string
pub const PRODUCT_RESPONSE: &str = r#"{
    "id": "5",
    "product_type": "CurrencyPair",
    "code": "CASH",
    "name": "CASH Trading",
    "market_ask": "48203.05",
    "market_bid": "48188.15",
    "indicator": -1,
    "currency": "JPY",
    "currency_pair_code": "BTCJPY",
    "symbol": "¥",
    "fiat_minimum_withdraw": "1500.0",
    "pusher_channel": "product_cash_btcjpy_5",
    "taker_fee": "0.0",
    "maker_fee": "0.0",
    "low_market_bid": "47630.99",
    "high_market_ask": "48396.71",
    "volume_24h": "2915.627366519999999998",
    "last_price_24h": "48217.2",
    "last_traded_price": "48203.05",
    "last_traded_quantity": "1.0",
    "quoted_currency": "JPY",
    "base_currency": "BTC",
    "exchange_rate": "0.009398151671149725"
}"#;

pub fn products_response() -> String {
    format!("[{}]", PRODUCT_RESPONSE)
}

pub const ORDER_BOOK_RESPONSE: &str = r#"{
    "buy_price_levels": [
        ["416.23000", "1.75000"], ["0", "0"]
    ],
    "sell_price_levels": [
        ["416.47000", "0.28675"], ["1", "1"]
    ]
}"#;

pub const INTEREST_RATES_RESPONSE: &str = r#"{
    "bids": [
        ["0.00020", "23617.81698"],
        ["0.00040", "50050.42000"],
        ["0.00050", "100000.00000"]
    ],
    "asks": []
}"#;

pub const EXECUTIONS_RESPONSE: &str = r#"{
    "models": [
        {
            "id": 1011880,
            "quantity": "6.118954",
            "price": "409.78",
            "taker_side": "sell",
            "created_at": 1457370745
        },
        {
            "id": 1011791,
            "quantity": "1.15",
            "price": "409.12",
            "taker_side": "sell",
            "created_at": 1457365585
        }
    ],
    "current_page": 2,
    "total_pages": 1686
}"#;

pub const EXECUTIONS_BY_TIMESTAMP_RESPONSE: &str = r#"[
    {
        "id": 960598,
        "quantity": "5.6",
        "price": "431.89",
        "taker_side": "buy",
        "created_at": 1456705487
    },
    {
        "id": 960603,
        "quantity": "0.06",
        "price": "431.74",
        "taker_side": "buy",
        "created_at": 1456705564
    }
]"#;

/// Filled order with one execution
pub const ORDER_RESPONSE: &str = r#"{
    "id": 2157479,
    "order_type": "limit",
    "quantity": "0.01",
    "disc_quantity": "0.0",
    "iceberg_total_quantity": "0.0",
    "side": "sell",
    "filled_quantity": "0.01",
    "price": "500.0",
    "created_at": 1462123639,
    "updated_at": 1462123639,
    "status": "filled",
    "leverage_level": 2,
    "source_exchange": "QUOINE",
    "product_id": 1,
    "product_code": "CASH",
    "funding_currency": "USD",
    "currency_pair_code": "BTCUSD",
    "order_fee": "0.0",
    "executions": [
        {
            "id": 4566133,
            "quantity": "0.01",
            "price": "500.0",
            "taker_side": "buy",
            "my_side": "sell",
            "created_at": 1465396785
        }
    ]
}"#;

/// Freshly placed order, no `executions` field
pub const CREATE_ORDER_RESPONSE: &str = r#"{
    "id": 2157474,
    "order_type": "limit",
    "quantity": "0.01",
    "disc_quantity": "0.0",
    "iceberg_total_quantity": "0.0",
    "side": "sell",
    "filled_quantity": "0.0",
    "price": "500.0",
    "created_at": 1462123639,
    "updated_at": 1462123639,
    "status": "live",
    "leverage_level": 1,
    "source_exchange": "QUOINE",
    "product_id": 1,
    "product_code": "CASH",
    "funding_currency": "USD",
    "currency_pair_code": "BTCUSD",
    "order_fee": "0.0"
}"#;

pub fn orders_response() -> String {
    format!(
        r#"{{"models": [{}], "current_page": 1, "total_pages": 1}}"#,
        ORDER_RESPONSE
    )
}

pub const TRADES_RESPONSE: &str = r#"[
    {
        "id": 57896,
        "currency_pair_code": "BTCUSD",
        "status": "closed",
        "side": "short",
        "margin_used": "0.83588",
        "open_quantity": "0.01",
        "close_quantity": "0.0",
        "quantity": "0.01",
        "leverage_level": 5,
        "product_code": "CASH",
        "product_id": 1,
        "open_price": "417.65",
        "close_price": "417.0",
        "trader_id": 3020,
        "open_pnl": "0.0",
        "close_pnl": "0.0065",
        "pnl": "0.0065",
        "stop_loss": "0.0",
        "take_profit": "0.0",
        "funding_currency": "USD",
        "created_at": 1456250726,
        "updated_at": 1456251837,
        "total_interest": "0.02"
    }
]"#;

/// Client pointed at the mock server, no diagnostics
pub fn client_for(server: &MockServer) -> QuoineClient {
    QuoineClient::with_config(config_for(server)).expect("Failed to create client")
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(Credentials::new(TOKEN_ID, SECRET).unwrap()).with_base_url(server.uri())
}

/// Client that records every diagnostic event as its rendered text
pub fn recording_client(server: &MockServer) -> (QuoineClient, Arc<Mutex<Vec<String>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink_events = events.clone();

    let config = config_for(server).with_diagnostics(move |event: &DiagnosticEvent<'_>| {
        sink_events.lock().unwrap().push(event.to_string());
    });

    let client = QuoineClient::with_config(config).expect("Failed to create client");
    (client, events)
}

/// Decode and verify the auth token of a received request
pub fn claims_of(request: &Request) -> AuthClaims {
    let token = request
        .headers
        .get("x-quoine-auth")
        .expect("missing auth header")
        .to_str()
        .unwrap();

    let signer = TokenSigner::new(Credentials::new(TOKEN_ID, SECRET).unwrap());
    signer.verify(token).expect("token does not verify")
}

/// Path plus query exactly as received
pub fn wire_path(request: &Request) -> String {
    match request.url.query() {
        Some(query) => format!("{}?{}", request.url.path(), query),
        None => request.url.path().to_string(),
    }
}

pub async fn only_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.expect("recording disabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests.remove(0)
}
