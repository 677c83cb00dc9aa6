//! Demo 2: Idempotent Order Placement
//!
//! Places a far-from-market limit order with a client order id, submits it
//! a second time to show the duplicate being detected, then cancels it.
//!
//! Run: QUOINE_API_TOKEN_ID=... QUOINE_API_SECRET=... cargo run --bin place_order

use colored::*;
use quoine_rest::{CreateOrderRequest, OrderFilter, OrderSide, OrderStatus, QuoineClient, RestError};
use rust_decimal_macros::dec;

const PRODUCT_ID: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  IDEMPOTENT ORDER PLACEMENT".cyan().bold());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = QuoineClient::from_env()?;

    let book = client.get_order_book(PRODUCT_ID, false).await?;
    let Some(best_bid) = book.best_bid() else {
        println!("{} Order book is empty", "✗".red());
        return Ok(());
    };

    // Half the best bid so it rests on the book
    let price = (best_bid / dec!(2)).round_dp(0);
    let client_order_id = format!("demo-{}", chrono::Utc::now().timestamp());
    let request = CreateOrderRequest::limit(PRODUCT_ID, OrderSide::Buy, dec!(0.001), price)
        .with_client_order_id(client_order_id.as_str());

    let order = client.create_order(&request).await?;
    println!(
        "{} Placed order {} at {} ({})",
        "✓".green(),
        order.id.to_string().bold(),
        price,
        client_order_id
    );

    match client.create_order(&request).await {
        Err(RestError::OrderAlreadyExists) => {
            println!("{} Resubmission rejected as duplicate", "✓".green())
        }
        Ok(dup) => println!("{} Unexpected second order {}", "!".yellow(), dup.id),
        Err(e) => println!("{} {}", "✗".red(), e),
    }

    let live = client
        .get_orders(&OrderFilter::new().product(PRODUCT_ID).status(OrderStatus::Live))
        .await?;
    println!("{} {} live order(s) on product {}", "•".dimmed(), live.models.len(), PRODUCT_ID);

    let cancelled = client.cancel_order(order.id).await?;
    println!("{} Order {} is now {}", "✓".green(), cancelled.id, cancelled.status);

    Ok(())
}
