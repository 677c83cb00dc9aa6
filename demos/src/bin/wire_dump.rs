//! Demo 3: Wire Dump
//!
//! Prints every request and response the client exchanges, using the
//! tracing sink.
//!
//! Run: RUST_LOG=quoine_rest=debug cargo run --bin wire_dump

use colored::*;
use quoine_rest::{ClientConfig, Credentials, QuoineClient, TracingSink};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quoine_rest::wire=debug")),
        )
        .init();

    let config = ClientConfig::new(Credentials::from_env()?)
        .with_timeout(5)
        .with_sink(TracingSink);
    let client = QuoineClient::with_config(config)?;

    let products = client.get_products().await?;
    println!("{} {} products", "✓".green(), products.len());

    let rates = client.get_interest_rates("USD").await?;
    println!(
        "{} USD best bid rate: {:?}",
        "✓".green(),
        rates.best_bid_rate()
    );

    // Unknown order ids come back as a raw API error body
    if let Err(e) = client.get_order(1).await {
        println!("{} {}", "✗".red(), e);
    }

    Ok(())
}
