//! Demo 1: Spread Monitor
//!
//! Polls the order book of one product and prints bid, ask and spread.
//!
//! Run: QUOINE_API_TOKEN_ID=... QUOINE_API_SECRET=... cargo run --bin spread_monitor [product_id]

use colored::*;
use quoine_rest::{Instant, QuoineClient};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let product_id: u64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(5);

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  SPREAD MONITOR".cyan().bold());
    println!("{}", "  Quoine REST Demo".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = QuoineClient::from_env()?;
    let product = client.get_product(product_id).await?;

    println!(
        "{} Watching {} (product {})\n",
        "✓".green(),
        product.currency_pair_code.bold(),
        product.id
    );

    let start = std::time::Instant::now();
    let mut polls = 0u64;

    while start.elapsed() < Duration::from_secs(30) {
        let deadline = Instant::now() + Duration::from_secs(2);
        let started = std::time::Instant::now();

        match client.market_until(deadline).get_order_book(product_id, false).await {
            Ok(book) => {
                polls += 1;
                if let (Some(bid), Some(ask), Some(spread)) =
                    (book.best_bid(), book.best_ask(), book.spread())
                {
                    print!("\r\x1B[K");
                    print!(
                        "  {} {:.2}  {} {:.2}  {} {:.2}  │ {} {}ms",
                        "BID:".yellow(),
                        bid,
                        "ASK:".yellow(),
                        ask,
                        "SPREAD:".green(),
                        spread,
                        "Round trip:".dimmed(),
                        started.elapsed().as_millis()
                    );

                    use std::io::Write;
                    std::io::stdout().flush()?;
                }
            }
            Err(e) => println!("\n{} {}", "✗".red(), e),
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    println!("\n\n{} Demo complete. {} polls.", "✓".green(), polls);
    Ok(())
}
