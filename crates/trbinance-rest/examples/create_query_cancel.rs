//! Example: place, query, and cancel an order
//!
//! Run with: cargo run --example create_query_cancel
//!
//! NOTE: Set TRBINANCE_API_KEY and TRBINANCE_SECRET_KEY environment
//! variables. The order below is a deep out-of-the-money limit buy so it
//! rests on the book until cancelled.

use rust_decimal_macros::dec;
use trbinance_rest::{CancelOutcome, Credentials, NewOrder, TrBinanceRestClient};
use trbinance_types::Side;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== TRBinance Order Round-Trip Example ===\n");

    let creds = Credentials::from_env()?;
    let client = TrBinanceRestClient::with_credentials(creds);

    // Place a limit buy far below the market
    let order = NewOrder::limit("BTC/USDT", Side::Buy, dec!(0.001), dec!(10000));
    let placed = client.create_order(&order).await?;
    println!(
        "Placed order {}: {} {} @ {} ({})",
        placed.order_id, placed.side, placed.orig_qty, placed.price, placed.status
    );

    // Query it back
    let queried = client.query_order(&placed.order_id).await?;
    println!("Queried status: {}", queried.status);

    // Cancel it
    match client.cancel_order(&placed.order_id).await? {
        CancelOutcome::Canceled(record) => {
            println!("Cancelled order {}: {}", record.order_id, record.status)
        }
        CancelOutcome::AlreadyCanceled => println!("Order was already cancelled"),
    }

    // A second cancel reports the benign already-cancelled outcome
    if let CancelOutcome::AlreadyCanceled = client.cancel_order(&placed.order_id).await? {
        println!("Second cancel: already cancelled, as expected");
    }

    Ok(())
}
