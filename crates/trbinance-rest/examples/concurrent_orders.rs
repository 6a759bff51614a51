//! Example: concurrent order placement
//!
//! Places several orders without waiting for prior ones to complete, then
//! cancels them concurrently while polling account state. Each request
//! carries its own timestamp and signature, so no coordination is needed
//! beyond sharing the client.
//!
//! Run with: cargo run --example concurrent_orders
//!
//! NOTE: Set TRBINANCE_API_KEY and TRBINANCE_SECRET_KEY environment
//! variables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trbinance_rest::{Credentials, NewOrder, TrBinanceRestClient};
use trbinance_types::Side;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== TRBinance Concurrent Orders Example ===\n");

    let creds = Credentials::from_env()?;
    let client = TrBinanceRestClient::with_credentials(creds);

    // Place three resting limit buys concurrently
    let prices: [Decimal; 3] = [dec!(10000), dec!(10100), dec!(10200)];
    let placements = prices.map(|price| {
        let client = client.clone();
        tokio::spawn(async move {
            let order = NewOrder::limit("BTC/USDT", Side::Buy, dec!(0.001), price);
            client.create_order(&order).await
        })
    });

    let mut order_ids = Vec::new();
    for handle in placements {
        match handle.await? {
            Ok(record) => {
                println!("Placed order {} @ {}", record.order_id, record.price);
                order_ids.push(record.order_id);
            }
            Err(err) => println!("Placement failed: {}", err),
        }
    }

    // Cancel them all while also polling balances
    let balance_client = client.clone();
    let balances = tokio::spawn(async move { balance_client.account_balance().await });

    let cancels = order_ids.into_iter().map(|order_id| {
        let client = client.clone();
        tokio::spawn(async move { client.cancel_order(&order_id).await })
    });

    for handle in cancels {
        match handle.await? {
            Ok(outcome) => println!("Cancel outcome: {:?}", outcome.record().map(|r| &r.status)),
            Err(err) => println!("Cancel failed: {}", err),
        }
    }

    if let Ok(sheet) = balances.await? {
        println!("USDT total: {:?}", sheet.total_of("USDT"));
    }

    println!("Used weight after burst: {:?}", client.used_weight());

    Ok(())
}
