//! Example: public market data
//!
//! This example demonstrates how to use the public endpoints for:
//! - Loading symbol metadata
//! - Fetching the order book
//! - Fetching klines
//!
//! Run with: cargo run --example market_data

use trbinance_rest::TrBinanceRestClient;
use trbinance_rest::types::KlineQuery;
use trbinance_types::KlineInterval;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("=== TRBinance Market Data Example ===\n");

    let client = TrBinanceRestClient::new();

    // Server time
    let time = client.server_time().await?;
    println!("Server time: {}", time.timestamp);

    // Symbol metadata
    let markets = client.load_markets().await?;
    println!("Loaded {} symbols", markets.len());

    if let Some(record) = markets.get("BTC/USDT") {
        println!(
            "BTC/USDT: amount precision {}, price precision {}, tick {}",
            record.precision.amount, record.precision.price, record.precision.price_tick
        );
        println!(
            "  min order: {:?} BTC, min notional: {:?}",
            record.limits.amount.min, record.limits.cost.min
        );
    }

    // Order book
    let book = client.order_book("BTC/USDT", Some(10)).await?;
    println!(
        "Order book: best bid {:?}, best ask {:?}, spread {:?}",
        book.best_bid(),
        book.best_ask(),
        book.spread()
    );

    // Klines
    let candles = client
        .market()
        .klines("BTC/USDT", KlineInterval::H1, KlineQuery::default())
        .await?;
    println!("Fetched {} hourly candles", candles.len());

    // Usage weight recorded from response headers along the way
    println!("Used weight: {:?}", client.used_weight());

    Ok(())
}
