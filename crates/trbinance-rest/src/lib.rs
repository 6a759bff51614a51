//! REST API client for the TRBinance (Binance TR) cryptocurrency exchange
//!
//! This crate provides a typed REST client for trading on TRBinance,
//! including market data, account management, and order execution.
//!
//! # Features
//!
//! - **Market Data**: Server time, symbol metadata, trading pairs, order
//!   book, recent/aggregated trades, klines
//! - **Account**: Normalized balances, per-asset info, trade history
//! - **Trading**: Place, query, and cancel orders; OCO pairs
//! - **Funding**: Withdrawals, deposit history, deposit addresses
//!
//! # Authentication
//!
//! Private endpoints require API credentials. The client signs requests
//! with HMAC-SHA256 over the parameter set in insertion order, as specified
//! by the exchange's API documentation, and attaches the signature together
//! with a fresh millisecond timestamp on every attempt.
//!
//! # Normalization
//!
//! Raw exchange payloads use underscore-joined symbols, integer side and
//! status codes, and string-encoded decimals. The [`normalize`] module
//! converts them into the canonical records in [`types`]: slash-form
//! symbols, closed enums, numeric fields, and derived precision from tick
//! sizes. Unknown enum codes and missing symbol filters are hard errors by
//! design.
//!
//! # Example
//!
//! ```no_run
//! use trbinance_rest::{Credentials, NewOrder, TrBinanceRestClient};
//! use rust_decimal_macros::dec;
//! use trbinance_types::Side;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Public endpoints (no auth required)
//!     let client = TrBinanceRestClient::new();
//!     let markets = client.load_markets().await?;
//!     println!("{} tradable symbols", markets.len());
//!
//!     // Private endpoints (auth required)
//!     let creds = Credentials::from_env()?;
//!     let auth_client = TrBinanceRestClient::with_credentials(creds);
//!     let order = NewOrder::limit("BTC/USDT", Side::Buy, dec!(0.001), dec!(10000));
//!     let placed = auth_client.create_order(&order).await?;
//!     println!("Placed order {}", placed.order_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Rate Limiting
//!
//! The client performs no throttling of its own; it passively records the
//! `X-MBX-USED-*` usage headers from every response. Read the last
//! observed values with [`TrBinanceRestClient::used_weight`] to drive
//! client-side throttling decisions.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod normalize;
pub mod types;
pub mod used_weight;

#[cfg(feature = "blocking")]
pub mod blocking;

// Re-export main types
pub use auth::{Credentials, Params, SecurityType};
pub use client::{ClientConfig, TrBinanceRestClient};
pub use error::{RestError, RestResult};
pub use used_weight::UsedWeightTracker;

// Re-export the normalizer entry points
pub use normalize::{format_balance, format_market, format_order, format_order_book, format_symbol};

// Re-export endpoint-specific types
pub use types::{
    // Market data
    BookLevel, MarketRecord, OrderBook, ServerTime,
    // Symbols
    MinMax, SymbolLimits, SymbolPrecision, SymbolRecord,
    // Trading
    CancelOutcome, NewOrder, OcoOrder, OrderRecord,
    // Account
    AccountInfo, AssetBalance, BalanceSheet,
    // Request options
    AggTradesQuery, AllOrdersQuery, HistoryQuery, KlineQuery, MarketInfoQuery, TradeListQuery,
    TradeQuery, WithdrawOptions,
};

// Re-export the shared types crate for downstream users
pub use trbinance_types;
