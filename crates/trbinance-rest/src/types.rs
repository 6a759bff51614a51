//! Types for TRBinance REST API requests and responses
//!
//! Raw wire payloads keep the exchange's shape (underscore symbols, integer
//! side/status codes, string-encoded decimals); the canonical records here
//! are what the normalizer produces from them. Outbound order parameters use
//! `Decimal` so caller-supplied prices and quantities serialize without
//! float formatting artifacts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use trbinance_types::{OrderStatus, OrderType, Side, SymbolType};

// ============================================================================
// API Response Envelope
// ============================================================================

/// Standard TRBinance open-API response envelope
///
/// Enveloped endpoints wrap their payload as
/// `{"code": 0, "msg": "...", "timestamp": ..., "data": ...}`.
/// The secondary market-data host returns bare payloads without this
/// wrapper; those endpoints decode their payload type directly.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Numeric result code (0 = success)
    #[serde(default)]
    pub code: Option<i64>,
    /// Error or status message
    #[serde(default)]
    pub msg: Option<String>,
    /// Server timestamp of the response
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Result payload (absent on error responses)
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the envelope indicates success
    pub fn is_success(&self) -> bool {
        self.code.unwrap_or(trbinance_types::codes::SUCCESS) == trbinance_types::codes::SUCCESS
    }

    /// Split the envelope, surfacing a non-zero code as `(code, message)`
    ///
    /// An error payload lacking `data` is propagated through the error
    /// branch unmodified so callers can branch on the exchange code.
    pub fn into_result(self) -> Result<Enveloped<T>, (i64, String)> {
        if self.is_success() {
            Ok(Enveloped {
                data: self.data,
                timestamp: self.timestamp,
            })
        } else {
            Err((
                self.code.unwrap_or_default(),
                self.msg.unwrap_or_default(),
            ))
        }
    }
}

/// A successful envelope: the payload plus the server timestamp
#[derive(Debug)]
pub struct Enveloped<T> {
    /// Result payload, if the endpoint returns one
    pub data: Option<T>,
    /// Server timestamp of the response
    pub timestamp: Option<i64>,
}

/// Payloads that wrap their items as `{"list": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct DataList<T> {
    /// The wrapped items
    pub list: Vec<T>,
}

/// Server time response
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ServerTime {
    /// Server Unix time in milliseconds
    pub timestamp: i64,
}

// ============================================================================
// Market Data Types
// ============================================================================

/// One order book price level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BookLevel {
    /// Price of the level
    pub price: f64,
    /// Quantity resting at the level
    pub qty: f64,
}

/// Order book snapshot with numeric levels
#[derive(Debug, Clone, Serialize)]
pub struct OrderBook {
    /// Bid levels, best first
    pub bids: Vec<BookLevel>,
    /// Ask levels, best first
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    /// Get the best bid price
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|level| level.price)
    }

    /// Get the best ask price
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|level| level.price)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// Raw order book payload (string-encoded levels)
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderBook {
    /// Bid levels as `[price, qty, ...]` arrays
    #[serde(default)]
    pub bids: Vec<Vec<Value>>,
    /// Ask levels as `[price, qty, ...]` arrays
    #[serde(default)]
    pub asks: Vec<Vec<Value>>,
}

/// Canonical ticker/trading-pair record
///
/// Fields absent from a given endpoint's payload stay `None` — absence
/// means "not provided by this endpoint", which callers must distinguish
/// from a provided zero.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    /// Canonical slash-form symbol
    pub symbol: String,
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub base_volume: Option<f64>,
    pub amount: Option<f64>,
    pub quote_volume: Option<f64>,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub open: Option<f64>,
    pub close: Option<f64>,
    #[serde(rename = "change24h")]
    pub change_24h: Option<f64>,
    /// Full raw record for traceability
    pub info: Value,
}

// ============================================================================
// Symbol Metadata Types
// ============================================================================

/// Decimal precision and raw tick sizes for a symbol
///
/// `amount` and `price` are decimal-place counts derived from the tick
/// sizes and assume power-of-ten ticks; `price_tick` and `amount_tick`
/// preserve the raw values for consumers that need exact rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolPrecision {
    /// Order quantity decimal places (derived from `LOT_SIZE.stepSize`)
    pub amount: i32,
    /// Price decimal places (derived from `PRICE_FILTER.tickSize`)
    pub price: i32,
    /// Raw price tick size
    pub price_tick: f64,
    /// Raw quantity step size
    pub amount_tick: f64,
    /// Exchange-declared base asset precision
    pub base: f64,
    /// Exchange-declared quote asset precision
    pub quote: f64,
}

/// An inclusive bound pair from a symbol filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMax {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Order size and price bounds for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymbolLimits {
    /// Quantity bounds (`LOT_SIZE`)
    pub amount: MinMax,
    /// Price bounds (`PRICE_FILTER`)
    pub price: MinMax,
    /// Notional bounds (`MIN_NOTIONAL`; no upper bound is declared)
    pub cost: MinMax,
    /// Market-order quantity bounds (`MARKET_LOT_SIZE`)
    pub market: MinMax,
}

/// Canonical symbol metadata record
///
/// Derived entirely from one raw exchange symbol record plus its embedded
/// filter list; immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    /// Exchange-native compact form (`BTCUSDT`)
    pub id: String,
    /// Canonical slash-form symbol (`BTC/USDT`)
    pub symbol: String,
    /// Routing class of the symbol
    pub symbol_type: SymbolType,
    /// Base asset
    pub base: String,
    /// Quote asset
    pub quote: String,
    /// Whether the symbol is tradable
    pub active: bool,
    /// Spot instrument flag
    pub spot: bool,
    /// Margin trading flag
    pub margin: bool,
    /// Futures flag
    pub future: bool,
    /// Derived precision and raw tick sizes
    pub precision: SymbolPrecision,
    /// Filter-derived bounds
    pub limits: SymbolLimits,
    /// Full raw record for traceability
    pub info: Value,
}

// ============================================================================
// Order Types
// ============================================================================

/// Canonical order record
///
/// Produced fresh from one raw order payload on every query; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Order id, always a string — exchange ids exceed the safe-integer
    /// range of some consumers, so numeric ids are coerced on arrival
    pub order_id: String,
    /// Client-assigned order id, when present
    pub client_id: Option<String>,
    /// Canonical slash-form symbol
    pub symbol: String,
    /// Resolved order side
    pub side: Side,
    /// Resolved order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Resolved order status
    pub status: OrderStatus,
    pub price: f64,
    pub orig_qty: f64,
    pub orig_quote_qty: f64,
    pub executed_price: f64,
    pub executed_qty: f64,
    pub executed_quote_qty: f64,
    pub stop_price: f64,
    pub iceberg_qty: f64,
    /// Order creation time (exchange clock, Unix milliseconds)
    pub create_time: Option<i64>,
    /// Server timestamp of the response that carried this record
    pub transact_time: Option<i64>,
}

/// Outcome of a cancel request
///
/// Cancelling an order that is already cancelled is rejected by the
/// exchange with a dedicated code; the SDK names that case instead of
/// raising it, since the caller's goal — the order not being live — is met.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// The order was cancelled by this request
    Canceled(OrderRecord),
    /// The order had already been cancelled before this request
    AlreadyCanceled,
}

impl CancelOutcome {
    /// The cancelled order record, if this request performed the cancel
    pub fn record(&self) -> Option<&OrderRecord> {
        match self {
            Self::Canceled(record) => Some(record),
            Self::AlreadyCanceled => None,
        }
    }
}

/// Request to place an order
///
/// Unset optional fields are omitted from the request entirely rather than
/// sent as sentinel values.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// Canonical slash-form symbol
    pub symbol: String,
    /// Order side
    pub side: Side,
    /// Order type (must be placeable: LIMIT, MARKET, STOP_LOSS_LIMIT,
    /// TAKE_PROFIT_LIMIT)
    pub order_type: OrderType,
    /// Order quantity in base asset
    pub quantity: Option<Decimal>,
    /// Order size in quote asset (market orders)
    pub quote_order_qty: Option<Decimal>,
    /// Limit price
    pub price: Option<Decimal>,
    /// Trigger price for stop orders
    pub stop_price: Option<Decimal>,
    /// Iceberg display quantity
    pub iceberg_qty: Option<Decimal>,
    /// Client-assigned order id
    pub client_id: Option<String>,
}

impl NewOrder {
    fn new(symbol: impl Into<String>, side: Side, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            quantity: None,
            quote_order_qty: None,
            price: None,
            stop_price: None,
            iceberg_qty: None,
            client_id: None,
        }
    }

    /// Create a limit order
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        let mut order = Self::new(symbol, side, OrderType::Limit);
        order.quantity = Some(quantity);
        order.price = Some(price);
        order
    }

    /// Create a market order sized in base asset
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        let mut order = Self::new(symbol, side, OrderType::Market);
        order.quantity = Some(quantity);
        order
    }

    /// Create a market order sized in quote asset
    pub fn market_quote(symbol: impl Into<String>, side: Side, quote_order_qty: Decimal) -> Self {
        let mut order = Self::new(symbol, side, OrderType::Market);
        order.quote_order_qty = Some(quote_order_qty);
        order
    }

    /// Create a stop-loss limit order
    pub fn stop_loss_limit(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Self {
        let mut order = Self::new(symbol, side, OrderType::StopLossLimit);
        order.quantity = Some(quantity);
        order.price = Some(price);
        order.stop_price = Some(stop_price);
        order
    }

    /// Create a take-profit limit order
    pub fn take_profit_limit(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Self {
        let mut order = Self::new(symbol, side, OrderType::TakeProfitLimit);
        order.quantity = Some(quantity);
        order.price = Some(price);
        order.stop_price = Some(stop_price);
        order
    }

    /// Set a client-assigned order id
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set an iceberg display quantity
    pub fn with_iceberg_qty(mut self, iceberg_qty: Decimal) -> Self {
        self.iceberg_qty = Some(iceberg_qty);
        self
    }
}

/// Request to place a one-cancels-the-other order pair
#[derive(Debug, Clone)]
pub struct OcoOrder {
    /// Canonical slash-form symbol
    pub symbol: String,
    /// Order side
    pub side: Side,
    /// Order quantity in base asset
    pub quantity: Decimal,
    /// Limit leg price
    pub price: Decimal,
    /// Stop trigger price
    pub stop_price: Decimal,
    /// Stop leg limit price
    pub stop_limit_price: Decimal,
    /// Client-assigned list id
    pub list_client_id: Option<String>,
}

impl OcoOrder {
    /// Create an OCO order pair
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
        stop_limit_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            price,
            stop_price,
            stop_limit_price,
            list_client_id: None,
        }
    }

    /// Set a client-assigned list id
    pub fn with_list_client_id(mut self, list_client_id: impl Into<String>) -> Self {
        self.list_client_id = Some(list_client_id.into());
        self
    }
}

// ============================================================================
// Account Types
// ============================================================================

/// Balance of a single asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssetBalance {
    /// Available amount
    pub free: f64,
    /// Amount locked in open orders
    pub locked: f64,
    /// `free + locked`
    pub total: f64,
}

/// Normalized account balances
///
/// The flat per-asset map always includes every asset the exchange
/// reported; the grouped views include an asset only when the respective
/// amount is strictly greater than zero, keeping the "nonzero holdings"
/// views small.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSheet {
    /// Every reported asset, zero or not
    pub assets: HashMap<String, AssetBalance>,
    /// Assets with `free > 0`
    pub free: HashMap<String, f64>,
    /// Assets with `locked > 0`
    pub locked: HashMap<String, f64>,
    /// Assets with `total > 0`
    pub total: HashMap<String, f64>,
}

impl BalanceSheet {
    /// Balance entry for a specific asset
    pub fn get(&self, asset: &str) -> Option<&AssetBalance> {
        self.assets.get(asset)
    }

    /// Total holding of a specific asset, zero included
    pub fn total_of(&self, asset: &str) -> Option<f64> {
        self.assets.get(asset).map(|balance| balance.total)
    }
}

/// Spot account information
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// Normalized balances
    pub balances: BalanceSheet,
    /// Full raw account payload for traceability
    pub info: Value,
}

// ============================================================================
// Request Option Types
// ============================================================================

/// Optional filters for recent-trades queries
#[derive(Debug, Clone, Default)]
pub struct TradeQuery {
    /// Return trades from this trade id onward
    pub from_id: Option<u64>,
    /// Maximum number of trades to return
    pub limit: Option<u32>,
}

/// Optional filters for aggregated-trades queries
#[derive(Debug, Clone, Default)]
pub struct AggTradesQuery {
    /// Return trades from this aggregate id onward
    pub from_id: Option<u64>,
    /// Start of the time range (Unix milliseconds)
    pub start_time: Option<i64>,
    /// End of the time range (Unix milliseconds)
    pub end_time: Option<i64>,
    /// Maximum number of trades to return
    pub limit: Option<u32>,
}

/// Optional filters for kline queries
#[derive(Debug, Clone, Default)]
pub struct KlineQuery {
    /// Start of the time range (Unix milliseconds)
    pub start_time: Option<i64>,
    /// End of the time range (Unix milliseconds)
    pub end_time: Option<i64>,
    /// Maximum number of candles to return
    pub limit: Option<u32>,
}

/// Optional filters for the trading-pairs listing
#[derive(Debug, Clone, Default)]
pub struct MarketInfoQuery {
    /// Restrict to pairs quoted in this asset
    pub quote_asset: Option<String>,
    /// Pagination offset
    pub offset: Option<u32>,
    /// Maximum number of pairs to return
    pub limit: Option<u32>,
}

/// Optional filters for order-history queries
#[derive(Debug, Clone, Default)]
pub struct AllOrdersQuery {
    /// Return orders from this order id onward
    pub order_id: Option<String>,
    /// Start of the time range (Unix milliseconds)
    pub start_time: Option<i64>,
    /// End of the time range (Unix milliseconds)
    pub end_time: Option<i64>,
    /// Maximum number of orders to return
    pub limit: Option<u32>,
    /// Page direction: `prev` or `next`
    pub direct: Option<String>,
}

/// Optional filters for account trade-list queries
#[derive(Debug, Clone, Default)]
pub struct TradeListQuery {
    /// Return trades from this trade id onward
    pub from_id: Option<u64>,
    /// Start of the time range (Unix milliseconds)
    pub start_time: Option<i64>,
    /// End of the time range (Unix milliseconds)
    pub end_time: Option<i64>,
    /// Maximum number of trades to return
    pub limit: Option<u32>,
    /// Page direction: `prev` or `next`
    pub direct: Option<String>,
}

/// Optional filters for withdraw/deposit history queries
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Restrict to one asset
    pub asset: Option<String>,
    /// Start of the time range (Unix milliseconds)
    pub start_time: Option<i64>,
    /// End of the time range (Unix milliseconds)
    pub end_time: Option<i64>,
    /// Pagination offset
    pub offset: Option<u32>,
    /// Maximum number of entries to return
    pub limit: Option<u32>,
}

/// Optional fields for withdraw requests
#[derive(Debug, Clone, Default)]
pub struct WithdrawOptions {
    /// Network to withdraw over
    pub network: Option<String>,
    /// Secondary address identifier (memo/tag)
    pub address_tag: Option<String>,
    /// Client-assigned withdraw id
    pub client_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_envelope_success() {
        let raw = r#"{"code":0,"msg":"success","timestamp":1681279199188,"data":{"timestamp":1681279199000}}"#;
        let envelope: ApiResponse<ServerTime> = serde_json::from_str(raw).unwrap();
        assert!(envelope.is_success());

        let enveloped = envelope.into_result().unwrap();
        assert_eq!(enveloped.timestamp, Some(1681279199188));
        assert_eq!(enveloped.data.unwrap().timestamp, 1681279199000);
    }

    #[test]
    fn test_envelope_error_propagates_code() {
        let raw = r#"{"code":1001,"msg":"bad request"}"#;
        let envelope: ApiResponse<ServerTime> = serde_json::from_str(raw).unwrap();
        assert!(!envelope.is_success());

        let (code, message) = envelope.into_result().unwrap_err();
        assert_eq!(code, 1001);
        assert_eq!(message, "bad request");
    }

    #[test]
    fn test_new_order_builders() {
        let order = NewOrder::limit("BTC/USDT", Side::Buy, dec!(0.001), dec!(10000))
            .with_client_id("my-order-1");

        assert_eq!(order.symbol, "BTC/USDT");
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.quantity, Some(dec!(0.001)));
        assert_eq!(order.price, Some(dec!(10000)));
        assert_eq!(order.client_id.as_deref(), Some("my-order-1"));
        assert!(order.stop_price.is_none());

        let stop = NewOrder::stop_loss_limit("BTC/USDT", Side::Sell, dec!(1), dec!(9500), dec!(9600));
        assert_eq!(stop.order_type, OrderType::StopLossLimit);
        assert_eq!(stop.stop_price, Some(dec!(9600)));
        assert!(stop.order_type.is_placeable());
    }

    #[test]
    fn test_order_book_accessors() {
        let book = OrderBook {
            bids: vec![BookLevel { price: 9999.0, qty: 1.0 }],
            asks: vec![BookLevel { price: 10001.0, qty: 2.0 }],
        };
        assert_eq!(book.best_bid(), Some(9999.0));
        assert_eq!(book.best_ask(), Some(10001.0));
        assert_eq!(book.spread(), Some(2.0));
    }

    #[test]
    fn test_cancel_outcome_record() {
        assert!(CancelOutcome::AlreadyCanceled.record().is_none());
    }
}
