//! Response normalization
//!
//! Pure transformation functions that convert the exchange's raw wire
//! payloads — underscore-joined symbols, integer side/status codes,
//! string-encoded decimals, nested filter arrays — into the canonical
//! records in [`crate::types`]. Every function here is side-effect free and
//! produces a fresh record per call; nothing is cached or mutated.
//!
//! Failures are deliberate and loud: a missing filter or an unrecognized
//! side/status code means the exchange metadata drifted, and substituting a
//! default for a trading-safety field risks real financial loss.

use serde_json::Value;
use std::collections::HashMap;
use trbinance_types::{symbol, ConvertError, OrderStatus, OrderType, Side, SymbolType};

use crate::types::{
    AssetBalance, BalanceSheet, BookLevel, MarketRecord, MinMax, OrderBook, OrderRecord,
    RawOrderBook, SymbolLimits, SymbolPrecision, SymbolRecord,
};

/// Filter tags that must be present in every symbol's metadata
const REQUIRED_FILTERS: [&str; 4] = [
    "LOT_SIZE",
    "PRICE_FILTER",
    "MIN_NOTIONAL",
    "MARKET_LOT_SIZE",
];

// ============================================================================
// Field coercion helpers
// ============================================================================

/// Coerce a JSON value to `f64`, accepting both strings and numbers
///
/// The exchange encodes most decimals as strings but emits plain numbers
/// for a few fields (`stopPrice` on freshly created orders, for one).
pub(crate) fn coerce_f64(value: &Value, field: &str) -> Result<f64, ConvertError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ConvertError::NumericField {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Coerce a JSON value to a string id, guarding numeric ids against
/// precision loss in consumers that read them as floats
pub(crate) fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Coerce a JSON value to an integer wire code
fn coerce_code(value: &Value, field: &'static str) -> Result<i64, ConvertError> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(ConvertError::MissingField(field))
}

fn require<'a>(raw: &'a Value, field: &'static str) -> Result<&'a Value, ConvertError> {
    raw.get(field).ok_or(ConvertError::MissingField(field))
}

fn require_f64(raw: &Value, field: &'static str) -> Result<f64, ConvertError> {
    coerce_f64(require(raw, field)?, field)
}

fn require_str<'a>(raw: &'a Value, field: &'static str) -> Result<&'a str, ConvertError> {
    require(raw, field)?
        .as_str()
        .ok_or(ConvertError::MissingField(field))
}

/// Derive a decimal-place count from a tick size: `-round(log10(tick))`
///
/// This assumes the tick is a power of ten (`0.01` -> 2). A
/// non-power-of-ten tick yields a rounded approximation, not an exact
/// decimal-place count; the raw tick is preserved on the record for
/// consumers that need exact rounding. The formula is kept as-is for
/// compatibility with existing consumers of the derived values.
fn tick_precision(tick: f64, field: &str) -> Result<i32, ConvertError> {
    if tick <= 0.0 || !tick.is_finite() {
        return Err(ConvertError::NumericField {
            field: field.to_string(),
            value: tick.to_string(),
        });
    }
    Ok(-(tick.log10().round()) as i32)
}

// ============================================================================
// Symbol metadata
// ============================================================================

/// Normalize one raw symbol-metadata record into a [`SymbolRecord`]
///
/// The raw record's `filters` list is indexed by its `filterType` tag; a
/// missing required filter is malformed exchange metadata and fails the
/// whole symbol. The full raw record rides along under `info`.
pub fn format_symbol(raw: &Value) -> Result<SymbolRecord, ConvertError> {
    let native = require_str(raw, "symbol")?.to_string();

    let filter_list = require(raw, "filters")?
        .as_array()
        .ok_or(ConvertError::MissingField("filters"))?;

    let mut filters: HashMap<&str, &Value> = HashMap::new();
    for entry in filter_list {
        if let Some(tag) = entry.get("filterType").and_then(Value::as_str) {
            filters.insert(tag, entry);
        }
    }

    for tag in REQUIRED_FILTERS {
        if !filters.contains_key(tag) {
            return Err(ConvertError::MissingFilter {
                symbol: native.clone(),
                filter_type: tag,
            });
        }
    }

    let lot_size = filters["LOT_SIZE"];
    let price_filter = filters["PRICE_FILTER"];
    let min_notional = filters["MIN_NOTIONAL"];
    let market_lot = filters["MARKET_LOT_SIZE"];

    let amount_tick = require_f64(lot_size, "stepSize")?;
    let price_tick = require_f64(price_filter, "tickSize")?;

    let symbol_type = SymbolType::from_code(coerce_code(require(raw, "type")?, "type")?)?;

    Ok(SymbolRecord {
        id: symbol::compact(&native),
        symbol: symbol::from_exchange(&native),
        symbol_type,
        base: require_str(raw, "baseAsset")?.to_string(),
        quote: require_str(raw, "quoteAsset")?.to_string(),
        active: true,
        spot: true,
        margin: true,
        future: true,
        precision: SymbolPrecision {
            amount: tick_precision(amount_tick, "stepSize")?,
            price: tick_precision(price_tick, "tickSize")?,
            price_tick,
            amount_tick,
            base: require_f64(raw, "basePrecision")?,
            quote: require_f64(raw, "quotePrecision")?,
        },
        limits: SymbolLimits {
            amount: MinMax {
                min: Some(require_f64(lot_size, "minQty")?),
                max: Some(require_f64(lot_size, "maxQty")?),
            },
            price: MinMax {
                min: Some(require_f64(price_filter, "minPrice")?),
                max: Some(require_f64(price_filter, "maxPrice")?),
            },
            cost: MinMax {
                min: Some(require_f64(min_notional, "minNotional")?),
                max: None,
            },
            market: MinMax {
                min: Some(require_f64(market_lot, "minQty")?),
                max: Some(require_f64(market_lot, "maxQty")?),
            },
        },
        info: raw.clone(),
    })
}

// ============================================================================
// Orders
// ============================================================================

/// Normalize one raw order payload into an [`OrderRecord`]
///
/// `orderId` is coerced to a string whether the wire carries a number or a
/// string. Unknown `side`/`status`/`type` codes are explicit errors: a
/// misread cancel or fill status must surface, not be defaulted.
pub fn format_order(raw: &Value) -> Result<OrderRecord, ConvertError> {
    let order_id =
        coerce_id(require(raw, "orderId")?).ok_or(ConvertError::MissingField("orderId"))?;

    let side = Side::from_code(coerce_code(require(raw, "side")?, "side")?)?;
    let order_type = OrderType::from_code(coerce_code(require(raw, "type")?, "type")?)?;
    let status = OrderStatus::from_code(coerce_code(require(raw, "status")?, "status")?)?;

    Ok(OrderRecord {
        order_id,
        client_id: raw
            .get("clientId")
            .and_then(Value::as_str)
            .map(str::to_string),
        symbol: symbol::from_exchange(require_str(raw, "symbol")?),
        side,
        order_type,
        status,
        price: require_f64(raw, "price")?,
        orig_qty: require_f64(raw, "origQty")?,
        orig_quote_qty: require_f64(raw, "origQuoteQty")?,
        executed_price: require_f64(raw, "executedPrice")?,
        executed_qty: require_f64(raw, "executedQty")?,
        executed_quote_qty: require_f64(raw, "executedQuoteQty")?,
        stop_price: require_f64(raw, "stopPrice")?,
        iceberg_qty: require_f64(raw, "icebergQty")?,
        create_time: raw.get("createTime").and_then(Value::as_i64),
        transact_time: None,
    })
}

// ============================================================================
// Balances
// ============================================================================

/// Normalize a raw per-asset balance list into a [`BalanceSheet`]
///
/// The flat map keeps every reported asset; the grouped `free`/`locked`/
/// `total` views keep only strictly-positive amounts. Recomputed on every
/// account query, never incrementally updated.
pub fn format_balance(raw_list: &[Value]) -> Result<BalanceSheet, ConvertError> {
    let mut sheet = BalanceSheet::default();

    for entry in raw_list {
        let asset = require_str(entry, "asset")?.to_string();
        let free = require_f64(entry, "free")?;
        let locked = require_f64(entry, "locked")?;
        let total = free + locked;

        if free > 0.0 {
            sheet.free.insert(asset.clone(), free);
        }
        if locked > 0.0 {
            sheet.locked.insert(asset.clone(), locked);
        }
        if total > 0.0 {
            sheet.total.insert(asset.clone(), total);
        }
        sheet.assets.insert(asset, AssetBalance { free, locked, total });
    }

    Ok(sheet)
}

// ============================================================================
// Market tickers
// ============================================================================

/// Numeric fields coerced by [`format_market`] when present
const MARKET_NUMERIC_FIELDS: [&str; 10] = [
    "price",
    "volume",
    "baseVolume",
    "amount",
    "quoteVolume",
    "low",
    "high",
    "open",
    "close",
    "change24h",
];

/// Normalize one raw ticker/trading-pair record into a [`MarketRecord`]
///
/// Fields absent from the payload are left absent — not defaulted to zero —
/// so callers can tell "not provided by this endpoint" apart from a
/// provided zero.
pub fn format_market(raw: &Value) -> Result<MarketRecord, ConvertError> {
    let mut numeric: HashMap<&str, f64> = HashMap::new();
    for field in MARKET_NUMERIC_FIELDS {
        if let Some(value) = raw.get(field) {
            numeric.insert(field, coerce_f64(value, field)?);
        }
    }

    Ok(MarketRecord {
        symbol: symbol::from_exchange(require_str(raw, "symbol")?),
        price: numeric.get("price").copied(),
        volume: numeric.get("volume").copied(),
        base_volume: numeric.get("baseVolume").copied(),
        amount: numeric.get("amount").copied(),
        quote_volume: numeric.get("quoteVolume").copied(),
        low: numeric.get("low").copied(),
        high: numeric.get("high").copied(),
        open: numeric.get("open").copied(),
        close: numeric.get("close").copied(),
        change_24h: numeric.get("change24h").copied(),
        info: raw.clone(),
    })
}

// ============================================================================
// Order book
// ============================================================================

/// Coerce a raw order book's string-encoded levels to numeric levels
pub fn format_order_book(raw: &RawOrderBook) -> Result<OrderBook, ConvertError> {
    fn levels(side: &[Vec<Value>], field: &'static str) -> Result<Vec<BookLevel>, ConvertError> {
        side.iter()
            .map(|entry| {
                let price = entry.first().ok_or(ConvertError::MissingField(field))?;
                let qty = entry.get(1).ok_or(ConvertError::MissingField(field))?;
                Ok(BookLevel {
                    price: coerce_f64(price, field)?,
                    qty: coerce_f64(qty, field)?,
                })
            })
            .collect()
    }

    Ok(OrderBook {
        bids: levels(&raw.bids, "bids")?,
        asks: levels(&raw.asks, "asks")?,
    })
}
