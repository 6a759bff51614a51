//! Integration tests for the normalization pipeline
//!
//! Drives the envelope decoding and normalizer on realistic raw payloads,
//! end to end: symbol metadata with filter lists, order payloads as the
//! exchange returns them from create/query/cancel, balance lists, and
//! trading-pair records.

use serde_json::{json, Value};
use trbinance_rest::types::{ApiResponse, DataList};
use trbinance_rest::{format_balance, format_market, format_order, format_symbol};
use trbinance_types::{symbol, ConvertError, OrderStatus, OrderType, Side, SymbolType};

// =============================================================================
// Fixtures
// =============================================================================

const SYMBOLS_RESPONSE: &str = r#"{
    "code": 0,
    "msg": "success",
    "timestamp": 1681279000123,
    "data": {
        "list": [
            {
                "symbol": "BTC_TRY",
                "type": 1,
                "baseAsset": "BTC",
                "basePrecision": 8,
                "quoteAsset": "TRY",
                "quotePrecision": 2,
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "1", "maxPrice": "10000000", "tickSize": "1"},
                    {"filterType": "LOT_SIZE", "minQty": "0.00001", "maxQty": "9000", "stepSize": "0.00001"},
                    {"filterType": "MIN_NOTIONAL", "minNotional": "10"},
                    {"filterType": "MARKET_LOT_SIZE", "minQty": "0.00001", "maxQty": "50"}
                ]
            },
            {
                "symbol": "ETH_USDT",
                "type": 1,
                "baseAsset": "ETH",
                "basePrecision": 8,
                "quoteAsset": "USDT",
                "quotePrecision": 8,
                "filters": [
                    {"filterType": "PRICE_FILTER", "minPrice": "0.01", "maxPrice": "100000", "tickSize": "0.01"},
                    {"filterType": "LOT_SIZE", "minQty": "0.0001", "maxQty": "9000", "stepSize": "0.001"},
                    {"filterType": "MIN_NOTIONAL", "minNotional": "10"},
                    {"filterType": "MARKET_LOT_SIZE", "minQty": "0.0001", "maxQty": "100"}
                ]
            }
        ]
    }
}"#;

fn created_order() -> Value {
    json!({
        "orderId": "5467573389",
        "bOrderListId": 0,
        "clientId": "e8d4abfa4e0774c039aec7717b5f1b4b9",
        "bOrderId": 207765154128u64,
        "symbol": "BTC_USDT",
        "symbolType": 1,
        "side": 0,
        "type": 1,
        "price": "10000",
        "origQty": "0.001",
        "origQuoteQty": "10.00000000",
        "executedQty": "0.00000000",
        "executedPrice": "0",
        "executedQuoteQty": "0.00000000",
        "timeInForce": 1,
        "stopPrice": 0,
        "icebergQty": "0",
        "status": 0,
        "createTime": 1681279199188i64
    })
}

fn cancelled_order() -> Value {
    // Cancel responses carry long-form decimals and no createTime
    json!({
        "orderId": "5467571389",
        "bOrderListId": "0",
        "clientId": "e8d4abf4ae0774c039aec7717b5f1b4b9",
        "bOrderId": "207736515418",
        "symbol": "BTC_USDT",
        "symbolType": 1,
        "type": 1,
        "side": 0,
        "price": "10000.0000000000000000",
        "origQty": "0.0010000000000000",
        "origQuoteQty": "10.0000000000000000",
        "executedPrice": "0.0000000000000000",
        "executedQty": "0.00000000",
        "executedQuoteQty": "0.00000000",
        "timeInForce": 1,
        "stopPrice": "0.0000000000000000",
        "icebergQty": "0.0000000000000000",
        "status": 3
    })
}

// =============================================================================
// Symbol metadata
// =============================================================================

#[test]
fn test_symbols_envelope_to_records() {
    let envelope: ApiResponse<DataList<Value>> = serde_json::from_str(SYMBOLS_RESPONSE).unwrap();
    assert!(envelope.is_success());

    let list = envelope.into_result().unwrap().data.unwrap().list;
    assert_eq!(list.len(), 2);

    let btc_try = format_symbol(&list[0]).unwrap();
    assert_eq!(btc_try.symbol, "BTC/TRY");
    assert_eq!(btc_try.id, "BTCTRY");
    assert_eq!(btc_try.base, "BTC");
    assert_eq!(btc_try.quote, "TRY");
    assert_eq!(btc_try.symbol_type, SymbolType::Next);
    assert_eq!(btc_try.precision.amount, 5);
    assert_eq!(btc_try.precision.price, 0);
    assert_eq!(btc_try.limits.amount.max, Some(9000.0));
    assert!(btc_try.active);

    let eth_usdt = format_symbol(&list[1]).unwrap();
    assert_eq!(eth_usdt.precision.amount, 3);
    assert_eq!(eth_usdt.precision.price, 2);
    assert_eq!(eth_usdt.precision.price_tick, 0.01);
    assert_eq!(eth_usdt.precision.amount_tick, 0.001);
}

#[test]
fn test_symbol_missing_filter_is_fatal_for_that_symbol() {
    let raw = json!({
        "symbol": "DOGE_TRY",
        "type": 1,
        "baseAsset": "DOGE",
        "basePrecision": 8,
        "quoteAsset": "TRY",
        "quotePrecision": 2,
        "filters": [
            {"filterType": "PRICE_FILTER", "minPrice": "0.0001", "maxPrice": "1000", "tickSize": "0.0001"},
            {"filterType": "LOT_SIZE", "minQty": "1", "maxQty": "9000000", "stepSize": "1"}
        ]
    });

    let err = format_symbol(&raw).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::MissingFilter {
            filter_type: "MIN_NOTIONAL",
            ..
        }
    ));
}

#[test]
fn test_symbol_convention_round_trip() {
    for native in ["BTC_USDT", "ETH_TRY", "AVAX_USDT"] {
        assert_eq!(symbol::to_exchange(&symbol::from_exchange(native)), native);
    }
    for canonical in ["BTC/USDT", "ETH/TRY"] {
        assert_eq!(
            symbol::from_exchange(&symbol::to_exchange(canonical)),
            canonical
        );
    }
}

// =============================================================================
// Orders
// =============================================================================

#[test]
fn test_created_order_normalizes() {
    let record = format_order(&created_order()).unwrap();

    assert_eq!(record.order_id, "5467573389");
    assert_eq!(
        record.client_id.as_deref(),
        Some("e8d4abfa4e0774c039aec7717b5f1b4b9")
    );
    assert_eq!(record.symbol, "BTC/USDT");
    assert_eq!(record.side, Side::Buy);
    assert_eq!(record.side.as_str(), "BUY");
    assert_eq!(record.order_type, OrderType::Limit);
    assert_eq!(record.status, OrderStatus::New);
    assert_eq!(record.status.as_str(), "NEW");
    assert_eq!(record.price, 10000.0);
    assert_eq!(record.orig_qty, 0.001);
    assert_eq!(record.create_time, Some(1681279199188));
}

#[test]
fn test_cancelled_order_normalizes() {
    let record = format_order(&cancelled_order()).unwrap();

    assert_eq!(record.status, OrderStatus::Canceled);
    assert!(record.status.is_terminal());
    assert_eq!(record.price, 10000.0);
    assert_eq!(record.create_time, None);
}

#[test]
fn test_every_known_side_and_status_resolves_to_a_name() {
    for side_code in [0, 1] {
        let mut raw = created_order();
        raw["side"] = json!(side_code);
        let record = format_order(&raw).unwrap();
        assert!(!record.side.as_str().is_empty());
    }

    for status_code in [-2, 0, 1, 2, 3, 4, 5, 6] {
        let mut raw = created_order();
        raw["status"] = json!(status_code);
        let record = format_order(&raw).unwrap();
        assert!(!record.status.as_str().is_empty());
    }
}

#[test]
fn test_out_of_range_side_is_a_lookup_error() {
    let mut raw = created_order();
    raw["side"] = json!(9);
    assert_eq!(format_order(&raw).unwrap_err(), ConvertError::UnknownSide(9));
}

// =============================================================================
// Balances
// =============================================================================

#[test]
fn test_balance_sheet_views() {
    let assets = vec![
        json!({"asset": "BTC", "free": "1.5", "locked": "0.5"}),
        json!({"asset": "ETH", "free": "0", "locked": "0"}),
        json!({"asset": "TRY", "free": "0", "locked": "250.75"}),
    ];

    let sheet = format_balance(&assets).unwrap();

    assert_eq!(sheet.total_of("BTC"), Some(2.0));
    assert_eq!(sheet.get("ETH").unwrap().total, 0.0);
    assert!(!sheet.total.contains_key("ETH"));

    // TRY has nothing free, so it appears in locked/total but not free
    assert_eq!(sheet.locked.get("TRY"), Some(&250.75));
    assert_eq!(sheet.total.get("TRY"), Some(&250.75));
    assert!(!sheet.free.contains_key("TRY"));

    assert_eq!(sheet.assets.len(), 3);
}

// =============================================================================
// Market records
// =============================================================================

#[test]
fn test_market_record_distinguishes_absent_from_zero() {
    let with_change = format_market(&json!({
        "symbol": "BTC_TRY",
        "price": "545000.5",
        "change24h": "0"
    }))
    .unwrap();
    assert_eq!(with_change.change_24h, Some(0.0));

    let without_change = format_market(&json!({
        "symbol": "BTC_TRY",
        "price": "545000.5"
    }))
    .unwrap();
    assert_eq!(without_change.change_24h, None);
}

// =============================================================================
// Envelope errors
// =============================================================================

#[test]
fn test_error_envelope_keeps_code_for_callers() {
    let raw = r#"{"code": 3219, "msg": "Order already cancelled"}"#;
    let envelope: ApiResponse<Value> = serde_json::from_str(raw).unwrap();

    let (code, message) = envelope.into_result().unwrap_err();
    assert_eq!(code, 3219);
    assert_eq!(message, "Order already cancelled");
    assert!(trbinance_types::ApiCode(code).is_already_canceled());
}
