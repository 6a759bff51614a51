//! Side, OrderType, OrderStatus, SymbolType, and KlineInterval enums
//!
//! TRBinance encodes order sides, types, and statuses as small integers on
//! the wire. Each enum here carries the exchange's discriminant and resolves
//! through a fallible `from_code` — an unrecognized code is protocol drift
//! and must surface as an error, never be defaulted, since misreading a
//! trading-safety field risks real financial loss.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (wire code 0)
    Buy = 0,
    /// Sell order (wire code 1)
    Sell = 1,
}

impl Side {
    /// Resolve the exchange's integer code
    pub fn from_code(code: i64) -> Result<Self, ConvertError> {
        match code {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            other => Err(ConvertError::UnknownSide(other)),
        }
    }

    /// The wire code for this side
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Returns the side name as used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Limit order (wire code 1)
    Limit = 1,
    /// Market order (wire code 2)
    Market = 2,
    /// Stop-loss order (wire code 3)
    StopLoss = 3,
    /// Stop-loss limit order (wire code 4)
    StopLossLimit = 4,
    /// Take-profit order (wire code 5)
    TakeProfit = 5,
    /// Take-profit limit order (wire code 6)
    TakeProfitLimit = 6,
    /// Limit maker order (wire code 7)
    LimitMaker = 7,
}

impl OrderType {
    /// Resolve the exchange's integer code
    pub fn from_code(code: i64) -> Result<Self, ConvertError> {
        match code {
            1 => Ok(Self::Limit),
            2 => Ok(Self::Market),
            3 => Ok(Self::StopLoss),
            4 => Ok(Self::StopLossLimit),
            5 => Ok(Self::TakeProfit),
            6 => Ok(Self::TakeProfitLimit),
            7 => Ok(Self::LimitMaker),
            other => Err(ConvertError::UnknownOrderType(other)),
        }
    }

    /// The wire code for this order type
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Returns the type name as used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::StopLoss => "STOP_LOSS",
            Self::StopLossLimit => "STOP_LOSS_LIMIT",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            Self::LimitMaker => "LIMIT_MAKER",
        }
    }

    /// True for the order types the exchange accepts on the create endpoint
    /// (LIMIT, MARKET, STOP_LOSS_LIMIT, TAKE_PROFIT_LIMIT)
    pub fn is_placeable(&self) -> bool {
        matches!(
            self,
            Self::Limit | Self::Market | Self::StopLossLimit | Self::TakeProfitLimit
        )
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order is being processed by the matching engine (wire code -2)
    SystemProcessing = -2,
    /// Order accepted, not yet filled (wire code 0)
    New = 0,
    /// Order partially filled (wire code 1)
    PartiallyFilled = 1,
    /// Order completely filled (wire code 2)
    Filled = 2,
    /// Order cancelled by the user (wire code 3)
    Canceled = 3,
    /// Cancel requested, not yet confirmed (wire code 4)
    PendingCancel = 4,
    /// Order rejected by the exchange (wire code 5)
    Rejected = 5,
    /// Order expired (wire code 6)
    Expired = 6,
}

impl OrderStatus {
    /// Resolve the exchange's integer code
    pub fn from_code(code: i64) -> Result<Self, ConvertError> {
        match code {
            -2 => Ok(Self::SystemProcessing),
            0 => Ok(Self::New),
            1 => Ok(Self::PartiallyFilled),
            2 => Ok(Self::Filled),
            3 => Ok(Self::Canceled),
            4 => Ok(Self::PendingCancel),
            5 => Ok(Self::Rejected),
            6 => Ok(Self::Expired),
            other => Err(ConvertError::UnknownOrderStatus(other)),
        }
    }

    /// The wire code for this status
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Returns the status name as used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemProcessing => "SYSTEM_PROCESSING",
            Self::New => "NEW",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Canceled => "CANCELED",
            Self::PendingCancel => "PENDING_CANCEL",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }

    /// True while the order can still trade
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Self::SystemProcessing | Self::New | Self::PartiallyFilled | Self::PendingCancel
        )
    }

    /// True once the order can no longer change
    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Symbol routing class
///
/// Type 1 ("next") symbols serve market data from the secondary host with
/// the compact symbol form; type 0 symbols use the primary open API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolType {
    /// Primary open-API symbols (wire code 0)
    Main = 0,
    /// Symbols served by the secondary market-data host (wire code 1)
    Next = 1,
}

impl SymbolType {
    /// Resolve the exchange's integer code
    pub fn from_code(code: i64) -> Result<Self, ConvertError> {
        match code {
            0 => Ok(Self::Main),
            1 => Ok(Self::Next),
            other => Err(ConvertError::UnknownSymbolType(other)),
        }
    }

    /// The wire code for this symbol type
    pub fn code(&self) -> i64 {
        *self as i64
    }
}

/// Candlestick interval accepted by the kline endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "3m")]
    M3,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "2h")]
    H2,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "8h")]
    H8,
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "1d")]
    D1,
    #[serde(rename = "3d")]
    D3,
    #[serde(rename = "1w")]
    W1,
    #[serde(rename = "1M")]
    Mo1,
}

impl KlineInterval {
    /// Returns the interval label as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M3 => "3m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H2 => "2h",
            Self::H4 => "4h",
            Self::H6 => "6h",
            Self::H8 => "8h",
            Self::H12 => "12h",
            Self::D1 => "1d",
            Self::D3 => "3d",
            Self::W1 => "1w",
            Self::Mo1 => "1M",
        }
    }
}

impl std::fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for KlineInterval {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::M1),
            "3m" => Ok(Self::M3),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "30m" => Ok(Self::M30),
            "1h" => Ok(Self::H1),
            "2h" => Ok(Self::H2),
            "4h" => Ok(Self::H4),
            "6h" => Ok(Self::H6),
            "8h" => Ok(Self::H8),
            "12h" => Ok(Self::H12),
            "1d" => Ok(Self::D1),
            "3d" => Ok(Self::D3),
            "1w" => Ok(Self::W1),
            "1M" => Ok(Self::Mo1),
            other => Err(ConvertError::UnknownInterval(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_codes() {
        assert_eq!(Side::from_code(0).unwrap(), Side::Buy);
        assert_eq!(Side::from_code(1).unwrap(), Side::Sell);
        assert!(matches!(
            Side::from_code(9),
            Err(ConvertError::UnknownSide(9))
        ));
        assert_eq!(Side::Buy.code(), 0);
        assert_eq!(Side::Buy.opposite(), Side::Sell);
    }

    #[test]
    fn test_order_status_codes() {
        for code in [-2, 0, 1, 2, 3, 4, 5, 6] {
            let status = OrderStatus::from_code(code).unwrap();
            assert!(!status.as_str().is_empty());
            assert_eq!(status.code(), code);
        }
        assert!(OrderStatus::from_code(7).is_err());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::PartiallyFilled.is_open());
    }

    #[test]
    fn test_order_type_placeable() {
        assert!(OrderType::Limit.is_placeable());
        assert!(OrderType::Market.is_placeable());
        assert!(OrderType::StopLossLimit.is_placeable());
        assert!(OrderType::TakeProfitLimit.is_placeable());
        assert!(!OrderType::StopLoss.is_placeable());
        assert!(!OrderType::TakeProfit.is_placeable());
        assert!(!OrderType::LimitMaker.is_placeable());
    }

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"BUY\"");
        let parsed: OrderStatus = serde_json::from_str("\"PARTIALLY_FILLED\"").unwrap();
        assert_eq!(parsed, OrderStatus::PartiallyFilled);
    }

    #[test]
    fn test_kline_interval_round_trip() {
        for label in [
            "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d",
            "1w", "1M",
        ] {
            let interval: KlineInterval = label.parse().unwrap();
            assert_eq!(interval.as_str(), label);
        }
        assert!("45m".parse::<KlineInterval>().is_err());
    }
}
