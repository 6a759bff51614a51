//! Trading pair symbols and the exchange's naming conventions
//!
//! TRBinance names pairs with an underscore (`BTC_USDT`) on the wire and a
//! compact form (`BTCUSDT`) on the secondary market-data host. The SDK
//! normalizes both to the conventional slash form (`BTC/USDT`). Native
//! symbols never contain `/` and canonical symbols never contain `_`, so the
//! two conversions round-trip for every well-formed input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Convert an exchange-native symbol to canonical form (`BTC_USDT` -> `BTC/USDT`).
pub fn from_exchange(symbol: &str) -> String {
    symbol.replace('_', "/")
}

/// Convert a canonical symbol to exchange-native form (`BTC/USDT` -> `BTC_USDT`).
pub fn to_exchange(symbol: &str) -> String {
    symbol.replace('/', "_")
}

/// Compact form used by the secondary host (`BTC_USDT` or `BTC/USDT` -> `BTCUSDT`).
pub fn compact(symbol: &str) -> String {
    symbol.replace(['_', '/'], "")
}

/// Trading pair symbol in canonical `BASE/QUOTE` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol from a string already in canonical form
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build a canonical symbol from the exchange's underscore notation
    pub fn from_exchange(s: &str) -> Self {
        Self(from_exchange(s))
    }

    /// Get the symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The exchange-native underscore form
    pub fn to_exchange(&self) -> String {
        to_exchange(&self.0)
    }

    /// The compact id form with the separator removed
    pub fn compact(&self) -> String {
        compact(&self.0)
    }

    /// Get the base asset (e.g., "BTC" from "BTC/USDT")
    pub fn base(&self) -> Option<&str> {
        self.0.split('/').next()
    }

    /// Get the quote asset (e.g., "USDT" from "BTC/USDT")
    pub fn quote(&self) -> Option<&str> {
        self.0.split('/').nth(1)
    }
}

impl FromStr for Symbol {
    type Err = SymbolParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains('/') {
            return Err(SymbolParseError::MissingSlash(s.to_string()));
        }

        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 {
            return Err(SymbolParseError::InvalidFormat(s.to_string()));
        }

        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(SymbolParseError::EmptyPart(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Error parsing a symbol
#[derive(Debug, Clone, thiserror::Error)]
pub enum SymbolParseError {
    #[error("Symbol must contain '/': {0}")]
    MissingSlash(String),

    #[error("Invalid symbol format: {0}")]
    InvalidFormat(String),

    #[error("Symbol has empty base or quote: {0}")]
    EmptyPart(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_round_trip() {
        assert_eq!(from_exchange("BTC_USDT"), "BTC/USDT");
        assert_eq!(to_exchange("BTC/USDT"), "BTC_USDT");
        assert_eq!(to_exchange(&from_exchange("ETH_TRY")), "ETH_TRY");
        assert_eq!(from_exchange(&to_exchange("ETH/TRY")), "ETH/TRY");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact("BTC_USDT"), "BTCUSDT");
        assert_eq!(compact("BTC/USDT"), "BTCUSDT");
    }

    #[test]
    fn test_symbol_parse() {
        let symbol: Symbol = "BTC/USDT".parse().unwrap();
        assert_eq!(symbol.as_str(), "BTC/USDT");
        assert_eq!(symbol.base(), Some("BTC"));
        assert_eq!(symbol.quote(), Some("USDT"));
        assert_eq!(symbol.to_exchange(), "BTC_USDT");
        assert_eq!(symbol.compact(), "BTCUSDT");
    }

    #[test]
    fn test_symbol_parse_error() {
        assert!("BTCUSDT".parse::<Symbol>().is_err());
        assert!("/USDT".parse::<Symbol>().is_err());
        assert!("BTC/".parse::<Symbol>().is_err());
    }

    #[test]
    fn test_symbol_serde() {
        let symbol = Symbol::from_exchange("ETH_USDT");
        let json = serde_json::to_string(&symbol).unwrap();
        assert_eq!(json, "\"ETH/USDT\"");

        let parsed: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, symbol);
    }
}
