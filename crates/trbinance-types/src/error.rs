//! Errors raised while normalizing raw exchange payloads

use thiserror::Error;

/// Errors produced when converting a raw exchange payload into its
/// canonical representation
///
/// These all indicate malformed or drifted exchange metadata. None of them
/// are recoverable by substituting a default: side, status, and precision
/// feed trading decisions, so a wrong guess is worse than a loud failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// Side code outside the known enumeration
    #[error("Unknown side code: {0}")]
    UnknownSide(i64),

    /// Order type code outside the known enumeration
    #[error("Unknown order type code: {0}")]
    UnknownOrderType(i64),

    /// Order status code outside the known enumeration
    #[error("Unknown order status code: {0}")]
    UnknownOrderStatus(i64),

    /// Symbol type code outside the known enumeration
    #[error("Unknown symbol type code: {0}")]
    UnknownSymbolType(i64),

    /// Kline interval label the exchange does not accept
    #[error("Unknown kline interval: {0}")]
    UnknownInterval(String),

    /// A required filter entry is absent from symbol metadata
    #[error("Symbol {symbol} is missing required filter {filter_type}")]
    MissingFilter {
        /// Exchange-native symbol the metadata belongs to
        symbol: String,
        /// The absent `filterType` tag
        filter_type: &'static str,
    },

    /// A required field is absent from the payload
    #[error("Payload is missing required field {0}")]
    MissingField(&'static str),

    /// A field that should hold a number could not be parsed as one
    #[error("Field {field} holds a non-numeric value: {value}")]
    NumericField {
        /// Field name in the raw payload
        field: String,
        /// The offending value, for diagnostics
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvertError::MissingFilter {
            symbol: "BTC_USDT".to_string(),
            filter_type: "LOT_SIZE",
        };
        assert_eq!(
            err.to_string(),
            "Symbol BTC_USDT is missing required filter LOT_SIZE"
        );

        let err = ConvertError::UnknownSide(9);
        assert_eq!(err.to_string(), "Unknown side code: 9");
    }
}
