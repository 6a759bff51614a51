//! Numeric envelope codes returned by the TRBinance open API
//!
//! Every enveloped response carries a `code` field; `0` is success and
//! anything else is an error. Most non-zero codes are surfaced to the
//! caller untouched so they can branch on them. The one documented benign
//! case is cancelling an order that is already cancelled, which the SDK
//! translates into an explicit outcome instead of an error.

/// Well-known envelope codes
pub mod codes {
    /// Successful response
    pub const SUCCESS: i64 = 0;

    /// Cancel rejected because the order is already cancelled
    pub const CANCEL_ALREADY_CANCELED: i64 = 3219;
}

/// A numeric envelope code with classification helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiCode(pub i64);

impl ApiCode {
    /// True for the success code
    pub fn is_success(&self) -> bool {
        self.0 == codes::SUCCESS
    }

    /// True for the benign "already cancelled" rejection
    pub fn is_already_canceled(&self) -> bool {
        self.0 == codes::CANCEL_ALREADY_CANCELED
    }
}

impl std::fmt::Display for ApiCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ApiCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_classification() {
        assert!(ApiCode(0).is_success());
        assert!(!ApiCode(0).is_already_canceled());
        assert!(ApiCode(3219).is_already_canceled());
        assert!(!ApiCode(3219).is_success());
        assert!(!ApiCode(1001).is_success());
    }
}
