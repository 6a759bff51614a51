//! Error types for REST API operations

use trbinance_types::ConvertError;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing API credentials for private endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// API envelope carried a non-zero code
    ///
    /// The code and message are propagated untouched so callers can branch
    /// on specific exchange error codes.
    #[error("API error {code}: {message}")]
    Api {
        /// Numeric envelope code
        code: i64,
        /// Error message from the exchange
        message: String,
    },

    /// Failed to normalize a payload into its canonical form
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Failed to parse a response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Symbol is not present in the loaded market metadata
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// System clock is before the Unix epoch
    #[error("System clock error: time went backwards")]
    SystemClock,

    /// Failed to build the blocking runtime
    #[cfg(feature = "blocking")]
    #[error("Runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl RestError {
    /// The exchange's numeric error code, if this is an API error
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the exchange rejected the request as unauthenticated or
    /// when no credentials were configured at all
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_code_accessor() {
        let err = RestError::Api {
            code: 3219,
            message: "Order already cancelled".to_string(),
        };
        assert_eq!(err.api_code(), Some(3219));
        assert_eq!(err.to_string(), "API error 3219: Order already cancelled");

        assert_eq!(RestError::AuthRequired.api_code(), None);
        assert!(RestError::AuthRequired.is_auth_error());
    }

    #[test]
    fn test_convert_error_wrapping() {
        let err: RestError = ConvertError::UnknownSide(9).into();
        assert!(matches!(
            err,
            RestError::Convert(ConvertError::UnknownSide(9))
        ));
    }
}
