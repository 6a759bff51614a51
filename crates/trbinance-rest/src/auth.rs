//! Authentication credentials and request signing
//!
//! Implements HMAC-SHA256 signing as required by TRBinance's private
//! endpoints. The signature is computed over the request's query string
//! serialized in parameter insertion order — the exchange verifies against
//! the order it receives, so [`Params`] is an ordered collection, not a map,
//! and no URL-encoding or sorting is applied to the signable string.
//!
//! # Security
//!
//! Secret keys are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{RestError, RestResult};

type HmacSha256 = Hmac<Sha256>;

/// Security classification of an endpoint
///
/// Private and signed requests carry a `timestamp` parameter and an HMAC
/// signature; public requests go out untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityType {
    /// No authentication required
    Public,
    /// Requires timestamp + signature + API-key header
    Private,
    /// Alias classification used by some endpoint docs; same handling as
    /// `Private`
    Signed,
}

impl SecurityType {
    /// Map an endpoint's security label to a classification
    ///
    /// Matching is case-insensitive; anything that is not `private` or
    /// `signed` is treated as public, mirroring the exchange documentation.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "private" => Self::Private,
            "signed" => Self::Signed,
            _ => Self::Public,
        }
    }

    /// True iff requests with this classification must be signed
    pub fn requires_signature(&self) -> bool {
        matches!(self, Self::Private | Self::Signed)
    }
}

/// Ordered request parameter set
///
/// Keys iterate in insertion order, and the canonical query string joins
/// `key=value` pairs with `&` in that same order. Two sets holding identical
/// pairs in different orders therefore sign differently; callers build
/// parameters in the order the endpoint expects and never reorder them.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Append a parameter only when a value is present
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// True if a key is already present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no parameters have been inserted
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The pairs in insertion order, as accepted by reqwest's `query`/`form`
    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    /// The canonical signable query string: `key=value` pairs joined with
    /// `&` in insertion order, no URL-encoding, no sorting
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Current Unix time in milliseconds, as required by the `timestamp`
/// parameter on signed requests
pub fn now_unix_millis() -> RestResult<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| RestError::SystemClock)?
        .as_millis() as u64)
}

/// API credentials for authenticated requests
///
/// The secret key is automatically zeroized when the Credentials are
/// dropped, preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (public, sent as the `X-MBX-APIKEY` header)
    api_key: String,
    /// Secret key (zeroized on drop)
    secret_key: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret key
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Create credentials from environment variables
    ///
    /// Reads `TRBINANCE_API_KEY` and `TRBINANCE_SECRET_KEY` from the
    /// environment.
    pub fn from_env() -> RestResult<Self> {
        let api_key = std::env::var("TRBINANCE_API_KEY")
            .map_err(|_| RestError::EnvVarNotSet("TRBINANCE_API_KEY".to_string()))?;
        let secret_key = std::env::var("TRBINANCE_SECRET_KEY")
            .map_err(|_| RestError::EnvVarNotSet("TRBINANCE_SECRET_KEY".to_string()))?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a parameter set
    ///
    /// Computes HMAC-SHA256 with the secret key over the canonical query
    /// string and returns the lowercase hexadecimal digest. The `timestamp`
    /// parameter must already be in the set; the returned signature is
    /// appended afterwards and is never part of its own input.
    ///
    /// An empty secret still produces a syntactically valid digest; the
    /// exchange rejects it as an authentication failure. Secret validity is
    /// not checked here.
    pub fn sign(&self, params: &Params) -> String {
        let query_string = params.to_query_string();

        // expose_secret() provides controlled access to the key
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(query_string.as_bytes());

        hex::encode(mac.finalize().into_bytes())
    }

    /// Prepare a parameter set for transmission on a signed endpoint
    ///
    /// Inserts `timestamp` (current Unix milliseconds), then appends the
    /// signature as the final parameter. The set is single-use after this:
    /// a retry must rebuild its parameters and authenticate again with a
    /// fresh timestamp.
    pub fn authenticate(&self, params: &mut Params) -> RestResult<()> {
        params.insert("timestamp", now_unix_millis()?);
        let signature = self.sign(params);
        params.insert("signature", signature);
        Ok(())
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates a new SecretString with the same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret_key: SecretString::from(self.secret_key.expose_secret().to_string()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field(
                "api_key",
                &format!("{}...", &self.api_key[..8.min(self.api_key.len())]),
            )
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_params() -> Params {
        let mut params = Params::new();
        params.insert("symbol", "BTC_USDT");
        params.insert("side", 0);
        params.insert("type", 1);
        params.insert("quantity", "0.001");
        params.insert("price", 10000);
        params.insert("timestamp", 1681279199188u64);
        params
    }

    #[test]
    fn test_security_type_labels() {
        assert!(SecurityType::from_label("private").requires_signature());
        assert!(SecurityType::from_label("PRIVATE").requires_signature());
        assert!(SecurityType::from_label("Signed").requires_signature());
        assert!(!SecurityType::from_label("public").requires_signature());
        assert!(!SecurityType::from_label("anything-else").requires_signature());
    }

    #[test]
    fn test_query_string_preserves_insertion_order() {
        let params = signed_params();
        assert_eq!(
            params.to_query_string(),
            "symbol=BTC_USDT&side=0&type=1&quantity=0.001&price=10000&timestamp=1681279199188"
        );
    }

    #[test]
    fn test_signature_known_vector() {
        let creds = Credentials::new("api-key", "test-secret");
        assert_eq!(
            creds.sign(&signed_params()),
            "76f6a03c377a79ca051d38a6892d7a7dc16b8087f268f4024837c2f954a566d1"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let creds = Credentials::new("api-key", "test-secret");
        assert_eq!(creds.sign(&signed_params()), creds.sign(&signed_params()));
    }

    #[test]
    fn test_signature_is_order_sensitive() {
        let creds = Credentials::new("api-key", "test-secret");

        // Same pairs, symbol and side swapped
        let mut reordered = Params::new();
        reordered.insert("side", 0);
        reordered.insert("symbol", "BTC_USDT");
        reordered.insert("type", 1);
        reordered.insert("quantity", "0.001");
        reordered.insert("price", 10000);
        reordered.insert("timestamp", 1681279199188u64);

        assert_eq!(
            creds.sign(&reordered),
            "626ccd14cab30083999dccce6eb5291bf7842c7b3cb272d73a0f893aa61c472a"
        );
        assert_ne!(creds.sign(&signed_params()), creds.sign(&reordered));
    }

    #[test]
    fn test_empty_secret_still_signs() {
        let creds = Credentials::new("api-key", "");
        let mut params = Params::new();
        params.insert("orderId", "5467573389");
        params.insert("timestamp", 1681279199188u64);

        assert_eq!(
            creds.sign(&params),
            "fc56f95048181c94ccf125029fcecd3fa59b88d86ebafe7326eb0918455785a2"
        );
    }

    #[test]
    fn test_authenticate_appends_timestamp_then_signature() {
        let creds = Credentials::new("api-key", "test-secret");
        let mut params = Params::new();
        params.insert("orderId", "5467573389");

        creds.authenticate(&mut params).unwrap();

        let keys: Vec<&str> = params.as_slice().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["orderId", "timestamp", "signature"]);

        // The signature covers everything before it
        let (last_key, last_value) = params.as_slice().last().unwrap();
        assert_eq!(last_key, "signature");
        assert_eq!(last_value.len(), 64);
        assert!(last_value.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!last_value.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("test_api_key", "super-secret-key");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }
}
