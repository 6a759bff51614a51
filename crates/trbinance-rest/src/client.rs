//! Main REST client implementation

use crate::auth::{Credentials, Params, SecurityType};
use crate::endpoints::{AccountEndpoints, FundingEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::normalize::format_symbol;
use crate::types::{
    AllOrdersQuery, ApiResponse, BalanceSheet, CancelOutcome, DataList, Enveloped, NewOrder,
    OrderBook, OrderRecord, ServerTime, SymbolRecord,
};
use crate::used_weight::UsedWeightTracker;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Primary open-API host
const DEFAULT_BASE_URL: &str = "https://www.trbinance.com/open/v1";

/// Secondary market-data host used by type-1 symbols
const DEFAULT_MARKET_DATA_URL: &str = "https://api.binance.me/api";

/// Which host a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Host {
    /// The primary open API (enveloped responses)
    Base,
    /// The secondary market-data host (bare responses)
    MarketData,
}

/// HTTP verbs the exchange API uses
///
/// GET requests carry parameters in the query string, POST requests as a
/// form body; both serialize the same insertion-ordered parameter set the
/// signature was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
}

/// TRBinance REST API client
///
/// Provides access to both public and private endpoints. Cloning is cheap
/// and clones share the markets cache and the usage-weight map, so a client
/// can be handed to many concurrent tasks. Each request carries its own
/// timestamp and signature; no other state is shared between in-flight
/// requests.
///
/// # Example
///
/// ```no_run
/// use trbinance_rest::{Credentials, TrBinanceRestClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Public endpoints only
///     let client = TrBinanceRestClient::new();
///     let markets = client.load_markets().await?;
///     println!("{} symbols", markets.len());
///
///     // With authentication for private endpoints
///     let creds = Credentials::from_env()?;
///     let auth_client = TrBinanceRestClient::with_credentials(creds);
///     let balances = auth_client.account_balance().await?;
///     println!("BTC: {:?}", balances.total_of("BTC"));
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TrBinanceRestClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) market_data_url: String,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) used_weight: UsedWeightTracker,
    /// Session market metadata: populated by the first successful
    /// `load_markets`, replaced only by an explicit re-fetch. Readers treat
    /// "not yet populated" as absent, not as an error.
    pub(crate) markets: RwLock<Option<HashMap<String, SymbolRecord>>>,
}

impl TrBinanceRestClient {
    /// Create a new client without authentication
    ///
    /// Only public endpoints will be available.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    ///
    /// All endpoints (public and private) will be available.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or("trbinance-rest/0.1.0"))
            .build()
            .expect("Failed to create HTTP client");

        info!("Created TRBinance REST client");

        Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.base_url,
                market_data_url: config.market_data_url,
                credentials: config.credentials,
                used_weight: UsedWeightTracker::new(),
                markets: RwLock::new(None),
            }),
        }
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.inner.credentials.is_some()
    }

    // ========================================================================
    // Session state
    // ========================================================================

    /// Fetch symbol metadata and (re)populate the session markets cache
    ///
    /// Calling this again re-fetches and replaces the cache; nothing else
    /// invalidates it.
    pub async fn load_markets(&self) -> RestResult<HashMap<String, SymbolRecord>> {
        self.inner.load_markets().await
    }

    /// Snapshot of the cached market metadata, if loaded
    pub fn markets(&self) -> Option<HashMap<String, SymbolRecord>> {
        self.inner.markets.read().clone()
    }

    /// Canonical symbols of the cached market metadata, if loaded
    pub fn symbols(&self) -> Option<Vec<String>> {
        self.inner
            .markets
            .read()
            .as_ref()
            .map(|markets| markets.keys().cloned().collect())
    }

    /// Last observed rate-limit usage per timeframe label
    pub fn used_weight(&self) -> HashMap<String, f64> {
        self.inner.used_weight.snapshot()
    }

    /// Last observed rate-limit usage for one timeframe label
    pub fn used_weight_for(&self, timeframe: &str) -> Option<f64> {
        self.inner.used_weight.get(timeframe)
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    /// Public market-data endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.inner)
    }

    /// Order placement and management endpoints (requires credentials)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        self.require_credentials()?;
        Ok(TradingEndpoints::new(&self.inner))
    }

    /// Account endpoints (requires credentials)
    pub fn account(&self) -> RestResult<AccountEndpoints<'_>> {
        self.require_credentials()?;
        Ok(AccountEndpoints::new(&self.inner))
    }

    /// Deposit and withdrawal endpoints (requires credentials)
    pub fn funding(&self) -> RestResult<FundingEndpoints<'_>> {
        self.require_credentials()?;
        Ok(FundingEndpoints::new(&self.inner))
    }

    fn require_credentials(&self) -> RestResult<()> {
        if self.inner.credentials.is_none() {
            return Err(RestError::AuthRequired);
        }
        Ok(())
    }

    // ========================================================================
    // Convenience delegates
    // ========================================================================

    /// Get the exchange server time
    pub async fn server_time(&self) -> RestResult<ServerTime> {
        self.market().server_time().await
    }

    /// Get the order book for a canonical symbol
    pub async fn order_book(&self, symbol: &str, limit: Option<u32>) -> RestResult<OrderBook> {
        self.market().order_book(symbol, limit).await
    }

    /// Place a new order
    pub async fn create_order(&self, order: &NewOrder) -> RestResult<OrderRecord> {
        self.trading()?.create_order(order).await
    }

    /// Query an order by id
    pub async fn query_order(&self, order_id: &str) -> RestResult<OrderRecord> {
        self.trading()?.query_order(order_id).await
    }

    /// Cancel an order by id
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<CancelOutcome> {
        self.trading()?.cancel_order(order_id).await
    }

    /// List historical orders, optionally restricted to one symbol
    pub async fn all_orders(
        &self,
        symbol: Option<&str>,
        query: AllOrdersQuery,
    ) -> RestResult<Vec<OrderRecord>> {
        self.trading()?.all_orders(symbol, query).await
    }

    /// Get normalized account balances
    pub async fn account_balance(&self) -> RestResult<BalanceSheet> {
        self.account()?.account_balance().await
    }
}

impl Default for TrBinanceRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TrBinanceRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrBinanceRestClient")
            .field("has_credentials", &self.has_credentials())
            .field("markets_loaded", &self.inner.markets.read().is_some())
            .finish()
    }
}

impl ClientInner {
    /// Issue one request: sign when required, record usage weight, return
    /// the raw response for the caller to decode
    async fn send(
        &self,
        method: HttpMethod,
        host: Host,
        endpoint: &str,
        security: SecurityType,
        mut params: Params,
    ) -> RestResult<reqwest::Response> {
        let base = match host {
            Host::Base => &self.base_url,
            Host::MarketData => &self.market_data_url,
        };
        let url = format!("{}{}", base, endpoint);

        let credentials = if security.requires_signature() {
            let credentials = self.credentials.as_ref().ok_or(RestError::AuthRequired)?;
            // Timestamp first, signature last; the set is single-use after
            // this, so retries re-enter here with fresh parameters.
            credentials.authenticate(&mut params)?;
            Some(credentials)
        } else {
            None
        };

        let mut request = match method {
            HttpMethod::Get => self.http.get(&url).query(params.as_slice()),
            HttpMethod::Post => self.http.post(&url).form(params.as_slice()),
        };

        if let Some(credentials) = credentials {
            request = request.header("X-MBX-APIKEY", credentials.api_key());
        }

        debug!(%url, "sending request");

        let response = request.send().await?;
        // Weight headers ride on success and error responses alike
        self.used_weight.record(response.headers());

        Ok(response)
    }

    /// Request an enveloped open-API endpoint
    ///
    /// A non-zero envelope code becomes [`RestError::Api`] carrying the raw
    /// code and message.
    pub(crate) async fn request_enveloped<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        security: SecurityType,
        params: Params,
    ) -> RestResult<Enveloped<T>> {
        let response = self
            .send(method, Host::Base, endpoint, security, params)
            .await?;
        let envelope: ApiResponse<T> = response.json().await?;

        envelope
            .into_result()
            .map_err(|(code, message)| RestError::Api { code, message })
    }

    /// Request an endpoint that returns a bare (non-enveloped) payload
    pub(crate) async fn request_bare<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        host: Host,
        endpoint: &str,
        params: Params,
    ) -> RestResult<T> {
        let response = self
            .send(method, host, endpoint, SecurityType::Public, params)
            .await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn load_markets(&self) -> RestResult<HashMap<String, SymbolRecord>> {
        let enveloped: Enveloped<DataList<Value>> = self
            .request_enveloped(
                HttpMethod::Get,
                "/common/symbols",
                SecurityType::Public,
                Params::new(),
            )
            .await?;

        let list = require_data(enveloped.data, "symbols")?.list;

        let mut markets = HashMap::with_capacity(list.len());
        for raw in &list {
            let record = format_symbol(raw)?;
            markets.insert(record.symbol.clone(), record);
        }

        info!(count = markets.len(), "loaded market metadata");

        *self.markets.write() = Some(markets.clone());
        Ok(markets)
    }

    /// Resolve a canonical symbol against the session cache, loading the
    /// cache on first use
    pub(crate) async fn symbol_record(&self, canonical: &str) -> RestResult<SymbolRecord> {
        {
            let markets = self.markets.read();
            if let Some(markets) = markets.as_ref() {
                return markets
                    .get(canonical)
                    .cloned()
                    .ok_or_else(|| RestError::UnknownSymbol(canonical.to_string()));
            }
        }

        let markets = self.load_markets().await?;
        markets
            .get(canonical)
            .cloned()
            .ok_or_else(|| RestError::UnknownSymbol(canonical.to_string()))
    }
}

/// Unwrap an envelope's `data`, failing on a success response that
/// unexpectedly lacks one
pub(crate) fn require_data<T>(data: Option<T>, what: &str) -> RestResult<T> {
    data.ok_or_else(|| RestError::Parse(format!("{} response missing data", what)))
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Primary open-API host
    pub base_url: String,
    /// Secondary market-data host
    pub market_data_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            market_data_url: DEFAULT_MARKET_DATA_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the primary open-API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the secondary market-data host
    pub fn with_market_data_url(mut self, market_data_url: impl Into<String>) -> Self {
        self.market_data_url = market_data_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_credentials() {
        let client = TrBinanceRestClient::new();
        assert!(!client.has_credentials());
        assert!(client.markets().is_none());
        assert!(client.symbols().is_none());
        assert!(client.used_weight().is_empty());
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_base_url("http://localhost:9000/open/v1");

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.base_url, "http://localhost:9000/open/v1");
        assert_eq!(config.market_data_url, DEFAULT_MARKET_DATA_URL);
    }

    #[test]
    fn test_auth_required_errors() {
        let client = TrBinanceRestClient::new();
        assert!(matches!(client.trading(), Err(RestError::AuthRequired)));
        assert!(matches!(client.account(), Err(RestError::AuthRequired)));
        assert!(matches!(client.funding(), Err(RestError::AuthRequired)));
    }

    #[test]
    fn test_debug_does_not_leak_credentials() {
        let client =
            TrBinanceRestClient::with_credentials(Credentials::new("key", "very-secret"));
        let debug = format!("{:?}", client);
        assert!(!debug.contains("very-secret"));
    }
}
