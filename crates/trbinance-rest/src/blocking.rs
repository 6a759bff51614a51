//! Synchronous client
//!
//! A blocking wrapper for callers that don't run an async runtime of their
//! own. The wrapper owns a current-thread tokio runtime and drives the
//! async client on it; signing and normalization are the exact same code
//! paths, so the two modes cannot drift apart. Enabled with the `blocking`
//! cargo feature.

use crate::auth::Credentials;
use crate::client::{ClientConfig, TrBinanceRestClient};
use crate::error::RestResult;
use crate::types::{
    AccountInfo, AggTradesQuery, AllOrdersQuery, BalanceSheet, CancelOutcome, HistoryQuery,
    KlineQuery, MarketInfoQuery, MarketRecord, NewOrder, OcoOrder, OrderBook, OrderRecord,
    ServerTime, SymbolRecord, TradeListQuery, TradeQuery, WithdrawOptions,
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use tokio::runtime::{Builder, Runtime};
use trbinance_types::KlineInterval;

/// Blocking TRBinance REST API client
///
/// # Example
///
/// ```no_run
/// use trbinance_rest::blocking::BlockingClient;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BlockingClient::new()?;
///     let markets = client.load_markets()?;
///     println!("{} symbols", markets.len());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BlockingClient {
    inner: TrBinanceRestClient,
    runtime: Runtime,
}

impl BlockingClient {
    /// Create a new blocking client without authentication
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new blocking client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new blocking client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            inner: TrBinanceRestClient::with_config(config),
            runtime,
        })
    }

    /// The wrapped async client
    pub fn async_client(&self) -> &TrBinanceRestClient {
        &self.inner
    }

    /// Check if the client has credentials for private endpoints
    pub fn has_credentials(&self) -> bool {
        self.inner.has_credentials()
    }

    // ========================================================================
    // Session state
    // ========================================================================

    /// Fetch symbol metadata and (re)populate the session markets cache
    pub fn load_markets(&self) -> RestResult<HashMap<String, SymbolRecord>> {
        self.runtime.block_on(self.inner.load_markets())
    }

    /// Snapshot of the cached market metadata, if loaded
    pub fn markets(&self) -> Option<HashMap<String, SymbolRecord>> {
        self.inner.markets()
    }

    /// Canonical symbols of the cached market metadata, if loaded
    pub fn symbols(&self) -> Option<Vec<String>> {
        self.inner.symbols()
    }

    /// Last observed rate-limit usage per timeframe label
    pub fn used_weight(&self) -> HashMap<String, f64> {
        self.inner.used_weight()
    }

    /// Last observed rate-limit usage for one timeframe label
    pub fn used_weight_for(&self, timeframe: &str) -> Option<f64> {
        self.inner.used_weight_for(timeframe)
    }

    // ========================================================================
    // Market data
    // ========================================================================

    /// Get the exchange server time
    pub fn server_time(&self) -> RestResult<ServerTime> {
        self.runtime.block_on(self.inner.market().server_time())
    }

    /// List trading pairs with current market data
    pub fn market_info(&self, query: MarketInfoQuery) -> RestResult<HashMap<String, MarketRecord>> {
        self.runtime.block_on(self.inner.market().market_info(query))
    }

    /// Get the order book for a canonical symbol
    pub fn order_book(&self, symbol: &str, limit: Option<u32>) -> RestResult<OrderBook> {
        self.runtime
            .block_on(self.inner.market().order_book(symbol, limit))
    }

    /// Get recent trades for a canonical symbol
    pub fn recent_trades(&self, symbol: &str, query: TradeQuery) -> RestResult<Vec<Value>> {
        self.runtime
            .block_on(self.inner.market().recent_trades(symbol, query))
    }

    /// Get aggregated trades for a canonical symbol
    pub fn agg_trades(&self, symbol: &str, query: AggTradesQuery) -> RestResult<Vec<Value>> {
        self.runtime
            .block_on(self.inner.market().agg_trades(symbol, query))
    }

    /// Get candlestick data for a canonical symbol
    pub fn klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        query: KlineQuery,
    ) -> RestResult<Vec<Value>> {
        self.runtime
            .block_on(self.inner.market().klines(symbol, interval, query))
    }

    // ========================================================================
    // Trading
    // ========================================================================

    /// Place a new order
    pub fn create_order(&self, order: &NewOrder) -> RestResult<OrderRecord> {
        self.runtime.block_on(self.inner.create_order(order))
    }

    /// Query an order by id
    pub fn query_order(&self, order_id: &str) -> RestResult<OrderRecord> {
        self.runtime.block_on(self.inner.query_order(order_id))
    }

    /// Cancel an order by id
    pub fn cancel_order(&self, order_id: &str) -> RestResult<CancelOutcome> {
        self.runtime.block_on(self.inner.cancel_order(order_id))
    }

    /// List historical orders, optionally restricted to one symbol
    pub fn all_orders(
        &self,
        symbol: Option<&str>,
        query: AllOrdersQuery,
    ) -> RestResult<Vec<OrderRecord>> {
        self.runtime.block_on(self.inner.all_orders(symbol, query))
    }

    /// Place a one-cancels-the-other order pair
    pub fn new_oco(&self, oco: &OcoOrder) -> RestResult<Value> {
        self.runtime
            .block_on(async { self.inner.trading()?.new_oco(oco).await })
    }

    /// List the account's executed trades
    pub fn account_trade_list(
        &self,
        symbol: Option<&str>,
        query: TradeListQuery,
    ) -> RestResult<Vec<Value>> {
        self.runtime
            .block_on(async { self.inner.trading()?.account_trade_list(symbol, query).await })
    }

    // ========================================================================
    // Account & funding
    // ========================================================================

    /// Get spot account information with normalized balances
    pub fn account_information(&self) -> RestResult<AccountInfo> {
        self.runtime
            .block_on(async { self.inner.account()?.account_information().await })
    }

    /// Get normalized account balances
    pub fn account_balance(&self) -> RestResult<BalanceSheet> {
        self.runtime.block_on(self.inner.account_balance())
    }

    /// Get account information for a single asset
    pub fn account_asset_information(&self, asset: &str) -> RestResult<Value> {
        self.runtime
            .block_on(async { self.inner.account()?.account_asset_information(asset).await })
    }

    /// Request a withdrawal
    pub fn withdraw(
        &self,
        asset: &str,
        address: &str,
        amount: Decimal,
        options: WithdrawOptions,
    ) -> RestResult<Value> {
        self.runtime.block_on(async {
            self.inner
                .funding()?
                .withdraw(asset, address, amount, options)
                .await
        })
    }

    /// List past withdrawals
    pub fn withdraw_history(&self, query: HistoryQuery) -> RestResult<Value> {
        self.runtime
            .block_on(async { self.inner.funding()?.withdraw_history(query).await })
    }

    /// List past deposits
    pub fn deposit_history(&self, query: HistoryQuery) -> RestResult<Value> {
        self.runtime
            .block_on(async { self.inner.funding()?.deposit_history(query).await })
    }

    /// Get the deposit address for an asset on a network
    pub fn deposit_address(&self, asset: &str, network: &str) -> RestResult<Value> {
        self.runtime
            .block_on(async { self.inner.funding()?.deposit_address(asset, network).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;

    #[test]
    fn test_blocking_client_construction() {
        let client = BlockingClient::new().unwrap();
        assert!(!client.has_credentials());
        assert!(client.markets().is_none());
    }

    #[test]
    fn test_private_calls_require_credentials() {
        let client = BlockingClient::new().unwrap();
        assert!(matches!(
            client.account_balance(),
            Err(RestError::AuthRequired)
        ));
        assert!(matches!(
            client.cancel_order("1"),
            Err(RestError::AuthRequired)
        ));
    }
}
