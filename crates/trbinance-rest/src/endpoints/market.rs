//! Public market data endpoints
//!
//! These endpoints don't require authentication. Symbols classified as
//! type 1 serve their market data from the secondary host with the compact
//! symbol form and bare (non-enveloped) responses; type 0 symbols use the
//! primary open API. Routing is resolved against the client's session
//! market metadata, loading it on first use.

use crate::auth::{Params, SecurityType};
use crate::client::{require_data, ClientInner, Host, HttpMethod};
use crate::error::{RestError, RestResult};
use crate::normalize::{format_market, format_order_book};
use crate::types::{
    AggTradesQuery, DataList, Enveloped, KlineQuery, MarketInfoQuery, MarketRecord, OrderBook,
    RawOrderBook, ServerTime, SymbolRecord, TradeQuery,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};
use trbinance_types::{symbol as convention, KlineInterval, SymbolType};

/// Default order book depth
const DEFAULT_DEPTH_LIMIT: u32 = 100;

/// Default trade/kline page size
const DEFAULT_PAGE_LIMIT: u32 = 500;

/// Default trading-pairs page size
const DEFAULT_PAIRS_LIMIT: u32 = 1000;

/// Public market data endpoints
pub struct MarketEndpoints<'a> {
    client: &'a ClientInner,
}

impl<'a> MarketEndpoints<'a> {
    pub(crate) fn new(client: &'a ClientInner) -> Self {
        Self { client }
    }

    /// Get the exchange server time
    #[instrument(skip(self))]
    pub async fn server_time(&self) -> RestResult<ServerTime> {
        debug!("Fetching server time");

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/common/time",
                SecurityType::Public,
                Params::new(),
            )
            .await?;

        // The envelope's own timestamp is the server time
        let timestamp = enveloped
            .timestamp
            .ok_or_else(|| RestError::Parse("time response missing timestamp".to_string()))?;

        Ok(ServerTime { timestamp })
    }

    /// Fetch and normalize all symbol metadata, keyed by canonical symbol
    ///
    /// Also (re)populates the client's session markets cache.
    #[instrument(skip(self))]
    pub async fn get_symbols(&self) -> RestResult<HashMap<String, SymbolRecord>> {
        self.client.load_markets().await
    }

    /// List trading pairs with current market data, keyed by canonical
    /// symbol
    #[instrument(skip(self, query))]
    pub async fn market_info(
        &self,
        query: MarketInfoQuery,
    ) -> RestResult<HashMap<String, MarketRecord>> {
        let mut params = Params::new();
        params.insert("limit", query.limit.unwrap_or(DEFAULT_PAIRS_LIMIT));
        params.insert_opt("offset", query.offset);
        params.insert_opt("quoteAsset", query.quote_asset);

        debug!("Fetching trading pairs");

        let enveloped: Enveloped<DataList<Value>> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/market/trading-pairs",
                SecurityType::Public,
                params,
            )
            .await?;

        let list = require_data(enveloped.data, "trading-pairs")?.list;

        let mut records = HashMap::with_capacity(list.len());
        for raw in &list {
            let record = format_market(raw)?;
            records.insert(record.symbol.clone(), record);
        }
        Ok(records)
    }

    /// Get the order book for a canonical symbol
    ///
    /// # Arguments
    /// * `symbol` - Canonical symbol (e.g., "BTC/USDT")
    /// * `limit` - Number of levels per side (default 100; valid: 5, 10,
    ///   20, 50, 100, 500)
    #[instrument(skip(self))]
    pub async fn order_book(&self, symbol: &str, limit: Option<u32>) -> RestResult<OrderBook> {
        let (host, path, wire_symbol) = self.route(symbol, "/market/depth", "/v3/depth").await?;

        let mut params = Params::new();
        params.insert("symbol", wire_symbol);
        params.insert("limit", limit.unwrap_or(DEFAULT_DEPTH_LIMIT));

        debug!("Fetching order book for {}", symbol);

        let raw: RawOrderBook = self
            .client
            .request_bare(HttpMethod::Get, host, path, params)
            .await?;

        Ok(format_order_book(&raw)?)
    }

    /// Get recent trades for a canonical symbol
    ///
    /// Returned entries keep the exchange's raw shape.
    #[instrument(skip(self, query))]
    pub async fn recent_trades(&self, symbol: &str, query: TradeQuery) -> RestResult<Vec<Value>> {
        let (host, path, wire_symbol) = self.route(symbol, "/market/trades", "/v3/trades").await?;

        let mut params = Params::new();
        params.insert("symbol", wire_symbol);
        params.insert("limit", query.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        params.insert_opt("fromId", query.from_id);

        debug!("Fetching recent trades for {}", symbol);

        self.client
            .request_bare(HttpMethod::Get, host, path, params)
            .await
    }

    /// Get aggregated trades for a canonical symbol
    #[instrument(skip(self, query))]
    pub async fn agg_trades(&self, symbol: &str, query: AggTradesQuery) -> RestResult<Vec<Value>> {
        let (host, path, wire_symbol) = self
            .route(symbol, "/market/agg-trades", "/v3/aggTrades")
            .await?;

        let mut params = Params::new();
        params.insert("symbol", wire_symbol);
        params.insert("limit", query.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        params.insert_opt("fromId", query.from_id);
        params.insert_opt("startTime", query.start_time);
        params.insert_opt("endTime", query.end_time);

        debug!("Fetching aggregated trades for {}", symbol);

        self.client
            .request_bare(HttpMethod::Get, host, path, params)
            .await
    }

    /// Get candlestick data for a canonical symbol
    ///
    /// Candles keep the exchange's raw array shape.
    #[instrument(skip(self, query))]
    pub async fn klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        query: KlineQuery,
    ) -> RestResult<Vec<Value>> {
        let (host, path, wire_symbol) = self.route(symbol, "/market/klines", "/v1/klines").await?;

        let mut params = Params::new();
        params.insert("symbol", wire_symbol);
        params.insert("limit", query.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        params.insert("interval", interval);
        params.insert_opt("startTime", query.start_time);
        params.insert_opt("endTime", query.end_time);

        debug!("Fetching {} klines for {}", interval, symbol);

        self.client
            .request_bare(HttpMethod::Get, host, path, params)
            .await
    }

    /// Resolve host, path, and wire symbol form for a market-data call
    async fn route(
        &self,
        canonical: &str,
        main_path: &'static str,
        next_path: &'static str,
    ) -> RestResult<(Host, &'static str, String)> {
        let record = self.client.symbol_record(canonical).await?;
        Ok(match record.symbol_type {
            // The secondary host uses the compact symbol form
            SymbolType::Next => (Host::MarketData, next_path, convention::compact(canonical)),
            SymbolType::Main => (Host::Base, main_path, convention::to_exchange(canonical)),
        })
    }
}
