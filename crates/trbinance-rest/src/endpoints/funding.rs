//! Funding endpoints for deposits and withdrawals
//!
//! These endpoints require authentication. Payloads keep the exchange's
//! raw shape; there is no canonical record for funding operations.

use crate::auth::{Params, SecurityType};
use crate::client::{require_data, ClientInner, HttpMethod};
use crate::error::RestResult;
use crate::types::{Enveloped, HistoryQuery, WithdrawOptions};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};

/// Funding endpoints for deposits and withdrawals
pub struct FundingEndpoints<'a> {
    client: &'a ClientInner,
}

impl<'a> FundingEndpoints<'a> {
    pub(crate) fn new(client: &'a ClientInner) -> Self {
        Self { client }
    }

    /// Request a withdrawal
    ///
    /// # Arguments
    /// * `asset` - Asset to withdraw
    /// * `address` - Destination address
    /// * `amount` - Amount to withdraw
    /// * `options` - Optional network, memo/tag, and client id
    #[instrument(skip(self, options))]
    pub async fn withdraw(
        &self,
        asset: &str,
        address: &str,
        amount: Decimal,
        options: WithdrawOptions,
    ) -> RestResult<Value> {
        let mut params = Params::new();
        params.insert("asset", asset);
        params.insert("address", address);
        params.insert("amount", amount);
        params.insert_opt("network", options.network);
        params.insert_opt("addressTag", options.address_tag);
        params.insert_opt("clientId", options.client_id);

        debug!("Requesting withdrawal of {} {}", amount, asset);

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(HttpMethod::Post, "/withdraws", SecurityType::Private, params)
            .await?;

        require_data(enveloped.data, "withdraw")
    }

    /// List past withdrawals
    #[instrument(skip(self, query))]
    pub async fn withdraw_history(&self, query: HistoryQuery) -> RestResult<Value> {
        debug!("Fetching withdraw history");

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/withdraws",
                SecurityType::Private,
                history_params(query),
            )
            .await?;

        require_data(enveloped.data, "withdraws")
    }

    /// List past deposits
    #[instrument(skip(self, query))]
    pub async fn deposit_history(&self, query: HistoryQuery) -> RestResult<Value> {
        debug!("Fetching deposit history");

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/deposits",
                SecurityType::Private,
                history_params(query),
            )
            .await?;

        require_data(enveloped.data, "deposits")
    }

    /// Get the deposit address for an asset on a network
    #[instrument(skip(self))]
    pub async fn deposit_address(&self, asset: &str, network: &str) -> RestResult<Value> {
        let mut params = Params::new();
        params.insert("asset", asset);
        params.insert("network", network);

        debug!("Fetching {} deposit address on {}", asset, network);

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/deposits/address",
                SecurityType::Private,
                params,
            )
            .await?;

        require_data(enveloped.data, "deposit address")
    }
}

fn history_params(query: HistoryQuery) -> Params {
    let mut params = Params::new();
    params.insert_opt("asset", query.asset);
    params.insert_opt("startTime", query.start_time);
    params.insert_opt("endTime", query.end_time);
    params.insert_opt("offset", query.offset);
    params.insert_opt("limit", query.limit);
    params
}
