//! Private account endpoints
//!
//! These endpoints require authentication.

use crate::auth::{Params, SecurityType};
use crate::client::{require_data, ClientInner, HttpMethod};
use crate::error::{RestError, RestResult};
use crate::normalize::format_balance;
use crate::types::{AccountInfo, BalanceSheet, Enveloped};
use serde_json::Value;
use tracing::{debug, instrument};

/// Private account endpoints
pub struct AccountEndpoints<'a> {
    client: &'a ClientInner,
}

impl<'a> AccountEndpoints<'a> {
    pub(crate) fn new(client: &'a ClientInner) -> Self {
        Self { client }
    }

    /// Get spot account information with normalized balances
    ///
    /// The per-asset balance list is recomputed into a [`BalanceSheet`] on
    /// every call; the rest of the account payload rides along raw under
    /// `info`.
    #[instrument(skip(self))]
    pub async fn account_information(&self) -> RestResult<AccountInfo> {
        debug!("Fetching spot account information");

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/account/spot",
                SecurityType::Private,
                Params::new(),
            )
            .await?;

        let info = require_data(enveloped.data, "account")?;
        let assets = info
            .get("accountAssets")
            .and_then(Value::as_array)
            .ok_or_else(|| RestError::Parse("account response missing accountAssets".to_string()))?;

        Ok(AccountInfo {
            balances: format_balance(assets)?,
            info,
        })
    }

    /// Get normalized account balances
    #[instrument(skip(self))]
    pub async fn account_balance(&self) -> RestResult<BalanceSheet> {
        Ok(self.account_information().await?.balances)
    }

    /// Get account information for a single asset
    ///
    /// The payload keeps the exchange's raw shape.
    #[instrument(skip(self))]
    pub async fn account_asset_information(&self, asset: &str) -> RestResult<Value> {
        let mut params = Params::new();
        params.insert("asset", asset);

        debug!("Fetching account information for {}", asset);

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/account/spot/asset",
                SecurityType::Private,
                params,
            )
            .await?;

        require_data(enveloped.data, "asset")
    }
}
