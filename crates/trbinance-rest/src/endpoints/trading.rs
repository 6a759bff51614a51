//! Trading endpoints for order management
//!
//! These endpoints require authentication. Every request builds its
//! parameters in endpoint order, gets a fresh timestamp and signature in
//! the transport, and normalizes the returned order payload before handing
//! it back.

use crate::auth::{Params, SecurityType};
use crate::client::{require_data, ClientInner, HttpMethod};
use crate::error::{RestError, RestResult};
use crate::normalize::format_order;
use crate::types::{
    AllOrdersQuery, CancelOutcome, DataList, Enveloped, NewOrder, OcoOrder, OrderRecord,
    TradeListQuery,
};
use serde_json::Value;
use tracing::{debug, instrument};
use trbinance_types::{symbol as convention, ApiCode};

/// Trading endpoints for order management
pub struct TradingEndpoints<'a> {
    client: &'a ClientInner,
}

impl<'a> TradingEndpoints<'a> {
    pub(crate) fn new(client: &'a ClientInner) -> Self {
        Self { client }
    }

    /// Place a new order
    ///
    /// # Arguments
    /// * `order` - Order request built with the [`NewOrder`] constructors
    ///
    /// # Returns
    /// The normalized order record as acknowledged by the exchange
    #[instrument(skip(self, order), fields(symbol = %order.symbol, side = %order.side, order_type = %order.order_type))]
    pub async fn create_order(&self, order: &NewOrder) -> RestResult<OrderRecord> {
        if !order.order_type.is_placeable() {
            return Err(RestError::InvalidParameter(format!(
                "Order type {} cannot be placed; use LIMIT, MARKET, STOP_LOSS_LIMIT or TAKE_PROFIT_LIMIT",
                order.order_type
            )));
        }

        let mut params = Params::new();
        params.insert("symbol", convention::to_exchange(&order.symbol));
        params.insert("side", order.side.code());
        params.insert("type", order.order_type.code());
        params.insert_opt("quantity", order.quantity);
        params.insert_opt("quoteOrderQty", order.quote_order_qty);
        params.insert_opt("price", order.price);
        params.insert_opt("stopPrice", order.stop_price);
        params.insert_opt("icebergQty", order.iceberg_qty);
        params.insert_opt("clientId", order.client_id.clone());

        debug!(
            "Placing {} {} order for {}",
            order.side, order.order_type, order.symbol
        );

        let enveloped = self
            .client
            .request_enveloped(HttpMethod::Post, "/orders", SecurityType::Private, params)
            .await?;

        order_record(enveloped)
    }

    /// Query an order by id
    #[instrument(skip(self))]
    pub async fn query_order(&self, order_id: &str) -> RestResult<OrderRecord> {
        let mut params = Params::new();
        params.insert("orderId", order_id);

        debug!("Querying order {}", order_id);

        let enveloped = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/orders/detail",
                SecurityType::Private,
                params,
            )
            .await?;

        order_record(enveloped)
    }

    /// Cancel an order by id
    ///
    /// Cancelling an order that is already cancelled is reported by the
    /// exchange as an error; that single code is translated into
    /// [`CancelOutcome::AlreadyCanceled`] rather than raised. Every other
    /// non-zero code is still an error.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> RestResult<CancelOutcome> {
        let mut params = Params::new();
        params.insert("orderId", order_id);

        debug!("Cancelling order {}", order_id);

        let result = self
            .client
            .request_enveloped(
                HttpMethod::Post,
                "/orders/cancel",
                SecurityType::Private,
                params,
            )
            .await;

        match result {
            Ok(enveloped) => Ok(CancelOutcome::Canceled(order_record(enveloped)?)),
            Err(RestError::Api { code, .. }) if ApiCode(code).is_already_canceled() => {
                debug!("Order {} was already cancelled", order_id);
                Ok(CancelOutcome::AlreadyCanceled)
            }
            Err(err) => Err(err),
        }
    }

    /// List historical orders, optionally restricted to one canonical
    /// symbol
    #[instrument(skip(self, query))]
    pub async fn all_orders(
        &self,
        symbol: Option<&str>,
        query: AllOrdersQuery,
    ) -> RestResult<Vec<OrderRecord>> {
        let mut params = Params::new();
        params.insert_opt("symbol", symbol.map(convention::to_exchange));
        params.insert_opt("orderId", query.order_id);
        params.insert_opt("startTime", query.start_time);
        params.insert_opt("endTime", query.end_time);
        params.insert_opt("limit", query.limit);
        params.insert_opt("direct", query.direct);

        debug!("Listing orders");

        let enveloped: Enveloped<DataList<Value>> = self
            .client
            .request_enveloped(HttpMethod::Get, "/orders", SecurityType::Private, params)
            .await?;

        let timestamp = enveloped.timestamp;
        require_data(enveloped.data, "orders")?
            .list
            .iter()
            .map(|raw| {
                let mut record = format_order(raw)?;
                record.transact_time = timestamp;
                Ok(record)
            })
            .collect()
    }

    /// Place a one-cancels-the-other order pair
    ///
    /// The exchange's OCO payload has no stable documented shape, so it is
    /// returned raw.
    #[instrument(skip(self, oco), fields(symbol = %oco.symbol, side = %oco.side))]
    pub async fn new_oco(&self, oco: &OcoOrder) -> RestResult<Value> {
        let mut params = Params::new();
        params.insert("symbol", convention::to_exchange(&oco.symbol));
        params.insert("side", oco.side.code());
        params.insert("quantity", oco.quantity);
        params.insert("price", oco.price);
        params.insert("stopPrice", oco.stop_price);
        params.insert("stopLimitPrice", oco.stop_limit_price);
        params.insert_opt("listClientId", oco.list_client_id.clone());

        debug!("Placing OCO pair for {}", oco.symbol);

        let enveloped: Enveloped<Value> = self
            .client
            .request_enveloped(
                HttpMethod::Post,
                "/orders/oco",
                SecurityType::Private,
                params,
            )
            .await?;

        require_data(enveloped.data, "oco")
    }

    /// List the account's executed trades, optionally restricted to one
    /// canonical symbol
    ///
    /// Entries keep the exchange's raw shape.
    #[instrument(skip(self, query))]
    pub async fn account_trade_list(
        &self,
        symbol: Option<&str>,
        query: TradeListQuery,
    ) -> RestResult<Vec<Value>> {
        let mut params = Params::new();
        params.insert_opt("symbol", symbol.map(convention::to_exchange));
        params.insert_opt("fromId", query.from_id);
        params.insert_opt("startTime", query.start_time);
        params.insert_opt("endTime", query.end_time);
        params.insert_opt("limit", query.limit);
        params.insert_opt("direct", query.direct);

        debug!("Listing account trades");

        let enveloped: Enveloped<DataList<Value>> = self
            .client
            .request_enveloped(
                HttpMethod::Get,
                "/orders/trades",
                SecurityType::Private,
                params,
            )
            .await?;

        Ok(require_data(enveloped.data, "trades")?.list)
    }
}

/// Normalize an enveloped order payload, stamping the response timestamp
fn order_record(enveloped: Enveloped<Value>) -> RestResult<OrderRecord> {
    let timestamp = enveloped.timestamp;
    let raw = require_data(enveloped.data, "order")?;
    let mut record = format_order(&raw)?;
    record.transact_time = timestamp;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_record_stamps_envelope_timestamp() {
        let enveloped = Enveloped {
            data: Some(json!({
                "orderId": "42",
                "symbol": "BTC_USDT",
                "side": 1,
                "type": 2,
                "status": 2,
                "price": "0",
                "origQty": "0.5",
                "origQuoteQty": "0",
                "executedPrice": "27000.5",
                "executedQty": "0.5",
                "executedQuoteQty": "13500.25",
                "stopPrice": "0",
                "icebergQty": "0"
            })),
            timestamp: Some(1681279200000),
        };

        let record = order_record(enveloped).unwrap();
        assert_eq!(record.order_id, "42");
        assert_eq!(record.transact_time, Some(1681279200000));
        assert_eq!(record.create_time, None);
        assert_eq!(record.executed_price, 27000.5);
    }

    #[test]
    fn test_order_record_requires_data() {
        let enveloped: Enveloped<Value> = Enveloped {
            data: None,
            timestamp: Some(1681279200000),
        };
        assert!(matches!(
            order_record(enveloped),
            Err(RestError::Parse(_))
        ));
    }
}
