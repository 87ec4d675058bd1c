use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::domain::{OrderResult, OrderSide, OrderSpec};
use crate::error::Result;
use crate::exchange::ExchangeClient;

/// Submits validated orders through the exchange boundary and normalizes
/// every outcome into an [`OrderResult`].
#[derive(Clone)]
pub struct OrderDispatcher {
    client: Arc<dyn ExchangeClient>,
}

impl OrderDispatcher {
    pub fn new(client: Arc<dyn ExchangeClient>) -> Self {
        Self { client }
    }

    /// Submit one order. The spec must already be validated.
    ///
    /// Exchange failures are captured into the result, never propagated, so
    /// batch strategies can continue past a bad leg or slice.
    pub async fn dispatch(&self, spec: &OrderSpec) -> OrderResult {
        info!(
            symbol = %spec.symbol,
            side = %spec.side,
            order_type = %spec.order_type,
            quantity = %spec.quantity,
            price = ?spec.price,
            stop_price = ?spec.stop_price,
            client_order_id = %spec.client_order_id,
            "submitting order"
        );

        match self.client.create_order(spec).await {
            Ok(response) => {
                info!(client_order_id = %spec.client_order_id, "order accepted");
                OrderResult::ok(spec.clone(), response)
            }
            Err(e) => {
                error!(client_order_id = %spec.client_order_id, error = %e, "order failed");
                OrderResult::failed(spec.clone(), e.to_string())
            }
        }
    }

    /// Place a single MARKET order.
    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
    ) -> Result<OrderResult> {
        let spec = OrderSpec::market(symbol, side, quantity);
        spec.validate()?;
        Ok(self.dispatch(&spec).await)
    }

    /// Place a single LIMIT order (GTC).
    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderResult> {
        let spec = OrderSpec::limit(symbol, side, quantity, price);
        spec.validate()?;
        Ok(self.dispatch(&spec).await)
    }

    /// Place a single STOP_LIMIT order (GTC).
    pub async fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
        price: Decimal,
    ) -> Result<OrderResult> {
        let spec = OrderSpec::stop_limit(symbol, side, quantity, stop_price, price);
        spec.validate()?;
        Ok(self.dispatch(&spec).await)
    }
}
