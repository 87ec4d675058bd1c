use tracing::{info, warn};

use super::OrderDispatcher;
use crate::domain::{OcoRequest, OcoResult};
use crate::error::Result;

/// Simulated OCO: a take-profit LIMIT and a STOP_LIMIT, both on the closing
/// side of a position.
///
/// The two legs are NOT linked on the exchange: filling one does not cancel
/// the other. Consumers needing true one-cancels-other semantics must watch
/// the order stream and cancel the sibling themselves.
pub struct OcoStrategy {
    dispatcher: OrderDispatcher,
}

impl OcoStrategy {
    pub fn new(dispatcher: OrderDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Place both exit legs sequentially.
    ///
    /// Validation failures abort before any network call. After that, the
    /// stop leg is attempted even when the take-profit leg failed; the result
    /// carries both outcomes so the caller can see exactly which legs stand.
    pub async fn place(&self, request: &OcoRequest) -> Result<OcoResult> {
        request.validate()?;

        info!(
            symbol = %request.symbol,
            close_side = %request.close_side(),
            quantity = %request.quantity,
            take_profit = %request.take_profit_price,
            stop_trigger = %request.stop_trigger_price,
            stop_limit = %request.stop_limit_price,
            "placing simulated OCO pair"
        );

        let take_profit = self.dispatcher.dispatch(&request.take_profit_leg()).await;
        let stop_limit = self.dispatcher.dispatch(&request.stop_leg()).await;

        let result = OcoResult {
            take_profit,
            stop_limit,
        };

        if !result.fully_placed() {
            warn!(
                take_profit_ok = result.take_profit.success,
                stop_limit_ok = result.stop_limit.success,
                "OCO pair placed partially"
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderSide, OrderType};
    use crate::error::GambitError;
    use crate::exchange::testing::ScriptedExchange;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn request() -> OcoRequest {
        OcoRequest {
            symbol: "BTCUSDT".to_string(),
            open_side: OrderSide::Buy,
            quantity: dec!(0.01),
            take_profit_price: dec!(35000),
            stop_trigger_price: dec!(30000),
            stop_limit_price: dec!(29900),
        }
    }

    fn strategy(exchange: Arc<ScriptedExchange>) -> OcoStrategy {
        OcoStrategy::new(OrderDispatcher::new(exchange))
    }

    #[tokio::test]
    async fn test_both_legs_dispatched_in_order() {
        let exchange = Arc::new(ScriptedExchange::new());
        let result = strategy(exchange.clone()).place(&request()).await.unwrap();

        assert!(result.fully_placed());

        let sent = exchange.recorded();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].order_type, OrderType::Limit);
        assert_eq!(sent[0].side, OrderSide::Sell);
        assert_eq!(sent[0].price, Some(dec!(35000)));
        assert_eq!(sent[1].order_type, OrderType::StopLimit);
        assert_eq!(sent[1].side, OrderSide::Sell);
        assert_eq!(sent[1].stop_price, Some(dec!(30000)));
        assert_eq!(sent[1].price, Some(dec!(29900)));
    }

    #[tokio::test]
    async fn test_stop_leg_attempted_after_take_profit_failure() {
        let exchange = Arc::new(ScriptedExchange::failing_on(&[1]));
        let result = strategy(exchange.clone()).place(&request()).await.unwrap();

        assert!(!result.take_profit.success);
        assert!(result.stop_limit.success);
        assert_eq!(exchange.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_failure_aborts_before_dispatch() {
        let exchange = Arc::new(ScriptedExchange::new());
        let mut bad = request();
        bad.take_profit_price = dec!(0);

        let err = strategy(exchange.clone()).place(&bad).await.unwrap_err();
        assert!(matches!(err, GambitError::Validation(_)));
        assert!(exchange.recorded().is_empty());
    }
}
