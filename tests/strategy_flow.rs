//! End-to-end strategy flows over a scripted exchange stub.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::watch;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use gambit::error::{GambitError, Result};
use gambit::{
    AssetBalance, ExchangeClient, OcoRequest, OcoStrategy, OrderDispatcher, OrderSide, OrderSpec,
    OrderType, TwapPolicy, TwapRequest, TwapStrategy,
};

/// Scripted exchange: records every order, fails the given call numbers
/// (1-based), accepts everything else.
struct ScriptedExchange {
    fail_calls: HashSet<usize>,
    calls: Mutex<Vec<OrderSpec>>,
}

impl ScriptedExchange {
    fn new(fail_calls: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_calls: fail_calls.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<OrderSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeClient for ScriptedExchange {
    fn is_testnet(&self) -> bool {
        true
    }

    async fn create_order(&self, spec: &OrderSpec) -> Result<Value> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(spec.clone());
            calls.len()
        };

        if self.fail_calls.contains(&call_number) {
            return Err(GambitError::Exchange(format!(
                "scripted failure on call {}",
                call_number
            )));
        }

        Ok(json!({"orderId": call_number, "status": "NEW"}))
    }

    async fn get_balance(&self) -> Result<Vec<AssetBalance>> {
        Ok(vec![AssetBalance {
            asset: "USDT".to_string(),
            balance: dec!(5000),
            available_balance: None,
        }])
    }
}

#[tokio::test]
async fn market_order_round_trip() {
    let exchange = ScriptedExchange::new(&[]);
    let dispatcher = OrderDispatcher::new(exchange.clone());

    let result = dispatcher
        .place_market_order("BTCUSDT", OrderSide::Buy, dec!(0.001))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.response.unwrap()["orderId"], 1);

    let sent = exchange.recorded();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].symbol, "BTCUSDT");
    assert_eq!(sent[0].order_type, OrderType::Market);
    assert!(sent[0].price.is_none());
    assert!(!sent[0].client_order_id.is_empty());
}

#[tokio::test]
async fn invalid_limit_order_never_reaches_the_exchange() {
    let exchange = ScriptedExchange::new(&[]);
    let dispatcher = OrderDispatcher::new(exchange.clone());

    let err = dispatcher
        .place_limit_order("BTCUSDT", OrderSide::Buy, dec!(0.001), dec!(-5))
        .await
        .unwrap_err();

    assert!(matches!(err, GambitError::Validation(_)));
    assert!(exchange.recorded().is_empty());
}

#[tokio::test]
async fn oco_derives_closing_legs_for_a_long_position() {
    let exchange = ScriptedExchange::new(&[]);
    let strategy = OcoStrategy::new(OrderDispatcher::new(exchange.clone()));

    let result = strategy
        .place(&OcoRequest {
            symbol: "BTCUSDT".to_string(),
            open_side: OrderSide::Buy,
            quantity: dec!(0.01),
            take_profit_price: dec!(35000),
            stop_trigger_price: dec!(30000),
            stop_limit_price: dec!(29900),
        })
        .await
        .unwrap();

    assert!(result.fully_placed());

    let sent = exchange.recorded();
    assert_eq!(sent.len(), 2);

    // Leg 1: SELL LIMIT at the take-profit price.
    assert_eq!(sent[0].side, OrderSide::Sell);
    assert_eq!(sent[0].order_type, OrderType::Limit);
    assert_eq!(sent[0].price, Some(dec!(35000)));
    assert_eq!(sent[0].quantity, dec!(0.01));

    // Leg 2: SELL STOP_LIMIT, trigger 30000, resting at 29900.
    assert_eq!(sent[1].side, OrderSide::Sell);
    assert_eq!(sent[1].order_type, OrderType::StopLimit);
    assert_eq!(sent[1].stop_price, Some(dec!(30000)));
    assert_eq!(sent[1].price, Some(dec!(29900)));
    assert_eq!(sent[1].quantity, dec!(0.01));
}

#[tokio::test]
async fn oco_attempts_stop_leg_when_take_profit_fails() {
    let exchange = ScriptedExchange::new(&[1]);
    let strategy = OcoStrategy::new(OrderDispatcher::new(exchange.clone()));

    let result = strategy
        .place(&OcoRequest {
            symbol: "BTCUSDT".to_string(),
            open_side: OrderSide::Sell,
            quantity: dec!(0.5),
            take_profit_price: dec!(1500),
            stop_trigger_price: dec!(2000),
            stop_limit_price: dec!(2010),
        })
        .await
        .unwrap();

    assert!(!result.take_profit.success);
    assert!(result.take_profit.error.is_some());
    assert!(result.stop_limit.success);

    // Both legs reached the exchange, closing side BUY for a short position.
    let sent = exchange.recorded();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].side, OrderSide::Buy);
    assert_eq!(sent[1].side, OrderSide::Buy);
}

#[tokio::test]
async fn twap_splits_into_equal_market_slices() {
    let exchange = ScriptedExchange::new(&[]);
    let strategy = TwapStrategy::new(OrderDispatcher::new(exchange.clone()));

    let result = strategy
        .place(&TwapRequest {
            symbol: "ETHUSDT".to_string(),
            side: OrderSide::Sell,
            total_quantity: dec!(1.0),
            slice_count: 4,
            interval_seconds: 0,
        })
        .await
        .unwrap();

    assert_eq!(result.slices.len(), 4);
    assert_eq!(result.slice_quantity, dec!(0.25));
    assert_eq!(
        result.slice_quantity * Decimal::from(4u32),
        dec!(1.0)
    );

    for (i, slice) in result.slices.iter().enumerate() {
        assert!(slice.success);
        // Results come back in dispatch order.
        assert_eq!(slice.response.as_ref().unwrap()["orderId"], i as u64 + 1);
    }

    for sent in exchange.recorded() {
        assert_eq!(sent.order_type, OrderType::Market);
        assert_eq!(sent.side, OrderSide::Sell);
        assert_eq!(sent.quantity, dec!(0.25));
    }
}

#[tokio::test]
async fn twap_reports_every_slice_even_when_some_fail() {
    let exchange = ScriptedExchange::new(&[2, 4]);
    let strategy = TwapStrategy::new(OrderDispatcher::new(exchange.clone()));

    let result = strategy
        .place(&TwapRequest {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_quantity: dec!(0.01),
            slice_count: 5,
            interval_seconds: 0,
        })
        .await
        .unwrap();

    assert_eq!(result.slices.len(), 5);
    assert_eq!(result.slice_quantity, dec!(0.002));
    assert_eq!(result.placed_count(), 3);
    assert_eq!(result.failed_count(), 2);
    assert!(!result.slices[1].success);
    assert!(!result.slices[3].success);
    assert_eq!(exchange.recorded().len(), 5);
}

#[tokio::test]
async fn twap_failure_policy_is_off_by_default() {
    // A systemic outage still yields one result per requested slice.
    let exchange = ScriptedExchange::new(&[1, 2, 3]);
    let strategy = TwapStrategy::new(OrderDispatcher::new(exchange.clone()));

    let result = strategy
        .place(&TwapRequest {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_quantity: dec!(0.3),
            slice_count: 3,
            interval_seconds: 0,
        })
        .await
        .unwrap();

    assert_eq!(result.slices.len(), 3);
    assert_eq!(result.failed_count(), 3);
}

#[tokio::test]
async fn twap_failure_policy_halts_when_enabled() {
    let exchange = ScriptedExchange::new(&[1, 2, 3]);
    let strategy = TwapStrategy::new(OrderDispatcher::new(exchange.clone())).with_policy(
        TwapPolicy {
            max_consecutive_failures: Some(2),
        },
    );

    let result = strategy
        .place(&TwapRequest {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_quantity: dec!(0.3),
            slice_count: 3,
            interval_seconds: 0,
        })
        .await
        .unwrap();

    assert_eq!(result.slices.len(), 2);
    assert_eq!(exchange.recorded().len(), 2);
}

#[tokio::test]
async fn twap_waits_between_slices_but_not_before_the_first() {
    let exchange = ScriptedExchange::new(&[]);
    let strategy = TwapStrategy::new(OrderDispatcher::new(exchange.clone()));

    let start = Instant::now();
    let result = strategy
        .place(&TwapRequest {
            symbol: "BTCUSDT".to_string(),
            side: OrderSide::Buy,
            total_quantity: dec!(0.2),
            slice_count: 2,
            interval_seconds: 1,
        })
        .await
        .unwrap();

    // Two slices, one interval between them.
    assert_eq!(result.slices.len(), 2);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn twap_cancel_during_interval_skips_remaining_slices() {
    let exchange = ScriptedExchange::new(&[]);
    let strategy = TwapStrategy::new(OrderDispatcher::new(exchange.clone()));

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = tx.send(true);
    });

    let start = Instant::now();
    let result = strategy
        .place_with_cancel(
            &TwapRequest {
                symbol: "BTCUSDT".to_string(),
                side: OrderSide::Buy,
                total_quantity: dec!(0.3),
                slice_count: 3,
                interval_seconds: 60,
            },
            Some(rx),
        )
        .await
        .unwrap();

    // The cancel flag cuts the first interval wait short.
    assert_eq!(result.slices.len(), 1);
    assert_eq!(exchange.recorded().len(), 1);
    assert!(start.elapsed() < Duration::from_secs(60));
}

#[tokio::test]
async fn balance_passes_through_the_boundary() {
    let exchange = ScriptedExchange::new(&[]);
    let balances = exchange.get_balance().await.unwrap();

    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].asset, "USDT");
    assert_eq!(balances[0].balance, dec!(5000));
}
