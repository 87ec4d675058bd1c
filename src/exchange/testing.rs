//! Scripted in-memory exchange for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use super::ExchangeClient;
use crate::adapters::AssetBalance;
use crate::domain::OrderSpec;
use crate::error::{GambitError, Result};

/// Records every order it receives and fails the scripted call numbers
/// (1-based) with an exchange error.
pub struct ScriptedExchange {
    fail_calls: HashSet<usize>,
    calls: Mutex<Vec<OrderSpec>>,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::failing_on(&[])
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<OrderSpec> {
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

        Ok(json!({
            "orderId": call_number,
            "clientOrderId": spec.client_order_id,
            "status": "NEW",
        }))
    }

    async fn get_balance(&self) -> Result<Vec<AssetBalance>> {
        Ok(vec![AssetBalance {
            asset: "USDT".to_string(),
            balance: dec!(1000),
            available_balance: Some(dec!(1000)),
        }])
    }
}
