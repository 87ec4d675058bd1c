use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderResult, OrderSide, OrderSpec};
use crate::error::{GambitError, Result};

/// Parameters for a simulated OCO exit pair.
///
/// `open_side` is the side the position was opened on; both legs are placed
/// on the opposite (closing) side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcoRequest {
    pub symbol: String,
    pub open_side: OrderSide,
    pub quantity: Decimal,
    pub take_profit_price: Decimal,
    pub stop_trigger_price: Decimal,
    pub stop_limit_price: Decimal,
}

impl OcoRequest {
    /// The side that closes a position opened on `open_side`.
    pub fn close_side(&self) -> OrderSide {
        self.open_side.opposite()
    }

    /// Take-profit leg: a LIMIT order at `take_profit_price`.
    pub fn take_profit_leg(&self) -> OrderSpec {
        OrderSpec::limit(
            self.symbol.clone(),
            self.close_side(),
            self.quantity,
            self.take_profit_price,
        )
    }

    /// Stop leg: a STOP_LIMIT order triggering at `stop_trigger_price` and
    /// resting at `stop_limit_price`.
    pub fn stop_leg(&self) -> OrderSpec {
        OrderSpec::stop_limit(
            self.symbol.clone(),
            self.close_side(),
            self.quantity,
            self.stop_trigger_price,
            self.stop_limit_price,
        )
    }

    pub fn validate(&self) -> Result<()> {
        self.take_profit_leg().validate()?;
        self.stop_leg().validate()
    }
}

/// Results of both OCO legs.
///
/// There is no invariant linking the two: either, both, or neither leg may
/// have been accepted by the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcoResult {
    pub take_profit: OrderResult,
    pub stop_limit: OrderResult,
}

impl OcoResult {
    /// Both legs were accepted.
    pub fn fully_placed(&self) -> bool {
        self.take_profit.success && self.stop_limit.success
    }
}

/// Parameters for a TWAP execution: `total_quantity` split into
/// `slice_count` equal MARKET orders, `interval_seconds` apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwapRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub total_quantity: Decimal,
    pub slice_count: u32,
    pub interval_seconds: u64,
}

impl TwapRequest {
    /// Quantity of each slice. Plain division: any rounding drift is NOT
    /// absorbed by the last slice.
    pub fn slice_quantity(&self) -> Decimal {
        self.total_quantity / Decimal::from(self.slice_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.slice_count == 0 {
            return Err(GambitError::Validation(
                "slice count must be >= 1".to_string(),
            ));
        }
        // Validate one slice to cover symbol and quantity constraints.
        OrderSpec::market(self.symbol.clone(), self.side, self.slice_quantity()).validate()
    }
}

/// Ordered outcomes of every TWAP slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwapResult {
    pub slices: Vec<OrderResult>,
    pub slice_quantity: Decimal,
}

impl TwapResult {
    pub fn placed_count(&self) -> usize {
        self.slices.iter().filter(|s| s.success).count()
    }

    pub fn failed_count(&self) -> usize {
        self.slices.len() - self.placed_count()
    }
}
