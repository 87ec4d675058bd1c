use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{GambitError, Result};

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// The side that closes a position opened on this side.
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    StopLimit,
}

impl OrderType {
    /// Wire name on the USDT-M futures order endpoint. The futures API calls
    /// a stop-limit order `STOP`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopLimit => "STOP",
        }
    }

    /// Whether this type requires a limit price.
    pub fn requires_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }

    /// Whether this type requires a stop trigger price.
    pub fn requires_stop_price(&self) -> bool {
        matches!(self, OrderType::StopLimit)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// Time in force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good Till Cancelled
    GTC,
    /// Immediate Or Cancel
    IOC,
    /// Fill Or Kill
    FOK,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::GTC => "GTC",
            TimeInForce::IOC => "IOC",
            TimeInForce::FOK => "FOK",
        }
    }
}

impl Default for TimeInForce {
    fn default() -> Self {
        TimeInForce::GTC
    }
}

/// A fully specified order, ready for submission.
///
/// Build these through [`OrderSpec::market`], [`OrderSpec::limit`] or
/// [`OrderSpec::stop_limit`] so the price fields always match the order type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSpec {
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: TimeInForce,
}

impl OrderSpec {
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal) -> Self {
        Self {
            client_order_id: Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: TimeInForce::GTC,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            client_order_id: Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            stop_price: None,
            time_in_force: TimeInForce::GTC,
        }
    }

    pub fn stop_limit(
        symbol: impl Into<String>,
        side: OrderSide,
        quantity: Decimal,
        stop_price: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            client_order_id: Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            order_type: OrderType::StopLimit,
            quantity,
            price: Some(price),
            stop_price: Some(stop_price),
            time_in_force: TimeInForce::GTC,
        }
    }

    /// Check the structural invariants: positive quantity and prices, and
    /// price fields present exactly when the order type requires them.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() {
            return Err(GambitError::Validation("symbol cannot be empty".to_string()));
        }

        if self.quantity <= Decimal::ZERO {
            return Err(GambitError::Validation(format!(
                "quantity must be > 0: {}",
                self.quantity
            )));
        }

        match (self.order_type.requires_price(), self.price) {
            (true, None) => {
                return Err(GambitError::Validation(format!(
                    "{} order requires a price",
                    self.order_type
                )));
            }
            (false, Some(_)) => {
                return Err(GambitError::Validation(format!(
                    "{} order must not carry a price",
                    self.order_type
                )));
            }
            (true, Some(price)) if price <= Decimal::ZERO => {
                return Err(GambitError::Validation(format!(
                    "price must be > 0: {}",
                    price
                )));
            }
            _ => {}
        }

        match (self.order_type.requires_stop_price(), self.stop_price) {
            (true, None) => {
                return Err(GambitError::Validation(format!(
                    "{} order requires a stop price",
                    self.order_type
                )));
            }
            (false, Some(_)) => {
                return Err(GambitError::Validation(format!(
                    "{} order must not carry a stop price",
                    self.order_type
                )));
            }
            (true, Some(stop)) if stop <= Decimal::ZERO => {
                return Err(GambitError::Validation(format!(
                    "stop price must be > 0: {}",
                    stop
                )));
            }
            _ => {}
        }

        Ok(())
    }
}

/// Outcome of a single order submission.
///
/// Adapter failures are captured here rather than propagated, so multi-step
/// strategies can keep going after a failed leg or slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub request: OrderSpec,
    pub success: bool,
    /// Raw exchange acknowledgment, opaque to the core.
    pub response: Option<Value>,
    pub error: Option<String>,
}

impl OrderResult {
    pub fn ok(request: OrderSpec, response: Value) -> Self {
        Self {
            request,
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(request: OrderSpec, error: impl Into<String>) -> Self {
        Self {
            request,
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}
