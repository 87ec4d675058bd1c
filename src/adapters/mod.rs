//! Exchange adapters and their wire-level response types.

mod binance_futures;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use binance_futures::{BinanceFuturesClient, Credentials};

/// One row of the futures wallet balance payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub balance: Decimal,
    #[serde(rename = "availableBalance", default)]
    pub available_balance: Option<Decimal>,
}
