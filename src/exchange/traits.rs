use async_trait::async_trait;
use serde_json::Value;

use crate::adapters::AssetBalance;
use crate::domain::OrderSpec;
use crate::error::Result;

/// Capability boundary to the exchange.
///
/// Implementations own credentials and the connection target. One network
/// attempt per call: no retries, no backoff; callers decide retry policy.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Whether this client is bound to the testnet environment.
    fn is_testnet(&self) -> bool;

    /// Submit a single order and return the exchange's raw acknowledgment.
    async fn create_order(&self, spec: &OrderSpec) -> Result<Value>;

    /// Fetch per-asset futures wallet balances.
    async fn get_balance(&self) -> Result<Vec<AssetBalance>>;
}
