use std::sync::Arc;

use tracing::{info, warn};

use super::ExchangeClient;
use crate::adapters::BinanceFuturesClient;
use crate::config::ExchangeConfig;
use crate::error::Result;

/// Build the shared exchange client from configuration plus environment
/// credentials. Fails fast when credentials are missing or empty.
pub fn build_client(config: &ExchangeConfig) -> Result<Arc<dyn ExchangeClient>> {
    let client = BinanceFuturesClient::from_env(config.testnet)?
        .with_recv_window(config.recv_window_ms);

    if config.testnet {
        info!(base_url = client.base_url(), "exchange client initialized (testnet)");
    } else {
        warn!(
            base_url = client.base_url(),
            "exchange client initialized against the LIVE endpoint"
        );
    }

    Ok(Arc::new(client))
}
