//! Binance USDT-M futures REST adapter (native Rust, no external SDK).
//!
//! Signed-request flow: every private call carries a millisecond timestamp
//! and `recvWindow`, and an HMAC-SHA256 signature (hex) over the full query
//! string, authenticated with the `X-MBX-APIKEY` header.

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use async_trait::async_trait;

use super::AssetBalance;
use crate::domain::OrderSpec;
use crate::error::{GambitError, Result};
use crate::exchange::ExchangeClient;

const FUTURES_API_BASE: &str = "https://fapi.binance.com";
const FUTURES_TESTNET_API_BASE: &str = "https://testnet.binancefuture.com";

const ORDER_PATH: &str = "/fapi/v1/order";
const BALANCE_PATH: &str = "/fapi/v2/balance";

const DEFAULT_RECV_WINDOW_MS: u64 = 5000;

type HmacSha256 = Hmac<Sha256>;

/// API credential pair. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() || api_secret.trim().is_empty() {
            return Err(GambitError::Credentials(
                "EXCHANGE_API_KEY and EXCHANGE_API_SECRET must be non-empty".to_string(),
            ));
        }

        Ok(Self { api_key, api_secret })
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("EXCHANGE_API_KEY")
            .map_err(|_| GambitError::Credentials("EXCHANGE_API_KEY is not set".to_string()))?;
        let api_secret = std::env::var("EXCHANGE_API_SECRET")
            .map_err(|_| GambitError::Credentials("EXCHANGE_API_SECRET is not set".to_string()))?;

        Self::new(api_key, api_secret)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// REST client for the USDT-M futures endpoints.
#[derive(Debug, Clone)]
pub struct BinanceFuturesClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    testnet: bool,
    recv_window_ms: u64,
}

impl BinanceFuturesClient {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        testnet: bool,
    ) -> Result<Self> {
        Self::with_credentials(Credentials::new(api_key, api_secret)?, testnet)
    }

    /// Build a client from `EXCHANGE_API_KEY` / `EXCHANGE_API_SECRET`.
    pub fn from_env(testnet: bool) -> Result<Self> {
        Self::with_credentials(Credentials::from_env()?, testnet)
    }

    fn with_credentials(credentials: Credentials, testnet: bool) -> Result<Self> {
        let base_url = if testnet {
            FUTURES_TESTNET_API_BASE
        } else {
            FUTURES_API_BASE
        }
        .to_string();

        let http = Client::builder()
            .user_agent("gambit-futures-adapter/0.1")
            .build()
            .map_err(|e| GambitError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            credentials,
            testnet,
            recv_window_ms: DEFAULT_RECV_WINDOW_MS,
        })
    }

    pub fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// HMAC-SHA256 over the query string, hex-encoded.
    fn sign(&self, query: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| GambitError::Signature(format!("HMAC init failed: {}", e)))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Encode parameters, append timestamp/recvWindow, and sign the result.
    fn signed_query(&self, params: &[(&str, String)]) -> Result<String> {
        let mut query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!(
            "recvWindow={}&timestamp={}",
            self.recv_window_ms,
            Utc::now().timestamp_millis()
        ));

        let signature = self.sign(&query)?;
        Ok(format!("{}&signature={}", query, signature))
    }

    /// Map an [`OrderSpec`] to the order endpoint's wire parameters.
    /// `price`, `stopPrice` and `timeInForce` are included only when the
    /// order type requires them.
    fn order_params(spec: &OrderSpec) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", spec.symbol.clone()),
            ("side", spec.side.as_str().to_string()),
            ("type", spec.order_type.wire_name().to_string()),
            ("quantity", spec.quantity.to_string()),
        ];

        if let Some(stop_price) = spec.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if let Some(price) = spec.price {
            params.push(("price", price.to_string()));
        }
        if spec.order_type.requires_price() {
            params.push(("timeInForce", spec.time_in_force.as_str().to_string()));
        }

        params.push(("newClientOrderId", spec.client_order_id.clone()));
        params
    }

    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value> {
        let query = self.signed_query(params)?;
        let url = format!("{}{}?{}", self.base_url, path, query);

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-MBX-APIKEY",
            HeaderValue::from_str(&self.credentials.api_key)
                .map_err(|e| GambitError::Auth(format!("invalid API key header: {}", e)))?,
        );

        let resp = self
            .http
            .request(method.clone(), &url)
            .headers(headers)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GambitError::RateLimited(format!(
                "{} {} rate limited",
                method, path
            )));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GambitError::Auth(format!(
                "{} {} rejected: status={} body={}",
                method, path, status, text
            )));
        }

        if !status.is_success() {
            return Err(GambitError::Exchange(format!(
                "{} {} failed: status={} {}",
                method,
                path,
                status,
                Self::exchange_message(&text)
            )));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| GambitError::Internal(format!("invalid JSON response: {}", e)))
    }

    /// Pull `msg`/`code` out of an error body, falling back to the raw text.
    fn exchange_message(body: &str) -> String {
        match serde_json::from_str::<Value>(body) {
            Ok(v) => {
                let code = v.get("code").and_then(Value::as_i64);
                let msg = v.get("msg").and_then(Value::as_str);
                match (code, msg) {
                    (Some(code), Some(msg)) => format!("code={} msg={}", code, msg),
                    (None, Some(msg)) => msg.to_string(),
                    _ => body.to_string(),
                }
            }
            Err(_) => body.to_string(),
        }
    }
}

#[async_trait]
impl ExchangeClient for BinanceFuturesClient {
    fn is_testnet(&self) -> bool {
        self.testnet
    }

    async fn create_order(&self, spec: &OrderSpec) -> Result<Value> {
        let params = Self::order_params(spec);
        self.send_signed(Method::POST, ORDER_PATH, &params).await
    }

    async fn get_balance(&self) -> Result<Vec<AssetBalance>> {
        let raw = self.send_signed(Method::GET, BALANCE_PATH, &[]).await?;
        serde_json::from_value(raw)
            .map_err(|e| GambitError::Internal(format!("invalid balance payload: {}", e)))
    }
}
