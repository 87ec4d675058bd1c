pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod strategy;
pub mod validation;

pub use adapters::{AssetBalance, BinanceFuturesClient};
pub use config::AppConfig;
pub use domain::{
    OcoRequest, OcoResult, OrderResult, OrderSide, OrderSpec, OrderType, TimeInForce, TwapRequest,
    TwapResult,
};
pub use error::{GambitError, Result};
pub use exchange::ExchangeClient;
pub use strategy::{OcoStrategy, OrderDispatcher, TwapPolicy, TwapStrategy};
