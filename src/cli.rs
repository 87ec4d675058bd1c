//! Command-line surface: argument definitions and presentation handlers.
//!
//! Raw textual arguments are routed through [`crate::validation`] as clap
//! value parsers, so anything that reaches a handler is already typed and
//! constrained.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::{OcoRequest, OrderResult, OrderSide, TwapRequest};
use crate::error::Result;
use crate::exchange::ExchangeClient;
use crate::strategy::{OcoStrategy, OrderDispatcher, TwapPolicy, TwapStrategy};
use crate::validation;

#[derive(Parser)]
#[command(name = "gambit", version, about = "Binance USDT-M futures order bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Trade against the live endpoint instead of the testnet
    #[arg(long)]
    pub live: bool,

    /// Config directory
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show futures wallet balances
    Balance,
    /// Place a MARKET order
    Market {
        /// Symbol, e.g. BTCUSDT
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// BUY or SELL
        #[arg(value_parser = parse_side)]
        side: OrderSide,
        /// Quantity (base asset)
        #[arg(value_parser = parse_quantity)]
        quantity: Decimal,
    },
    /// Place a LIMIT order (GTC)
    Limit {
        /// Symbol, e.g. BTCUSDT
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// BUY or SELL
        #[arg(value_parser = parse_side)]
        side: OrderSide,
        /// Quantity (base asset)
        #[arg(value_parser = parse_quantity)]
        quantity: Decimal,
        /// Limit price (quote asset)
        #[arg(value_parser = parse_price)]
        price: Decimal,
    },
    /// Place a STOP-LIMIT order (GTC)
    StopLimit {
        /// Symbol, e.g. BTCUSDT
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// BUY or SELL
        #[arg(value_parser = parse_side)]
        side: OrderSide,
        /// Quantity (base asset)
        #[arg(value_parser = parse_quantity)]
        quantity: Decimal,
        /// Stop trigger price
        #[arg(value_parser = parse_price)]
        stop_price: Decimal,
        /// Limit price once triggered
        #[arg(value_parser = parse_price)]
        limit_price: Decimal,
    },
    /// Place a simulated OCO exit pair: take-profit LIMIT + STOP-LIMIT
    Oco {
        /// Symbol, e.g. BTCUSDT
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// Side the position was opened on; both legs close it
        #[arg(value_parser = parse_side)]
        side: OrderSide,
        /// Quantity (base asset)
        #[arg(value_parser = parse_quantity)]
        quantity: Decimal,
        /// Take-profit limit price
        #[arg(value_parser = parse_price)]
        take_profit_price: Decimal,
        /// Stop trigger price
        #[arg(value_parser = parse_price)]
        stop_price: Decimal,
        /// Stop-limit price
        #[arg(value_parser = parse_price)]
        stop_limit_price: Decimal,
    },
    /// Split a total quantity into equal MARKET slices over time (TWAP)
    Twap {
        /// Symbol, e.g. BTCUSDT
        #[arg(value_parser = parse_symbol)]
        symbol: String,
        /// BUY or SELL
        #[arg(value_parser = parse_side)]
        side: OrderSide,
        /// Total quantity across all slices
        #[arg(value_parser = parse_quantity)]
        total_quantity: Decimal,
        /// Number of slices (integer > 0)
        #[arg(value_parser = parse_slices)]
        slices: u32,
        /// Seconds between slices
        interval_seconds: u64,
    },
}

fn parse_symbol(raw: &str) -> std::result::Result<String, String> {
    validation::validate_symbol(raw).map_err(|e| e.to_string())
}

fn parse_side(raw: &str) -> std::result::Result<OrderSide, String> {
    validation::validate_side(raw).map_err(|e| e.to_string())
}

fn parse_quantity(raw: &str) -> std::result::Result<Decimal, String> {
    validation::validate_positive_decimal(raw, "quantity").map_err(|e| e.to_string())
}

fn parse_price(raw: &str) -> std::result::Result<Decimal, String> {
    validation::validate_positive_decimal(raw, "price").map_err(|e| e.to_string())
}

fn parse_slices(raw: &str) -> std::result::Result<u32, String> {
    validation::validate_positive_integer(raw, "slices").map_err(|e| e.to_string())
}

pub async fn show_balance(client: &dyn ExchangeClient) -> Result<()> {
    let balances = client.get_balance().await?;

    println!("Futures wallet balance:");
    for entry in balances {
        match entry.available_balance {
            Some(available) => {
                println!("  {}: {} (available {})", entry.asset, entry.balance, available)
            }
            None => println!("  {}: {}", entry.asset, entry.balance),
        }
    }
    Ok(())
}

pub async fn run_market(
    dispatcher: &OrderDispatcher,
    symbol: &str,
    side: OrderSide,
    quantity: Decimal,
) -> Result<()> {
    let result = dispatcher.place_market_order(symbol, side, quantity).await?;
    print_order_result("Market order", &result);
    Ok(())
}

pub async fn run_limit(
    dispatcher: &OrderDispatcher,
    symbol: &str,
    side: OrderSide,
    quantity: Decimal,
    price: Decimal,
) -> Result<()> {
    let result = dispatcher
        .place_limit_order(symbol, side, quantity, price)
        .await?;
    print_order_result("Limit order", &result);
    Ok(())
}

pub async fn run_stop_limit(
    dispatcher: &OrderDispatcher,
    symbol: &str,
    side: OrderSide,
    quantity: Decimal,
    stop_price: Decimal,
    limit_price: Decimal,
) -> Result<()> {
    let result = dispatcher
        .place_stop_limit_order(symbol, side, quantity, stop_price, limit_price)
        .await?;
    print_order_result("Stop-limit order", &result);
    Ok(())
}

pub async fn run_oco(dispatcher: &OrderDispatcher, request: OcoRequest) -> Result<()> {
    let result = OcoStrategy::new(dispatcher.clone()).place(&request).await?;

    println!("OCO simulation results:");
    print_order_result("  take-profit leg", &result.take_profit);
    print_order_result("  stop-limit leg", &result.stop_limit);
    if !result.fully_placed() {
        println!("  warning: pair is incomplete; standing legs are not linked on the exchange");
    }
    Ok(())
}

pub async fn run_twap(
    dispatcher: &OrderDispatcher,
    policy: TwapPolicy,
    request: TwapRequest,
) -> Result<()> {
    let result = TwapStrategy::new(dispatcher.clone())
        .with_policy(policy)
        .place(&request)
        .await?;

    println!(
        "TWAP results ({} per slice, {} placed / {} failed):",
        result.slice_quantity,
        result.placed_count(),
        result.failed_count()
    );
    for (i, slice) in result.slices.iter().enumerate() {
        print_order_result(&format!("  slice {}", i + 1), slice);
    }
    Ok(())
}

fn print_order_result(label: &str, result: &OrderResult) {
    if result.success {
        let raw = result
            .response
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_default();
        println!("{} accepted: {}", label, raw);
    } else {
        println!(
            "{} FAILED: {}",
            label,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}
