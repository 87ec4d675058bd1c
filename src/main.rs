use clap::Parser;
use gambit::cli::{self, Cli, Commands};
use gambit::config::{AppConfig, LoggingConfig};
use gambit::domain::{OcoRequest, TwapRequest};
use gambit::error::{GambitError, Result};
use gambit::strategy::{OrderDispatcher, TwapPolicy};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)?;
    if let Err(errors) = config.validate() {
        return Err(GambitError::Validation(errors.join("; ")));
    }
    if cli.live {
        config.exchange.testnet = false;
    }

    let _log_guard = init_logging(&config.logging);

    let client = gambit::exchange::build_client(&config.exchange)?;
    let dispatcher = OrderDispatcher::new(client.clone());

    match cli.command {
        Commands::Balance => cli::show_balance(client.as_ref()).await?,
        Commands::Market {
            symbol,
            side,
            quantity,
        } => cli::run_market(&dispatcher, &symbol, side, quantity).await?,
        Commands::Limit {
            symbol,
            side,
            quantity,
            price,
        } => cli::run_limit(&dispatcher, &symbol, side, quantity, price).await?,
        Commands::StopLimit {
            symbol,
            side,
            quantity,
            stop_price,
            limit_price,
        } => {
            cli::run_stop_limit(&dispatcher, &symbol, side, quantity, stop_price, limit_price)
                .await?
        }
        Commands::Oco {
            symbol,
            side,
            quantity,
            take_profit_price,
            stop_price,
            stop_limit_price,
        } => {
            let request = OcoRequest {
                symbol,
                open_side: side,
                quantity,
                take_profit_price,
                stop_trigger_price: stop_price,
                stop_limit_price,
            };
            cli::run_oco(&dispatcher, request).await?
        }
        Commands::Twap {
            symbol,
            side,
            total_quantity,
            slices,
            interval_seconds,
        } => {
            let request = TwapRequest {
                symbol,
                side,
                total_quantity,
                slice_count: slices,
                interval_seconds,
            };
            let policy = TwapPolicy {
                max_consecutive_failures: config.execution.max_consecutive_failures,
            };
            cli::run_twap(&dispatcher, policy, request).await?
        }
    }

    Ok(())
}

/// Console logging plus an optional non-blocking file appender. The returned
/// guard must stay alive for the lifetime of the process.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|f| f.to_os_string())
                .unwrap_or_else(|| "bot.log".into());

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);

            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .init();
            None
        }
    }
}
