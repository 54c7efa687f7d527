//! FX Scalping Tool
//!
//! Sizes a market order from a fixed percentage of account balance and
//! submits it with an attached stop-loss and take-profit.

mod api;
mod config;
mod error;
mod models;
mod trading;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::OandaClient;
use crate::config::{AppConfig, ConnectionArgs, Environment, TradeArgs};
use crate::error::OrderError;
use crate::models::{Direction, OrderOutcome, SizedOrder};
use crate::trading::{compute_units, OrderOrchestrator, QuoteGateway};

/// Risk-sized FX market orders from the command line.
#[derive(Parser)]
#[command(name = "scalper")]
#[command(about = "Place risk-sized FX market orders with attached SL/TP", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SCALPER_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(flatten)]
    trade: TradeArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a buy market order
    Buy(OrderArgs),

    /// Place a sell market order
    Sell(OrderArgs),

    /// Show account balance and current prices
    Quote {
        /// Instrument (e.g. EUR_USD); defaults to the configured instrument
        #[arg(short, long)]
        instrument: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[derive(Args)]
struct OrderArgs {
    /// Instrument (e.g. EUR_USD); defaults to the configured instrument
    #[arg(short, long)]
    instrument: Option<String>,

    /// Risk percentage of balance; defaults to the configured risk
    #[arg(short, long, allow_hyphen_values = true)]
    risk: Option<String>,

    /// Size and price the order without submitting it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env fallbacks
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::new(cli.connection, cli.trade.into());

    match cli.command {
        Commands::Buy(args) => run_order(&config, Direction::Buy, args).await,
        Commands::Sell(args) => run_order(&config, Direction::Sell, args).await,
        Commands::Quote { instrument } => show_quote(&config, instrument).await,
        Commands::Config => {
            show_config(&config);
            Ok(())
        }
    }
}

async fn run_order(config: &AppConfig, direction: Direction, args: OrderArgs) -> Result<()> {
    let risk = config
        .trade
        .risk_parameters()
        .context("Invalid trade settings")?;
    let client = Arc::new(OandaClient::new(config.api_key()?)?);
    let orchestrator = OrderOrchestrator::new(client.clone(), client, config.gateway_context()?);

    let instrument = args
        .instrument
        .unwrap_or_else(|| config.trade.default_instrument.clone());
    let risk_input = args
        .risk
        .unwrap_or_else(|| config.trade.risk_per_trade_percent.to_string());

    print_banner(config.environment);
    info!(
        direction = %direction,
        instrument = %instrument,
        risk = %risk_input,
        dry_run = args.dry_run,
        "Placing order"
    );

    if args.dry_run {
        let order = orchestrator
            .prepare_order(direction, &instrument, &risk_input, &risk)
            .await
            .map_err(report_failure)?;
        println!("\n=== Dry Run (not submitted) ===");
        print_order(&order);
        return Ok(());
    }

    match orchestrator
        .place_order(direction, &instrument, &risk_input, &risk)
        .await
    {
        OrderOutcome::Succeeded(confirmation) => {
            println!("\n=== Order Placed ===");
            print_order(&confirmation.order);
            println!("Client ID:    {}", confirmation.client_order_id);
            println!("Placed at:    {}", confirmation.placed_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("\nBroker response:");
            println!("{}", serde_json::to_string_pretty(&confirmation.response)?);
            Ok(())
        }
        OrderOutcome::Failed(e) => Err(report_failure(e)),
    }
}

/// Print any broker diagnostics and turn the failure into the process error.
fn report_failure(e: OrderError) -> anyhow::Error {
    if let Some(response) = e.response() {
        eprintln!("Broker response:");
        eprintln!(
            "{}",
            serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
        );
    }
    anyhow::Error::new(e)
}

async fn show_quote(config: &AppConfig, instrument: Option<String>) -> Result<()> {
    let client = OandaClient::new(config.api_key()?)?;
    let ctx = config.gateway_context()?;
    let instrument = instrument
        .unwrap_or_else(|| config.trade.default_instrument.clone())
        .trim()
        .to_uppercase();

    let balance = client.get_balance(&ctx).await?.balance;
    let quote = client.get_quote(&instrument, &ctx).await?;

    print_banner(config.environment);
    println!("\n=== {} ===", instrument);
    println!("Balance:      {}", balance);
    println!("Bid:          {}", quote.bid);
    println!("Ask:          {}", quote.ask);
    println!("Spread:       {}", quote.spread());

    if let Ok(risk) = config.trade.risk_parameters() {
        let units = compute_units(
            balance,
            config.trade.risk_per_trade_percent,
            risk.stop_loss_pips(),
            risk.pip_value(),
        );
        println!(
            "Units @ {}%:  {} (SL {} pips)",
            config.trade.risk_per_trade_percent,
            units,
            risk.stop_loss_pips()
        );
    }

    Ok(())
}

fn show_config(config: &AppConfig) {
    println!("\n=== Connection ===\n");
    println!("  Environment:          {}", config.environment.label());
    println!("  API URL:              {}", config.api_url);
    println!(
        "  Account ID:           {}",
        config.account_id.as_deref().unwrap_or("(not set)")
    );
    println!("  API Key:              {}", config.masked_api_key());

    let trade = &config.trade;
    println!("\n=== Trade Settings ===\n");
    println!("  Default Instrument:   {}", trade.default_instrument);
    println!("  Risk Per Trade:       {}%", trade.risk_per_trade_percent);
    println!("  Stop Loss:            {} pips", trade.sl_pips);
    println!("  Take Profit:          {} pips", trade.tp_pips);
    println!("  Pip Size:             {}", trade.pip_size);
    println!("  Pip Value:            {}", trade.pip_value);

    if let Err(e) = trade.risk_parameters() {
        println!("\n  WARNING: {}", e);
    }
}

fn print_banner(environment: Environment) {
    println!("Trading in {} Mode", environment.label());
}

fn print_order(order: &SizedOrder) {
    println!("Instrument:   {}", order.instrument);
    println!("Direction:    {}", order.direction);
    println!("Units:        {}", order.signed_units());
    println!("Entry:        {}", order.entry_price);
    println!("Stop Loss:    {}", order.stop_loss_price);
    println!("Take Profit:  {}", order.take_profit_price);
}
