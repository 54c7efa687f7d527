//! Runtime configuration: broker environment, credentials, trade settings.
//!
//! Every value comes from a command-line flag or its environment variable
//! (a `.env` file is loaded first by `main`).

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trading::{GatewayContext, TradeSettings};

pub const PRACTICE_API_URL: &str = "https://api-fxpractice.oanda.com/v3";
pub const LIVE_API_URL: &str = "https://api-fxtrade.oanda.com/v3";

/// Which broker environment orders go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Demo account, no real money
    Practice,
    /// Real-money account
    Live,
}

impl Environment {
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Environment::Practice => PRACTICE_API_URL,
            Environment::Live => LIVE_API_URL,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Environment::Practice => "Practice",
            Environment::Live => "Live",
        }
    }
}

/// Broker connection flags.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Broker environment
    #[arg(long, env = "OANDA_ENVIRONMENT", value_enum, default_value = "practice", global = true)]
    pub environment: Environment,

    /// REST base URL (defaults to the environment's endpoint)
    #[arg(long, env = "OANDA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Account identifier
    #[arg(long, env = "OANDA_ACCOUNT_ID", global = true)]
    pub account_id: Option<String>,

    /// API token
    #[arg(long, env = "OANDA_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
}

/// Risk and instrument flags.
#[derive(Debug, Clone, Args)]
pub struct TradeArgs {
    /// Stop-loss distance in pips
    #[arg(long, env = "SCALPER_SL_PIPS", default_value = "10", global = true)]
    pub sl_pips: Decimal,

    /// Take-profit distance in pips
    #[arg(long, env = "SCALPER_TP_PIPS", default_value = "20", global = true)]
    pub tp_pips: Decimal,

    /// Instrument used when a command is not given one
    #[arg(long, env = "SCALPER_DEFAULT_INSTRUMENT", default_value = "EUR_USD", global = true)]
    pub default_instrument: String,

    /// Default risk per trade, percent of balance
    #[arg(long, env = "SCALPER_RISK_PERCENT", default_value = "0.5", global = true)]
    pub risk_per_trade_percent: Decimal,

    /// Size of one pip (use 0.01 for JPY-quoted pairs)
    #[arg(long, env = "SCALPER_PIP_SIZE", default_value = "0.0001", global = true)]
    pub pip_size: Decimal,

    /// Value of one pip per unit, in account currency
    #[arg(long, env = "SCALPER_PIP_VALUE", default_value = "0.0001", global = true)]
    pub pip_value: Decimal,
}

impl From<TradeArgs> for TradeSettings {
    fn from(args: TradeArgs) -> Self {
        Self {
            sl_pips: args.sl_pips,
            tp_pips: args.tp_pips,
            default_instrument: args.default_instrument,
            risk_per_trade_percent: args.risk_per_trade_percent,
            pip_size: args.pip_size,
            pip_value: args.pip_value,
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_url: String,
    pub account_id: Option<String>,
    api_key: Option<String>,
    pub trade: TradeSettings,
}

impl AppConfig {
    pub fn new(connection: ConnectionArgs, trade: TradeSettings) -> Self {
        let api_url = connection
            .api_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| connection.environment.default_api_url().to_string());

        Self {
            environment: connection.environment,
            api_url: api_url.trim_end_matches('/').to_string(),
            account_id: connection.account_id.filter(|id| !id.trim().is_empty()),
            api_key: connection.api_key.filter(|key| !key.trim().is_empty()),
            trade,
        }
    }

    /// Endpoint selection handed to the orchestrator.
    pub fn gateway_context(&self) -> Result<GatewayContext> {
        let account_id = self
            .account_id
            .clone()
            .context("OANDA_ACCOUNT_ID not set")?;

        Ok(GatewayContext {
            environment: self.environment,
            api_url: self.api_url.clone(),
            account_id,
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().context("OANDA_API_KEY not set")
    }

    /// API key safe for display: last four characters only.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{tail}")
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }
}
