//! Ports to the broker: account/price queries and order submission.
//!
//! The orchestrator only talks to these traits. `api::OandaClient` is the
//! HTTP adapter; tests use an in-memory stub.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::config::Environment;
use crate::models::{AccountSnapshot, Quote};

/// Resolved, immutable endpoint selection for one run of the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayContext {
    pub environment: Environment,
    /// REST base URL, e.g. `https://api-fxpractice.oanda.com/v3`
    pub api_url: String,
    pub account_id: String,
}

/// Broker answer to an order submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    /// The broker's "order created" indicator (HTTP 201)
    pub created: bool,
    pub status: u16,
    pub body: serde_json::Value,
}

/// Order parameters as submitted; prices already rounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTicket {
    pub instrument: String,
    pub signed_units: i64,
    pub stop_loss_price: Decimal,
    pub take_profit_price: Decimal,
    pub client_order_id: String,
}

#[async_trait]
pub trait QuoteGateway: Send + Sync {
    /// Current account balance. Transport and parse failures are errors.
    async fn get_balance(&self, ctx: &GatewayContext) -> Result<AccountSnapshot>;

    /// Current bid/ask for `instrument`.
    async fn get_quote(&self, instrument: &str, ctx: &GatewayContext) -> Result<Quote>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit a market order with attached stop-loss and take-profit.
    ///
    /// A non-created receipt is `Ok`; only transport failures are `Err`.
    async fn submit_order(&self, ctx: &GatewayContext, ticket: &OrderTicket) -> Result<SubmissionReceipt>;
}
