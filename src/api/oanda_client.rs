//! OANDA v20 REST client: account balance, pricing, and order placement.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::models::{AccountSnapshot, Quote};
use crate::trading::{GatewayContext, OrderGateway, OrderTicket, QuoteGateway, SubmissionReceipt};

use super::types::*;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ORDER_TAG: &str = "scalper";

/// Authenticated HTTP client for one OANDA API token.
pub struct OandaClient {
    client: Client,
}

impl OandaClient {
    /// Create a client that sends `api_key` as a bearer token on every request.
    pub fn new(api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .context("API key contains invalid header characters")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch the account summary.
    pub async fn get_account_summary(&self, ctx: &GatewayContext) -> Result<AccountSummary> {
        let url = format!("{}/accounts/{}/summary", ctx.api_url, ctx.account_id);

        debug!(url = %url, "Fetching account summary");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch account summary")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Account summary request failed: {} - {}", status, body);
        }

        let summary: AccountSummaryResponse = response
            .json()
            .await
            .context("Failed to parse account summary response")?;

        debug!(
            balance = %summary.account.balance,
            currency = %summary.account.currency,
            "Account summary"
        );
        Ok(summary.account)
    }

    /// Fetch top-of-book pricing for one instrument.
    pub async fn get_pricing(&self, instrument: &str, ctx: &GatewayContext) -> Result<Quote> {
        let url = format!("{}/accounts/{}/pricing", ctx.api_url, ctx.account_id);

        debug!(url = %url, instrument = %instrument, "Fetching pricing");

        let response = self
            .client
            .get(&url)
            .query(&[("instruments", instrument)])
            .send()
            .await
            .context("Failed to fetch pricing")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("Pricing request failed: {} - {}", status, body);
        }

        let pricing: PricingResponse = response
            .json()
            .await
            .context("Failed to parse pricing response")?;

        let Some(prices) = pricing.prices else {
            bail!("Missing 'prices' key in API response. Check instrument or API setup.");
        };
        let price = prices
            .first()
            .with_context(|| format!("No price returned for {}", instrument))?;
        let bid = price
            .bids
            .first()
            .map(|b| b.price)
            .with_context(|| format!("No bid price for {}", instrument))?;
        let ask = price
            .asks
            .first()
            .map(|a| a.price)
            .with_context(|| format!("No ask price for {}", instrument))?;

        debug!(instrument = %instrument, bid = %bid, ask = %ask, "Pricing");
        Ok(Quote { bid, ask })
    }

    /// Post a market order with attached take-profit and stop-loss.
    pub async fn create_market_order(
        &self,
        ctx: &GatewayContext,
        ticket: &OrderTicket,
    ) -> Result<SubmissionReceipt> {
        let url = format!("{}/accounts/{}/orders", ctx.api_url, ctx.account_id);
        let body = OrderRequestBody {
            order: MarketOrderRequest {
                instrument: ticket.instrument.clone(),
                units: ticket.signed_units,
                order_type: "MARKET".to_string(),
                position_fill: "DEFAULT".to_string(),
                take_profit_on_fill: PriceDetails {
                    price: ticket.take_profit_price.to_string(),
                },
                stop_loss_on_fill: PriceDetails {
                    price: ticket.stop_loss_price.to_string(),
                },
                client_extensions: ClientExtensions {
                    id: ticket.client_order_id.clone(),
                    tag: ORDER_TAG.to_string(),
                },
            },
        };

        debug!(url = %url, units = ticket.signed_units, "Submitting order");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to submit order")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read order response")?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));

        Ok(SubmissionReceipt {
            created: status == StatusCode::CREATED,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl QuoteGateway for OandaClient {
    async fn get_balance(&self, ctx: &GatewayContext) -> Result<AccountSnapshot> {
        let summary = self.get_account_summary(ctx).await?;
        Ok(AccountSnapshot {
            balance: summary.balance,
        })
    }

    async fn get_quote(&self, instrument: &str, ctx: &GatewayContext) -> Result<Quote> {
        self.get_pricing(instrument, ctx).await
    }
}

#[async_trait]
impl OrderGateway for OandaClient {
    async fn submit_order(&self, ctx: &GatewayContext, ticket: &OrderTicket) -> Result<SubmissionReceipt> {
        self.create_market_order(ctx, ticket).await
    }
}
