//! Request and response bodies for the OANDA v20 REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Response from `GET /accounts/{id}/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummaryResponse {
    pub account: AccountSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub balance: Decimal,
    #[serde(default)]
    pub currency: String,
}

/// Response from `GET /accounts/{id}/pricing`.
///
/// `prices` stays optional so a missing key is reported by name instead of
/// as a generic parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingResponse {
    pub prices: Option<Vec<ClientPrice>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientPrice {
    #[serde(default)]
    pub bids: Vec<PriceBucket>,
    #[serde(default)]
    pub asks: Vec<PriceBucket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceBucket {
    pub price: Decimal,
}

/// Body for `POST /accounts/{id}/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequestBody {
    pub order: MarketOrderRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrderRequest {
    pub instrument: String,
    /// Signed: negative units sell
    pub units: i64,
    #[serde(rename = "type")]
    pub order_type: String,
    pub position_fill: String,
    pub take_profit_on_fill: PriceDetails,
    pub stop_loss_on_fill: PriceDetails,
    pub client_extensions: ClientExtensions,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceDetails {
    /// Decimal string, as the API expects
    pub price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientExtensions {
    pub id: String,
    pub tag: String,
}
