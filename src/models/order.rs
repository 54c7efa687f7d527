//! Sized orders and the outcome returned to the presentation layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::OrderError;

use super::Direction;

/// A fully priced market order, ready for a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizedOrder {
    pub instrument: String,
    pub direction: Direction,
    /// Unsigned position size; always > 0 once constructed by the orchestrator
    pub units: u64,
    pub entry_price: Decimal,
    pub stop_loss_price: Decimal,
    pub take_profit_price: Decimal,
}

impl SizedOrder {
    /// Units as the broker expects them: negative for sells.
    pub fn signed_units(&self) -> i64 {
        self.direction.signed_units(self.units)
    }
}

/// Details of an order the broker accepted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order: SizedOrder,
    pub client_order_id: String,
    pub placed_at: DateTime<Utc>,
    /// Raw broker response body
    pub response: serde_json::Value,
}

/// Terminal result of one `place_order` attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderOutcome {
    Succeeded(OrderConfirmation),
    Failed(OrderError),
}

impl From<Result<OrderConfirmation, OrderError>> for OrderOutcome {
    fn from(result: Result<OrderConfirmation, OrderError>) -> Self {
        match result {
            Ok(confirmation) => OrderOutcome::Succeeded(confirmation),
            Err(e) => OrderOutcome::Failed(e),
        }
    }
}
