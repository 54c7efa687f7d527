//! Failure taxonomy for a single order attempt.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::trading::OrderStage;

/// Why an order attempt ended in `Failed`.
///
/// Every variant is local to one attempt: nothing is retried and none of
/// them is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// Rejected before any network call.
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Failed to fetch account balance: {0}")]
    Balance(String),

    /// Valid arithmetic, rejected by the business rule.
    #[error("Calculated units are zero or negative (risk amount {risk_amount})")]
    Sizing { risk_amount: Decimal },

    #[error("Failed to fetch prices: {0}")]
    Quote(String),

    #[error("Failed to place order: {reason}")]
    Submission {
        reason: String,
        response: Option<serde_json::Value>,
    },
}

impl OrderError {
    /// Stage the attempt was in when it failed.
    pub fn stage(&self) -> OrderStage {
        match self {
            OrderError::Input(_) => OrderStage::Validating,
            OrderError::Balance(_) => OrderStage::FetchingBalance,
            OrderError::Sizing { .. } => OrderStage::Sizing,
            OrderError::Quote(_) => OrderStage::FetchingPrice,
            OrderError::Submission { .. } => OrderStage::Submitting,
        }
    }

    /// Raw collaborator response, when the broker sent one.
    pub fn response(&self) -> Option<&serde_json::Value> {
        match self {
            OrderError::Submission { response, .. } => response.as_ref(),
            _ => None,
        }
    }
}
