//! Validated trade request built from raw user input.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::OrderError;

use super::Direction;

/// A buy/sell action after boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    direction: Direction,
    instrument: String,
    risk_percent: Decimal,
}

impl TradeRequest {
    /// Parse raw instrument and risk strings.
    ///
    /// The instrument is trimmed and upper-cased; the risk percentage must be
    /// a number strictly greater than zero.
    pub fn parse(
        direction: Direction,
        instrument_input: &str,
        risk_percent_input: &str,
    ) -> Result<Self, OrderError> {
        let instrument = instrument_input.trim().to_uppercase();
        if instrument.is_empty() {
            return Err(OrderError::Input("Instrument cannot be empty.".to_string()));
        }

        let risk_percent = parse_number(risk_percent_input).ok_or_else(|| {
            OrderError::Input("Invalid risk percentage. Enter a valid number.".to_string())
        })?;
        if risk_percent <= Decimal::ZERO {
            return Err(OrderError::Input(
                "Risk percentage must be greater than 0.".to_string(),
            ));
        }

        Ok(Self {
            direction,
            instrument,
            risk_percent,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn risk_percent(&self) -> Decimal {
        self.risk_percent
    }
}

fn parse_number(input: &str) -> Option<Decimal> {
    let s = input.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
