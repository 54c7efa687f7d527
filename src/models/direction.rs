//! Trade direction and its sign conventions.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a manual trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
        }
    }

    /// Price the order is assumed to fill at: ask for buys, bid for sells.
    pub fn entry_price(&self, bid: Decimal, ask: Decimal) -> Decimal {
        match self {
            Direction::Buy => ask,
            Direction::Sell => bid,
        }
    }

    /// Signed quantity sent to the broker: positive for buys, negative for sells.
    pub fn signed_units(&self, units: u64) -> i64 {
        let units = i64::try_from(units).unwrap_or(i64::MAX);
        match self {
            Direction::Buy => units,
            Direction::Sell => -units,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
