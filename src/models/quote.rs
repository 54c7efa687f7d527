//! Point-in-time account and price snapshots. Never cached between orders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account balance as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: Decimal,
}

/// Top-of-book bid/ask for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: Decimal,
    pub ask: Decimal,
}

impl Quote {
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}
