//! Trade settings and the validated risk parameters derived from them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-instrument trade settings as loaded from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSettings {
    /// Stop-loss distance in pips
    pub sl_pips: Decimal,

    /// Take-profit distance in pips
    pub tp_pips: Decimal,

    /// Instrument used when none is given on the command line
    pub default_instrument: String,

    /// Risk per trade as a percentage of account balance
    pub risk_per_trade_percent: Decimal,

    /// Price increment of one pip (0.0001 for most pairs, 0.01 for JPY pairs)
    pub pip_size: Decimal,

    /// Account-currency value of one pip per unit
    pub pip_value: Decimal,
}

impl Default for TradeSettings {
    fn default() -> Self {
        Self {
            sl_pips: dec!(10),
            tp_pips: dec!(20),
            default_instrument: "EUR_USD".to_string(),
            risk_per_trade_percent: dec!(0.5),
            pip_size: dec!(0.0001),
            pip_value: dec!(0.0001),
        }
    }
}

impl TradeSettings {
    pub fn risk_parameters(&self) -> Result<RiskParameters, RiskConfigError> {
        RiskParameters::new(self.sl_pips, self.tp_pips, self.pip_size, self.pip_value)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RiskConfigError {
    #[error("stop-loss distance must be greater than 0 pips, got {0}")]
    StopLoss(Decimal),
    #[error("take-profit distance cannot be negative, got {0}")]
    TakeProfit(Decimal),
    #[error("pip size must be greater than 0, got {0}")]
    PipSize(Decimal),
    #[error("pip value must be greater than 0, got {0}")]
    PipValue(Decimal),
}

/// Stop/target distances and pip economics for one instrument class.
///
/// Only constructible through [`RiskParameters::new`], so a zero stop-loss
/// can never reach the position sizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskParameters {
    stop_loss_pips: Decimal,
    take_profit_pips: Decimal,
    pip_size: Decimal,
    pip_value: Decimal,
}

impl RiskParameters {
    pub fn new(
        stop_loss_pips: Decimal,
        take_profit_pips: Decimal,
        pip_size: Decimal,
        pip_value: Decimal,
    ) -> Result<Self, RiskConfigError> {
        if stop_loss_pips <= Decimal::ZERO {
            return Err(RiskConfigError::StopLoss(stop_loss_pips));
        }
        if take_profit_pips < Decimal::ZERO {
            return Err(RiskConfigError::TakeProfit(take_profit_pips));
        }
        if pip_size <= Decimal::ZERO {
            return Err(RiskConfigError::PipSize(pip_size));
        }
        if pip_value <= Decimal::ZERO {
            return Err(RiskConfigError::PipValue(pip_value));
        }

        Ok(Self {
            stop_loss_pips,
            take_profit_pips,
            pip_size,
            pip_value,
        })
    }

    pub fn stop_loss_pips(&self) -> Decimal {
        self.stop_loss_pips
    }

    pub fn take_profit_pips(&self) -> Decimal {
        self.take_profit_pips
    }

    pub fn pip_size(&self) -> Decimal {
        self.pip_size
    }

    pub fn pip_value(&self) -> Decimal {
        self.pip_value
    }
}
