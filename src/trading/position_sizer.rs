//! Fixed-risk position sizing.
//!
//! units = floor((balance * risk% / 100) / (pip_value * stop_loss_pips))

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Amount of account currency put at risk by one trade.
pub fn risk_amount(balance: Decimal, risk_percent: Decimal) -> Decimal {
    balance
        .checked_mul(risk_percent)
        .map(|v| v / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// Whole units such that hitting the stop loses at most the risk budget.
///
/// Expects `stop_loss_pips > 0` and `pip_value > 0` (guaranteed by
/// `RiskParameters`). Returns 0 when the budget does not cover a single
/// unit, or when the inputs would not yield a representable positive size;
/// callers treat 0 as "do not trade".
pub fn compute_units(
    balance: Decimal,
    risk_percent: Decimal,
    stop_loss_pips: Decimal,
    pip_value: Decimal,
) -> u64 {
    let risk_per_unit = match pip_value.checked_mul(stop_loss_pips) {
        Some(v) if v > Decimal::ZERO => v,
        _ => return 0,
    };

    risk_amount(balance, risk_percent)
        .checked_div(risk_per_unit)
        .map(|units| units.floor())
        .and_then(|units| units.to_u64())
        .unwrap_or(0)
}
