//! Stop-loss and take-profit levels from pip distances.

use rust_decimal::Decimal;

use crate::models::Direction;

/// Decimal places every protective level is rounded to.
///
/// Fixed at FX 5-digit quoting; JPY-quoted pairs still get 5 places.
pub const PRICE_DECIMALS: u32 = 5;

/// Returns `(stop_loss, take_profit)` for an order entered at `entry_price`.
///
/// Buys protect below and target above the entry; sells mirror that.
pub fn compute_stop_and_target(
    entry_price: Decimal,
    stop_loss_pips: Decimal,
    take_profit_pips: Decimal,
    direction: Direction,
    pip_size: Decimal,
) -> (Decimal, Decimal) {
    let stop_distance = stop_loss_pips * pip_size;
    let target_distance = take_profit_pips * pip_size;

    let (stop_loss, take_profit) = match direction {
        Direction::Buy => (entry_price - stop_distance, entry_price + target_distance),
        Direction::Sell => (entry_price + stop_distance, entry_price - target_distance),
    };

    (
        stop_loss.round_dp(PRICE_DECIMALS),
        take_profit.round_dp(PRICE_DECIMALS),
    )
}
