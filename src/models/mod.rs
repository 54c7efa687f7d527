//! Data models for trade requests, quotes, and sized orders.

mod direction;
mod order;
mod quote;
mod request;

pub use direction::Direction;
pub use order::{OrderConfirmation, OrderOutcome, SizedOrder};
pub use quote::{AccountSnapshot, Quote};
pub use request::TradeRequest;
