//! Trading logic: risk configuration, position sizing, protective levels,
//! and order orchestration.

mod config;
mod gateway;
mod orchestrator;
mod position_sizer;
mod price_calculator;
#[cfg(test)]
mod stub;

pub use config::{RiskParameters, TradeSettings};
pub use gateway::{GatewayContext, OrderGateway, OrderTicket, QuoteGateway, SubmissionReceipt};
pub use orchestrator::{OrderOrchestrator, OrderStage};
pub use position_sizer::compute_units;
