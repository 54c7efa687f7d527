//! OANDA REST adapter for the quote and order gateways.

mod oanda_client;
mod types;

pub use oanda_client::OandaClient;
