//! Order orchestration: one risk-sized market order per call.
//!
//! An attempt moves through the stages
//! Validating -> FetchingBalance -> Sizing -> FetchingPrice -> Pricing -> Submitting
//! and ends in `Succeeded` or `Failed`. Each stage runs only after the
//! previous one succeeded, so nothing is submitted unless both sizing and
//! pricing went through. Nothing is retried.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::OrderError;
use crate::models::{Direction, OrderConfirmation, OrderOutcome, SizedOrder, TradeRequest};

use super::gateway::{GatewayContext, OrderGateway, OrderTicket, QuoteGateway};
use super::position_sizer::{compute_units, risk_amount};
use super::price_calculator::compute_stop_and_target;
use super::RiskParameters;

/// Stage of an order attempt. Between attempts the orchestrator is idle and
/// holds no per-attempt state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Validating,
    FetchingBalance,
    Sizing,
    FetchingPrice,
    Pricing,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStage::Validating => "validating",
            OrderStage::FetchingBalance => "fetching_balance",
            OrderStage::Sizing => "sizing",
            OrderStage::FetchingPrice => "fetching_price",
            OrderStage::Pricing => "pricing",
            OrderStage::Submitting => "submitting",
            OrderStage::Succeeded => "succeeded",
            OrderStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(stage: OrderStage) {
    debug!(stage = %stage, "Order attempt stage");
}

/// Places risk-sized market orders through the broker ports.
pub struct OrderOrchestrator {
    quotes: Arc<dyn QuoteGateway>,
    orders: Arc<dyn OrderGateway>,
    context: GatewayContext,
}

impl OrderOrchestrator {
    pub fn new(
        quotes: Arc<dyn QuoteGateway>,
        orders: Arc<dyn OrderGateway>,
        context: GatewayContext,
    ) -> Self {
        Self {
            quotes,
            orders,
            context,
        }
    }

    /// Validate, size and price an order, then submit it exactly once.
    pub async fn place_order(
        &self,
        direction: Direction,
        instrument_input: &str,
        risk_percent_input: &str,
        risk: &RiskParameters,
    ) -> OrderOutcome {
        let result = match self
            .prepare_order(direction, instrument_input, risk_percent_input, risk)
            .await
        {
            Ok(order) => self.submit(order).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(confirmation) => {
                enter(OrderStage::Succeeded);
                info!(
                    environment = self.context.environment.label(),
                    instrument = %confirmation.order.instrument,
                    units = confirmation.order.signed_units(),
                    client_order_id = %confirmation.client_order_id,
                    "Order placed"
                );
            }
            Err(e) => {
                enter(OrderStage::Failed);
                warn!(stage = %e.stage(), error = %e, "Order attempt failed");
            }
        }

        OrderOutcome::from(result)
    }

    /// Everything up to (not including) submission.
    ///
    /// Used directly for dry runs; the returned order has positive units and
    /// rounded protective levels.
    pub async fn prepare_order(
        &self,
        direction: Direction,
        instrument_input: &str,
        risk_percent_input: &str,
        risk: &RiskParameters,
    ) -> Result<SizedOrder, OrderError> {
        enter(OrderStage::Validating);
        let request = TradeRequest::parse(direction, instrument_input, risk_percent_input)?;
        let direction = request.direction();

        enter(OrderStage::FetchingBalance);
        let balance = self
            .quotes
            .get_balance(&self.context)
            .await
            .map_err(|e| OrderError::Balance(format!("{e:#}")))?
            .balance;
        if balance <= Decimal::ZERO {
            return Err(OrderError::Balance(format!(
                "account balance is {balance}, nothing to risk"
            )));
        }

        enter(OrderStage::Sizing);
        let units = compute_units(
            balance,
            request.risk_percent(),
            risk.stop_loss_pips(),
            risk.pip_value(),
        );
        debug!(
            balance = %balance,
            risk_percent = %request.risk_percent(),
            units = units,
            "Sized position"
        );
        if units == 0 {
            return Err(OrderError::Sizing {
                risk_amount: risk_amount(balance, request.risk_percent()),
            });
        }

        enter(OrderStage::FetchingPrice);
        let quote = self
            .quotes
            .get_quote(request.instrument(), &self.context)
            .await
            .map_err(|e| OrderError::Quote(format!("{e:#}")))?;
        if quote.bid <= Decimal::ZERO || quote.ask <= Decimal::ZERO {
            return Err(OrderError::Quote(format!(
                "broker returned non-positive prices (bid {}, ask {})",
                quote.bid, quote.ask
            )));
        }

        enter(OrderStage::Pricing);
        let entry_price = direction.entry_price(quote.bid, quote.ask);
        let (stop_loss_price, take_profit_price) = compute_stop_and_target(
            entry_price,
            risk.stop_loss_pips(),
            risk.take_profit_pips(),
            direction,
            risk.pip_size(),
        );

        Ok(SizedOrder {
            instrument: request.instrument().to_string(),
            direction,
            units,
            entry_price,
            stop_loss_price,
            take_profit_price,
        })
    }

    async fn submit(&self, order: SizedOrder) -> Result<OrderConfirmation, OrderError> {
        enter(OrderStage::Submitting);
        let ticket = OrderTicket {
            instrument: order.instrument.clone(),
            signed_units: order.signed_units(),
            stop_loss_price: order.stop_loss_price,
            take_profit_price: order.take_profit_price,
            client_order_id: format!("scalper-{}", Uuid::new_v4().simple()),
        };

        let receipt = self
            .orders
            .submit_order(&self.context, &ticket)
            .await
            .map_err(|e| OrderError::Submission {
                reason: format!("{e:#}"),
                response: None,
            })?;
        debug!(status = receipt.status, body = %receipt.body, "Order response");

        if !receipt.created {
            return Err(OrderError::Submission {
                reason: format!("broker returned status {}", receipt.status),
                response: Some(receipt.body),
            });
        }

        Ok(OrderConfirmation {
            order,
            client_order_id: ticket.client_order_id,
            placed_at: Utc::now(),
            response: receipt.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::config::Environment;
    use crate::trading::gateway::SubmissionReceipt;
    use crate::trading::stub::StubBroker;

    fn context() -> GatewayContext {
        GatewayContext {
            environment: Environment::Practice,
            api_url: "http://localhost".to_string(),
            account_id: "101-004-0000000-001".to_string(),
        }
    }

    fn risk(stop_loss_pips: Decimal) -> RiskParameters {
        RiskParameters::new(stop_loss_pips, dec!(40), dec!(0.0001), dec!(0.0001)).unwrap()
    }

    fn orchestrator(broker: &Arc<StubBroker>) -> OrderOrchestrator {
        OrderOrchestrator::new(broker.clone(), broker.clone(), context())
    }

    fn failure(outcome: OrderOutcome) -> OrderError {
        match outcome {
            OrderOutcome::Failed(e) => e,
            OrderOutcome::Succeeded(c) => panic!("expected failure, got {c:?}"),
        }
    }

    #[tokio::test]
    async fn test_buy_happy_path() {
        let broker = Arc::new(StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)));
        let outcome = orchestrator(&broker)
            .place_order(Direction::Buy, "eur_usd", "1", &risk(dec!(20)))
            .await;

        let confirmation = match outcome {
            OrderOutcome::Succeeded(c) => c,
            OrderOutcome::Failed(e) => panic!("expected success, got {e:?}"),
        };
        assert_eq!(confirmation.order.units, 50_000);
        assert_eq!(confirmation.order.entry_price, dec!(1.1001));
        assert_eq!(confirmation.order.stop_loss_price, dec!(1.0981));
        assert_eq!(confirmation.order.take_profit_price, dec!(1.1041));
        assert!(confirmation.client_order_id.starts_with("scalper-"));

        let ticket = broker.last_ticket().unwrap();
        assert_eq!(ticket.instrument, "EUR_USD");
        assert_eq!(ticket.signed_units, 50_000);
        assert_eq!(ticket.stop_loss_price, dec!(1.0981));
        assert_eq!(broker.submit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sell_uses_bid_and_negative_units() {
        let broker = Arc::new(StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)));
        let outcome = orchestrator(&broker)
            .place_order(Direction::Sell, "EUR_USD", "1", &risk(dec!(20)))
            .await;
        assert!(matches!(outcome, OrderOutcome::Succeeded(_)));

        let ticket = broker.last_ticket().unwrap();
        assert_eq!(ticket.signed_units, -50_000);
        assert_eq!(ticket.stop_loss_price, dec!(1.1019));
        assert_eq!(ticket.take_profit_price, dec!(1.0959));
    }

    #[tokio::test]
    async fn test_empty_instrument_makes_no_calls() {
        let broker = Arc::new(StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)));
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "  ", "1", &risk(dec!(20)))
                .await,
        );
        assert!(matches!(err, OrderError::Input(_)));
        assert_eq!(broker.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_negative_risk_is_input_error() {
        let broker = Arc::new(StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)));
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "-1", &risk(dec!(20)))
                .await,
        );
        assert!(matches!(err, OrderError::Input(_)));
        assert_eq!(broker.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_balance_stops_before_quote() {
        let broker = Arc::new(StubBroker::new(Decimal::ZERO, dec!(1.0999), dec!(1.1001)));
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "1", &risk(dec!(20)))
                .await,
        );
        assert!(matches!(err, OrderError::Balance(_)));
        assert_eq!(broker.balance_calls.load(Ordering::SeqCst), 1);
        assert_eq!(broker.quote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_balance_fetch_error_is_surfaced_verbatim() {
        let broker = Arc::new(
            StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001))
                .with_balance_error("connection refused"),
        );
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "1", &risk(dec!(20)))
                .await,
        );
        assert_eq!(err, OrderError::Balance("connection refused".to_string()));
        assert_eq!(broker.quote_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_units_stops_before_quote() {
        // 0.01% of 1 = 0.0001, one unit risks 0.005
        let broker = Arc::new(StubBroker::new(dec!(1), dec!(1.0999), dec!(1.1001)));
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "0.01", &risk(dec!(50)))
                .await,
        );
        assert_eq!(err, OrderError::Sizing { risk_amount: dec!(0.0001) });
        assert_eq!(broker.quote_calls.load(Ordering::SeqCst), 0);
        assert_eq!(broker.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_quote_error_prevents_submission() {
        let broker = Arc::new(
            StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001))
                .with_quote_error("Missing 'prices' key in API response"),
        );
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "1", &risk(dec!(20)))
                .await,
        );
        assert!(matches!(err, OrderError::Quote(ref m) if m.contains("prices")));
        assert_eq!(broker.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_price_is_quote_error() {
        let broker = Arc::new(StubBroker::new(dec!(10000), Decimal::ZERO, Decimal::ZERO));
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Sell, "EUR_USD", "1", &risk(dec!(20)))
                .await,
        );
        assert!(matches!(err, OrderError::Quote(_)));
        assert_eq!(broker.submit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_order_carries_response() {
        let body = json!({"errorCode": "INSUFFICIENT_MARGIN"});
        let broker = Arc::new(
            StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)).with_receipt(SubmissionReceipt {
                created: false,
                status: 400,
                body: body.clone(),
            }),
        );
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "1", &risk(dec!(20)))
                .await,
        );
        assert_eq!(err.stage(), OrderStage::Submitting);
        assert_eq!(err.response(), Some(&body));
        assert_eq!(broker.submit_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submission_transport_error() {
        let broker = Arc::new(
            StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)).with_submit_error("timed out"),
        );
        let err = failure(
            orchestrator(&broker)
                .place_order(Direction::Buy, "EUR_USD", "1", &risk(dec!(20)))
                .await,
        );
        assert!(matches!(err, OrderError::Submission { response: None, .. }));
    }

    #[tokio::test]
    async fn test_prepare_order_never_submits() {
        let broker = Arc::new(StubBroker::new(dec!(10000), dec!(1.0999), dec!(1.1001)));
        let order = orchestrator(&broker)
            .prepare_order(Direction::Buy, "EUR_USD", "1", &risk(dec!(20)))
            .await
            .unwrap();
        assert_eq!(order.units, 50_000);
        assert_eq!(order.signed_units(), 50_000);
        assert_eq!(broker.quote_calls.load(Ordering::SeqCst), 1);
        assert_eq!(broker.submit_calls.load(Ordering::SeqCst), 0);
    }
}
