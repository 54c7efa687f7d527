//! In-memory broker for orchestrator tests.
//!
//! Responses are scripted up front; every call is counted and every
//! submitted ticket recorded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use crate::models::{AccountSnapshot, Quote};

use super::gateway::{GatewayContext, OrderGateway, OrderTicket, QuoteGateway, SubmissionReceipt};

pub struct StubBroker {
    balance: Result<Decimal, String>,
    quote: Result<Quote, String>,
    receipt: Result<SubmissionReceipt, String>,
    pub balance_calls: AtomicUsize,
    pub quote_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub submitted: Mutex<Vec<OrderTicket>>,
}

impl StubBroker {
    pub fn new(balance: Decimal, bid: Decimal, ask: Decimal) -> Self {
        Self {
            balance: Ok(balance),
            quote: Ok(Quote { bid, ask }),
            receipt: Ok(SubmissionReceipt {
                created: true,
                status: 201,
                body: json!({"orderCreateTransaction": {"id": "6372"}}),
            }),
            balance_calls: AtomicUsize::new(0),
            quote_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance_error(mut self, message: &str) -> Self {
        self.balance = Err(message.to_string());
        self
    }

    pub fn with_quote_error(mut self, message: &str) -> Self {
        self.quote = Err(message.to_string());
        self
    }

    pub fn with_receipt(mut self, receipt: SubmissionReceipt) -> Self {
        self.receipt = Ok(receipt);
        self
    }

    pub fn with_submit_error(mut self, message: &str) -> Self {
        self.receipt = Err(message.to_string());
        self
    }

    pub fn total_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
            + self.quote_calls.load(Ordering::SeqCst)
            + self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn last_ticket(&self) -> Option<OrderTicket> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl QuoteGateway for StubBroker {
    async fn get_balance(&self, _ctx: &GatewayContext) -> Result<AccountSnapshot> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance
            .clone()
            .map(|balance| AccountSnapshot { balance })
            .map_err(|e| anyhow!(e))
    }

    async fn get_quote(&self, _instrument: &str, _ctx: &GatewayContext) -> Result<Quote> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quote.clone().map_err(|e| anyhow!(e))
    }
}

#[async_trait]
impl OrderGateway for StubBroker {
    async fn submit_order(&self, _ctx: &GatewayContext, ticket: &OrderTicket) -> Result<SubmissionReceipt> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(ticket.clone());
        self.receipt.clone().map_err(|e| anyhow!(e))
    }
}
