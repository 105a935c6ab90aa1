//! Crate-wide engine error taxonomy — spec §7.

use crate::ledger::LedgerError;
use crate::orderbook::OrderBookError;
use rust_decimal::Decimal;
use std::fmt;

/// Errors surfaced by [`crate::engine::MatchingEngine`] placement and
/// cancellation operations. Wraps [`OrderBookError`] and [`LedgerError`] so
/// callers deal with one error type at the engine boundary (spec §4.8).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    /// The placement's lock was rejected; no order exists (spec §7
    /// "insufficient-funds").
    InsufficientFunds { agent: String, requested: Decimal, available: Decimal },

    /// Price outside `[tick, 1 - tick]` or not on the tick grid.
    InvalidPrice { price: Decimal, tick_size: Decimal },

    /// Quantity was zero or negative.
    InvalidQuantity(Decimal),

    OrderBook(OrderBookError),
    Ledger(LedgerError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InsufficientFunds { agent, requested, available } => write!(
                f,
                "agent {agent} has {available} available, cannot lock {requested}"
            ),
            EngineError::InvalidPrice { price, tick_size } => write!(
                f,
                "invalid price {price}: must lie in [{tick_size}, {}] on the tick grid",
                Decimal::ONE - tick_size
            ),
            EngineError::InvalidQuantity(quantity) => {
                write!(f, "invalid quantity: {quantity} must be positive")
            }
            EngineError::OrderBook(err) => write!(f, "{err}"),
            EngineError::Ledger(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<OrderBookError> for EngineError {
    fn from(err: OrderBookError) -> Self {
        EngineError::OrderBook(err)
    }
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        EngineError::Ledger(err)
    }
}
