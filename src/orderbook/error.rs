//! Order-book error types.
//!
//! Follows the teacher's manual enum + `Display`/`Error` idiom (see the
//! original `orderbook/error.rs`) rather than `thiserror` — the teacher's own
//! core error type is hand-written, and this crate matches that texture.

use crate::ids::OrderId;
use std::fmt;

/// Errors raised by the order-book components (spec §7). Price/quantity
/// validation and liquidity/availability outcomes are owned by
/// [`crate::engine::EngineError`] and [`crate::ledger::LedgerError`]
/// respectively, since the book itself is only ever called after the engine
/// has already validated a placement.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// A `Limit` order was submitted without a price, or a non-`Limit` order
    /// was routed to `add_order`.
    MissingPrice(OrderId),

    /// An internal invariant was violated mid-match (spec §7:
    /// "invariant-violation"). The matching loop must stop immediately on
    /// this and leave no partial book or ledger mutation behind.
    InvariantViolation(String),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::MissingPrice(id) => {
                write!(f, "order {id} requires a price but has none")
            }
            OrderBookError::InvariantViolation(message) => {
                write!(f, "order book invariant violated: {message}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
