//! Order identity, sides, and lifecycle state.
//!
//! Grounded on the teacher crate's `pricelevel::{OrderType, Side, TimeInForce}`
//! surface (see `src/lib.rs` re-exports in the teacher) but redefined locally
//! since this crate no longer depends on `pricelevel` — the price-level and
//! price-index components it would have provided are implemented directly in
//! `crate::orderbook` per spec §4.1–§4.3.

use crate::ids::{AgentId, MarketId, OrderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Which side of the book an order rests on or crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// The outcome token a market's two books are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Yes,
    No,
}

/// Order pricing discipline. Market orders carry no `price`; they consume
/// resting liquidity at whatever price is available up to the matching cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// Lifecycle state. See spec.md §4.6 "State machine per order".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Partial,
    Filled,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// Millisecond Unix timestamp, matching the teacher's `current_time_millis` unit.
pub type TimestampMs = u64;

#[must_use]
pub fn now_millis() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Caller-supplied data that rides along with an order but is opaque to the
/// engine: a client-assigned id for reconciliation and free-form metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAttachment {
    pub client_order_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// A single order, resident on a book or in a terminal state.
///
/// Invariants (spec.md §3): `filled + remaining == original`; `status == Filled`
/// iff `remaining == 0`; `status == Partial` iff `0 < filled < original`; a
/// `Limit` order with `remaining > 0` is resident on exactly one price level of
/// exactly one side of one book, any other order is absent from the book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub agent: AgentId,
    pub market: MarketId,
    pub side: Side,
    pub outcome: Outcome,
    pub order_type: OrderType,
    /// Present iff `order_type == Limit`.
    pub price: Option<Decimal>,
    pub original_quantity: Decimal,
    pub filled_quantity: Decimal,
    pub remaining_quantity: Decimal,
    /// Escrow reserved for this order; shrinks as fills move funds into
    /// per-trade escrow, so that cancellation always releases exactly the
    /// reservation still outstanding (spec.md §9, open question 2).
    pub locked_amount: Decimal,
    pub status: OrderStatus,
    pub average_fill_price: Option<Decimal>,
    pub attachment: OrderAttachment,
    pub created_at: TimestampMs,
    pub updated_at: TimestampMs,
    pub filled_at: Option<TimestampMs>,
}

impl Order {
    pub fn new(
        agent: AgentId,
        market: MarketId,
        side: Side,
        outcome: Outcome,
        order_type: OrderType,
        price: Option<Decimal>,
        quantity: Decimal,
        locked_amount: Decimal,
        attachment: OrderAttachment,
    ) -> Self {
        let now = now_millis();
        Self {
            id: OrderId::new(),
            agent,
            market,
            side,
            outcome,
            order_type,
            price,
            original_quantity: quantity,
            filled_quantity: Decimal::ZERO,
            remaining_quantity: quantity,
            locked_amount,
            status: OrderStatus::Open,
            average_fill_price: None,
            attachment,
            created_at: now,
            updated_at: now,
            filled_at: None,
        }
    }

    #[must_use]
    pub fn is_resident_eligible(&self) -> bool {
        self.order_type == OrderType::Limit
            && matches!(self.status, OrderStatus::Open | OrderStatus::Partial)
    }

    /// Applies one fill against this order: advances `filled`/`remaining`,
    /// recomputes the quantity-weighted average fill price, and touches
    /// `updated_at`/`filled_at` (spec.md §4.6 matching loop, step 6).
    pub fn apply_fill(&mut self, fill_quantity: Decimal, fill_price: Decimal) {
        let prior_filled = self.filled_quantity;
        let prior_notional = self.average_fill_price.unwrap_or(Decimal::ZERO) * prior_filled;
        let new_filled = prior_filled + fill_quantity;

        self.average_fill_price = Some((prior_notional + fill_price * fill_quantity) / new_filled);
        self.filled_quantity = new_filled;
        self.remaining_quantity = self.original_quantity - new_filled;
        self.updated_at = now_millis();

        if self.remaining_quantity.is_zero() {
            self.status = OrderStatus::Filled;
            self.filled_at = Some(self.updated_at);
        } else if self.filled_quantity > Decimal::ZERO {
            self.status = OrderStatus::Partial;
        }
    }

    pub fn cancel(&mut self) {
        self.status = OrderStatus::Cancelled;
        self.updated_at = now_millis();
    }

    /// Shrinks the outstanding escrow reservation as a slice of it moves into
    /// a trade escrow (spec.md §9, open question 2 — see the `locked_amount`
    /// doc comment above).
    pub fn reduce_locked(&mut self, amount: Decimal) {
        self.locked_amount -= amount;
        self.updated_at = now_millis();
    }
}
