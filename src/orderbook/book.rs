//! Order book for a single outcome — spec component 4.4.
//!
//! Composes a bid [`OrderBookSide`] and an ask [`OrderBookSide`], tracks the
//! last trade, and exposes the matchable iterator the engine drives. Mirrors
//! the teacher's `OrderBook` (`orderbook/book.rs`) at the level of public
//! surface (`add_order`, `remove_order`, `get_order`, snapshotting, best
//! bid/ask/spread/mid) while dropping everything tied to the teacher's
//! lock-free, multi-order-type design (iceberg/pegged/trailing-stop orders,
//! self-trade prevention, mass cancel, NATS publishing) that spec §1/§3 does
//! not call for.

use super::error::OrderBookError;
use super::iterators::{LevelInfo, MatchableOrders};
use super::side::OrderBookSide;
use crate::ids::OrderId;
use crate::order::{Order, Side, TimestampMs};
use rust_decimal::Decimal;
use tracing::{debug, error, trace};

/// Bid side + ask side + last-trade tracking for one outcome of one market.
pub struct OrderBook {
    bids: OrderBookSide,
    asks: OrderBookSide,
    last_trade_price: Option<Decimal>,
    last_trade_time: Option<TimestampMs>,
    cumulative_notional_volume: Decimal,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: OrderBookSide::new(Side::Buy),
            asks: OrderBookSide::new(Side::Sell),
            last_trade_price: None,
            last_trade_time: None,
            cumulative_notional_volume: Decimal::ZERO,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut OrderBookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    fn side(&self, side: Side) -> &OrderBookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Adds a resident limit order to its side. Requires `order.order_type ==
    /// Limit`, `order.price` present, and `order.status` in `{Open,
    /// Partial}` (spec §4.4).
    pub fn add_order(&mut self, order: Order) -> Result<(), OrderBookError> {
        if !order.is_resident_eligible() {
            let message = format!("order {} is not eligible to rest on the book (type/status mismatch)", order.id);
            error!(order_id = %order.id, "{message}");
            return Err(OrderBookError::InvariantViolation(message));
        }
        if order.price.is_none() {
            return Err(OrderBookError::MissingPrice(order.id));
        }
        let (side, id, price) = (order.side, order.id, order.price);
        self.side_mut(side).add(order);
        debug!(order_id = %id, ?price, ?side, "order added to book");
        Ok(())
    }

    /// Removes a resident order by id, searching both sides.
    pub fn remove_order(&mut self, id: OrderId) -> Option<Order> {
        let removed = self.bids.remove(id).or_else(|| self.asks.remove(id));
        if let Some(order) = &removed {
            trace!(order_id = %id, side = ?order.side, "order removed from book");
        }
        removed
    }

    #[must_use]
    pub fn get_order(&self, id: OrderId) -> Option<&Order> {
        self.bids.get(id).or_else(|| self.asks.get(id))
    }

    /// Rewrites a resident order's remaining quantity in place (spec §4.4);
    /// `new_remaining <= 0` is equivalent to `remove_order`. The matching
    /// loop itself drives fills through `apply_fill_to_resident` instead,
    /// since a fill also needs to shrink `locked_amount` and detect full
    /// consumption in one step — this is the book's direct quantity-rewrite
    /// primitive for callers with an already-computed remaining value.
    pub fn update_remaining(&mut self, id: OrderId, side: Side, new_remaining: Decimal) -> Option<Order> {
        trace!(order_id = %id, ?side, %new_remaining, "order remaining quantity rewritten");
        self.side_mut(side).update_remaining(id, new_remaining)
    }

    /// Applies one matching-loop fill to a resident order on `side`. Returns
    /// the order if the fill filled it completely (it has already been
    /// removed from the book), `None` if it remains resident and partially
    /// filled (spec §4.6 matching loop, step 5).
    pub fn apply_fill_to_resident(
        &mut self,
        side: Side,
        id: OrderId,
        fill_quantity: Decimal,
        fill_price: Decimal,
        locked_reduction: Decimal,
    ) -> Option<Order> {
        self.side_mut(side).apply_fill(id, fill_quantity, fill_price, locked_reduction)
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    #[must_use]
    pub fn mid(&self) -> Option<Decimal> {
        Some((self.best_ask()? + self.best_bid()?) / Decimal::TWO)
    }

    #[must_use]
    pub fn last_trade_price(&self) -> Option<Decimal> {
        self.last_trade_price
    }

    #[must_use]
    pub fn last_trade_time(&self) -> Option<TimestampMs> {
        self.last_trade_time
    }

    #[must_use]
    pub fn cumulative_notional_volume(&self) -> Decimal {
        self.cumulative_notional_volume
    }

    /// True if a taker on `incoming_side` could cross the book at all: a BUY
    /// matches if any ask exists at or below `price` (or any ask at all for a
    /// market order); SELL is symmetric (spec §4.4).
    #[must_use]
    pub fn can_match(&self, incoming_side: Side, price: Option<Decimal>) -> bool {
        let opposite_best = match incoming_side {
            Side::Buy => self.asks.best_price(),
            Side::Sell => self.bids.best_price(),
        };
        match (opposite_best, price) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(best), Some(limit)) => match incoming_side {
                Side::Buy => best <= limit,
                Side::Sell => best >= limit,
            },
        }
    }

    /// A lazy traversal over the side opposite `incoming_side`, best price
    /// first, stopping at the taker's `price` limit (`None` for a market
    /// order never stops on price). Spec §4.4: "must not materialize the
    /// full list".
    pub fn matchable_orders(&self, incoming_side: Side, price: Option<Decimal>) -> MatchableOrders<'_> {
        let opposite = self.side(incoming_side.opposite());
        MatchableOrders::new(opposite.iterate_from_best(), incoming_side, price)
    }

    /// Records a trade's price on the book, advancing `last_trade_price`,
    /// `last_trade_time`, and cumulative notional volume (spec §4.4).
    pub fn record_trade(&mut self, price: Decimal, quantity: Decimal) {
        self.last_trade_price = Some(price);
        self.last_trade_time = Some(crate::order::now_millis());
        self.cumulative_notional_volume += price * quantity;
    }

    /// Drops a level on `side` if it has become empty, refreshing that
    /// side's best-price cache. The matching loop calls this after draining a
    /// level to zero via `update_remaining`/`remove`.
    pub fn drop_if_empty(&mut self, side: Side, price: Decimal) {
        self.side_mut(side).drop_if_empty(price);
    }

    /// Bids best-first, asks best-first, with aggregated quantities, capped
    /// at `max_levels` per side (spec §6 "Book snapshot format").
    #[must_use]
    pub fn levels(&self, max_levels: usize) -> (Vec<LevelInfo>, Vec<LevelInfo>) {
        let to_info = |(price, quantity, order_count): (Decimal, Decimal, usize)| LevelInfo {
            price,
            quantity,
            order_count,
        };
        (
            self.bids.levels(max_levels).into_iter().map(to_info).collect(),
            self.asks.levels(max_levels).into_iter().map(to_info).collect(),
        )
    }
}
