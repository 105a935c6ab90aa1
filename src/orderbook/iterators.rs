//! Lazy traversal over one side of a book — spec §4.4's "matchable iterator"
//! and §4.2's "leaf iterator" used for snapshots.
//!
//! Grounded on the teacher's `LevelsWithCumulativeDepth`/`LevelsUntilDepth`
//! (`orderbook/iterators.rs`): a `Box<dyn Iterator>` chained over the ordered
//! index, best-to-worst, with a `take_while`-style cutoff instead of
//! collecting a `Vec` up front. This crate's matching loop additionally needs
//! to read an order's price alongside it (the maker's price, not the taker's
//! limit), so the item type here is `(Decimal, &Order)`.

use super::price_level::PriceLevel;
use crate::order::{Order, Side};
use rust_decimal::Decimal;

/// Yields resident orders of one side, in matching priority order: best price
/// first, FIFO within a price, stopping at the first price that would violate
/// `limit_price` for the given taker `side`. `None` limit (a market taker)
/// never stops early on price.
pub struct MatchableOrders<'a> {
    levels: Box<dyn Iterator<Item = &'a PriceLevel> + 'a>,
    current: Option<Box<dyn Iterator<Item = &'a Order> + 'a>>,
    taker_side: Side,
    limit_price: Option<Decimal>,
    exhausted: bool,
}

impl<'a> MatchableOrders<'a> {
    pub fn new(
        levels: Box<dyn Iterator<Item = &'a PriceLevel> + 'a>,
        taker_side: Side,
        limit_price: Option<Decimal>,
    ) -> Self {
        Self {
            levels,
            current: None,
            taker_side,
            limit_price,
            exhausted: false,
        }
    }

    fn violates_limit(&self, price: Decimal) -> bool {
        match (self.taker_side, self.limit_price) {
            (Side::Buy, Some(limit)) => price > limit,
            (Side::Sell, Some(limit)) => price < limit,
            (_, None) => false,
        }
    }
}

impl<'a> Iterator for MatchableOrders<'a> {
    type Item = (Decimal, &'a Order);

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            if let Some(iter) = &mut self.current {
                if let Some(order) = iter.next() {
                    let price = order.price.expect("resident limit order has a price");
                    return Some((price, order));
                }
                self.current = None;
            }

            let level = self.levels.next()?;
            if self.violates_limit(level.price()) {
                self.exhausted = true;
                return None;
            }
            self.current = Some(Box::new(level.iterate()));
        }
    }
}

/// Aggregated view of one price level, used by snapshots and market data.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LevelInfo {
    pub price: Decimal,
    pub quantity: Decimal,
    pub order_count: usize,
}
