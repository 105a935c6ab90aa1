//! Order-book side — spec component 4.3.
//!
//! Wraps the ordered price index (4.2) and an order-id → price lookup, caching
//! the side's best price so the book never walks the tree to answer a quote.
//! The teacher crate keeps this pairing too (`crossbeam_skiplist::SkipMap` +
//! `dashmap::DashMap<Id, (u128, Side)>` on `OrderBook`), but for a
//! concurrent, lock-free multi-writer book. Spec §5 makes this engine a single
//! serialized actor per book, so a `BTreeMap` — the balanced-tree structure
//! spec §4.2 names directly — replaces the skip list, and a plain `HashMap`
//! replaces `DashMap`; both give the same O(log n) / O(1) contract without
//! paying for concurrent-map overhead nothing here contends on.

use super::price_level::PriceLevel;
use crate::ids::OrderId;
use crate::order::{Order, Side};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// One side (bids or asks) of a single outcome's order book.
pub struct OrderBookSide {
    side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
    order_price: HashMap<OrderId, Decimal>,
    best_price: Option<Decimal>,
    total_orders: usize,
}

impl OrderBookSide {
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            order_price: HashMap::new(),
            best_price: None,
            total_orders: 0,
        }
    }

    #[must_use]
    pub fn best_price(&self) -> Option<Decimal> {
        self.best_price
    }

    #[must_use]
    pub fn total_orders(&self) -> usize {
        self.total_orders
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn refresh_best(&mut self) {
        self.best_price = match self.side {
            // Bids: best is the highest price. BTreeMap orders ascending, so
            // the best bid is the last key.
            Side::Buy => self.levels.keys().next_back().copied(),
            // Asks: best is the lowest price, i.e. the first key.
            Side::Sell => self.levels.keys().next().copied(),
        };
    }

    /// Adds a resident `Limit` order. Requires `order.price` to be present.
    pub fn add(&mut self, order: Order) {
        let price = order
            .price
            .expect("add() requires a priced (Limit) order");
        self.order_price.insert(order.id, price);
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push(order);
        self.total_orders += 1;
        self.refresh_best();
    }

    /// Removes a resident order by id, dropping its price level if it becomes
    /// empty. Returns the removed order, or `None` if absent from this side.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let price = self.order_price.remove(&id)?;
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(id);
        if removed.is_some() {
            self.total_orders -= 1;
        }
        if level.is_empty() {
            self.levels.remove(&price);
        }
        self.refresh_best();
        removed
    }

    /// Rewrites a resident order's remaining quantity. A `new_remaining <= 0`
    /// is equivalent to `remove` (spec §4.3).
    pub fn update_remaining(&mut self, id: OrderId, new_remaining: Decimal) -> Option<Order> {
        if new_remaining <= Decimal::ZERO {
            return self.remove(id);
        }
        let price = *self.order_price.get(&id)?;
        if let Some(level) = self.levels.get_mut(&price) {
            level.update_remaining(id, new_remaining);
        }
        None
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        let price = self.order_price.get(&id)?;
        self.levels.get(price).and_then(|level| level.get(id))
    }

    #[must_use]
    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.best_price.and_then(|price| self.levels.get(&price))
    }

    /// Drops an emptied level and refreshes the best-price cache. The
    /// matching loop calls this after draining a level's FIFO queue to zero.
    pub fn drop_if_empty(&mut self, price: Decimal) {
        if let Some(level) = self.levels.get(&price) {
            if level.is_empty() {
                self.levels.remove(&price);
                self.refresh_best();
            }
        }
    }

    /// Applies a fill to a specific resident, wherever it sits in the level's
    /// FIFO queue. If the fill fully consumes it, removes it from the index
    /// and (if its level emptied) drops the level and refreshes the best
    /// price — returning the now-terminal order. Otherwise leaves it resident
    /// and returns `None`.
    pub fn apply_fill(
        &mut self,
        id: OrderId,
        fill_quantity: Decimal,
        fill_price: Decimal,
        locked_reduction: Decimal,
    ) -> Option<Order> {
        let price = *self.order_price.get(&id)?;
        let level = self.levels.get_mut(&price)?;
        let filled = level.apply_fill(id, fill_quantity, fill_price, locked_reduction)?;
        self.order_price.remove(&id);
        self.total_orders = self.total_orders.saturating_sub(1);
        self.drop_if_empty(price);
        Some(filled)
    }

    /// Nonempty levels, best-to-worst for this side.
    pub fn iterate_from_best(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Up to `max` aggregated `(price, quantity, order_count)` triples,
    /// best-to-worst, for snapshot rendering.
    pub fn levels(&self, max: usize) -> Vec<(Decimal, Decimal, usize)> {
        self.iterate_from_best()
            .take(max)
            .map(|level| (level.price(), level.total_quantity(), level.order_count()))
            .collect()
    }
}
