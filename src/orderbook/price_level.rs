//! Price-level FIFO queue — spec component 4.1.
//!
//! Holds every resident order at a single price, in arrival order. Grounded on
//! the teacher crate's `PriceLevel` (see its `README`/`lib.rs` description of the
//! "hybrid" design: a map keyed by order id for O(1) lookup, plus a queue that
//! carries only ids to preserve FIFO order). The teacher's version used
//! `dashmap::DashMap` + `crossbeam::queue::SegQueue` because its book is
//! lock-free and multi-writer; this engine's concurrency model (spec §5) treats
//! one book as a single serialized actor, so a plain `HashMap` + `VecDeque`
//! gives the same O(1)-head, O(k)-targeted-removal contract without the
//! lock-free machinery the teacher needed.

use crate::ids::OrderId;
use crate::order::Order;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};

/// All orders resident at one price, for one side of one book.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Decimal,
    arrival: VecDeque<OrderId>,
    residents: HashMap<OrderId, Order>,
    total_quantity: Decimal,
}

impl PriceLevel {
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            arrival: VecDeque::new(),
            residents: HashMap::new(),
            total_quantity: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn total_quantity(&self) -> Decimal {
        self.total_quantity
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.residents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    /// Appends `order` to the tail. Precondition: `order.id` is not already
    /// resident (the book's order-id index is the source of truth for that).
    pub fn push(&mut self, order: Order) {
        debug_assert!(!self.residents.contains_key(&order.id));
        self.total_quantity += order.remaining_quantity;
        self.arrival.push_back(order.id);
        self.residents.insert(order.id, order);
    }

    /// Removes and returns the head of the FIFO queue.
    pub fn pop_front(&mut self) -> Option<Order> {
        let id = self.arrival.pop_front()?;
        let order = self.residents.remove(&id);
        if let Some(order) = &order {
            self.total_quantity -= order.remaining_quantity;
        }
        order
    }

    #[must_use]
    pub fn peek_front(&self) -> Option<&Order> {
        let id = self.arrival.front()?;
        self.residents.get(id)
    }

    /// Removes a specific resident by id, wherever it sits in the queue.
    /// O(k) in the level's current size — the "rare path" spec §4.1 allows.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let order = self.residents.remove(&id)?;
        if let Some(pos) = self.arrival.iter().position(|&queued| queued == id) {
            self.arrival.remove(pos);
        }
        self.total_quantity -= order.remaining_quantity;
        Some(order)
    }

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.residents.get(&id)
    }

    /// Adjusts `remaining` for a resident order in place, keeping the cached
    /// `total_quantity` consistent. Callers must remove the order themselves
    /// when `new_remaining <= 0` (spec §4.1).
    pub fn update_remaining(&mut self, id: OrderId, new_remaining: Decimal) {
        if let Some(order) = self.residents.get_mut(&id) {
            let delta = new_remaining - order.remaining_quantity;
            order.remaining_quantity = new_remaining;
            self.total_quantity += delta;
        }
    }

    /// Yields residents in FIFO (arrival) order.
    pub fn iterate(&self) -> impl Iterator<Item = &Order> {
        self.arrival.iter().filter_map(|id| self.residents.get(id))
    }

    /// Applies a fill to a specific resident in place (spec §4.6 matching
    /// loop, step 5): advances the order's `filled`/`remaining`/
    /// `average_fill_price`/status, shrinks its outstanding escrow
    /// reservation by `locked_reduction` (the slice just transferred to trade
    /// escrow), and keeps the cached `total_quantity` in sync. Returns the
    /// order if the fill completed it (so the caller can pop it from the
    /// FIFO queue too), `None` if it is still resident.
    pub fn apply_fill(
        &mut self,
        id: OrderId,
        fill_quantity: Decimal,
        fill_price: Decimal,
        locked_reduction: Decimal,
    ) -> Option<Order> {
        let order = self.residents.get_mut(&id)?;
        order.apply_fill(fill_quantity, fill_price);
        order.reduce_locked(locked_reduction);
        self.total_quantity -= fill_quantity;
        if order.remaining_quantity.is_zero() {
            return self.remove(id);
        }
        None
    }
}
