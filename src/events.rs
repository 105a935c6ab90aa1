//! Event bus collaborator — spec §6 "Egress — events".
//!
//! Generalizes the teacher's `TradeListener = Arc<dyn Fn(&TradeResult) + Send
//! + Sync>` callback (`orderbook/trade.rs`) into a trait with three typed
//! variants and an in-memory `tokio::sync::broadcast`-backed implementation,
//! matching the teacher's `BookManagerTokio` (`manager.rs`) choice of async
//! broadcast fan-out over a raw callback list. [`CallbackTradePublisher`]
//! keeps the original single-callback shape available as an alternate
//! `EventPublisher` for callers that only care about trades.

use crate::order::Order;
use crate::orderbook::{Trade, TradeListener};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// One of the three lifecycle events the engine emits (spec §6).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Emitted exactly once per accepted placement, after the trade cycle and
    /// every `TradesExecuted` for that placement.
    OrdersCreated { order: Order, trades: Vec<Trade> },
    /// Emitted once per trade, before the placement's `OrdersCreated`.
    TradesExecuted { trade: Trade },
    /// Emitted once per successful cancellation.
    OrdersCancelled { order: Order },
}

/// Best-effort at-least-once delivery from the engine's perspective (spec
/// §6): publication failures (e.g. no subscribers) never roll back engine
/// state, since the trade cycle has already completed by the time an event
/// is published.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: Event);
}

/// A `tokio::sync::broadcast`-backed bus for tests and demos. Dropped
/// messages (slow/absent subscribers) are logged and otherwise ignored,
/// matching the "best-effort" contract.
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<Arc<Event>>,
}

impl BroadcastEventPublisher {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Event>> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventPublisher for BroadcastEventPublisher {
    fn publish(&self, event: Event) {
        if self.sender.send(Arc::new(event)).is_err() {
            trace!("event published with no active subscribers");
        }
    }
}

/// A publisher that drops every event, for callers that don't need the bus
/// (e.g. scenario tests that only inspect return values).
#[derive(Debug, Default)]
pub struct NullEventPublisher;

impl EventPublisher for NullEventPublisher {
    fn publish(&self, _event: Event) {}
}

/// An `EventPublisher` that forwards only `TradesExecuted` trades to a plain
/// [`TradeListener`] callback, for callers that want the teacher's original
/// single-callback shape (`orderbook/trade.rs`'s `TradeListener`) instead of
/// subscribing to the full three-variant `Event` enum.
pub struct CallbackTradePublisher {
    listener: TradeListener,
}

impl CallbackTradePublisher {
    #[must_use]
    pub fn new(listener: TradeListener) -> Self {
        Self { listener }
    }
}

impl EventPublisher for CallbackTradePublisher {
    fn publish(&self, event: Event) {
        if let Event::TradesExecuted { trade } = &event {
            (self.listener)(trade);
        }
    }
}
