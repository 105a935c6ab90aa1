//! Trade record and trade-event listener — spec §3 "Trade".

use crate::ids::{AgentId, MarketId, OrderId, TradeId};
use crate::order::{Outcome, TimestampMs, now_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One executed match between a resting (maker) and an incoming (taker)
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub market: MarketId,
    pub outcome: Outcome,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: AgentId,
    pub seller: AgentId,
    pub price: Decimal,
    pub quantity: Decimal,
    pub buyer_fee: Decimal,
    pub seller_fee: Decimal,
    pub settled: bool,
    pub executed_at: TimestampMs,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market: MarketId,
        outcome: Outcome,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buyer: AgentId,
        seller: AgentId,
        price: Decimal,
        quantity: Decimal,
        buyer_fee: Decimal,
        seller_fee: Decimal,
    ) -> Self {
        Self {
            id: TradeId::new(),
            market,
            outcome,
            buy_order_id,
            sell_order_id,
            buyer,
            seller,
            price,
            quantity,
            buyer_fee,
            seller_fee,
            settled: false,
            executed_at: now_millis(),
        }
    }
}

/// Listener invoked for every trade, following the teacher's
/// `TradeListener = Arc<dyn Fn(&TradeResult) + Send + Sync>` callback shape
/// (`orderbook/trade.rs`). [`crate::events`] generalizes this to the full
/// `orders.created` / `orders.cancelled` / `trades.executed` event set, and
/// also accepts a raw `TradeListener` via
/// [`crate::events::CallbackTradePublisher`] for callers that want the
/// original single-callback shape.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;
