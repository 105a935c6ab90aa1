//! Book snapshot format — spec §6 "Book snapshot format".

use super::iterators::LevelInfo;
use crate::ids::MarketId;
use crate::order::{Outcome, TimestampMs, now_millis};
use serde::{Deserialize, Serialize};

/// `{market, outcome, bids, asks, timestamp}`. Bids are best-first
/// (descending price), asks are best-first (ascending price). Empty levels
/// are never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub market: MarketId,
    pub outcome: Outcome,
    pub bids: Vec<LevelInfo>,
    pub asks: Vec<LevelInfo>,
    pub timestamp: TimestampMs,
}

impl OrderBookSnapshot {
    pub fn new(market: MarketId, outcome: Outcome, bids: Vec<LevelInfo>, asks: Vec<LevelInfo>) -> Self {
        Self {
            market,
            outcome,
            bids,
            asks,
            timestamp: now_millis(),
        }
    }
}
