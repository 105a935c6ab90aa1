//! Per-trade escrow record — spec §3 "Trade escrow".

use crate::ids::TradeId;
use crate::order::{TimestampMs, now_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accumulated buyer/seller contributions for one trade, held until market
/// settlement. Invariant: once a trade exists its escrow entry exists and is
/// never decreased until settlement (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeEscrow {
    pub trade: TradeId,
    pub buyer_contribution: Decimal,
    pub seller_contribution: Decimal,
    pub created_at: TimestampMs,
}

impl TradeEscrow {
    #[must_use]
    pub fn new(trade: TradeId) -> Self {
        Self {
            trade,
            buyer_contribution: Decimal::ZERO,
            seller_contribution: Decimal::ZERO,
            created_at: now_millis(),
        }
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.buyer_contribution + self.seller_contribution
    }
}
