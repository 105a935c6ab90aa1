//! Engine configuration — spec §6 "Configuration".
//!
//! Grounded on the teacher's configurable `OrderBook` fields (`tick_size`,
//! `lot_size`, `fee_schedule`). Spec §6 gives no file/env parsing contract —
//! the embedding application constructs this directly, matching the
//! teacher's pattern of configuring the book through plain struct fields /
//! builder methods rather than a config-file loader.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Tunables shared by every market the engine hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Bound on matchable-iterator consumption per placement.
    pub max_orders_per_match: usize,
    /// Tick size; prices must be multiples of this within `[tick, 1 - tick]`.
    pub min_price_increment: Decimal,
    /// Applied to both sides of each trade.
    pub fee_rate: Decimal,
    /// Over-reservation applied to MARKET order escrow estimates.
    pub market_buffer_pct: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_orders_per_match: 100,
            min_price_increment: dec!(0.01),
            fee_rate: dec!(0.002),
            market_buffer_pct: dec!(0.05),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `price` lies on the tick grid within `[tick, 1 - tick]`
    /// (spec §6 `invalid-price`).
    #[must_use]
    pub fn is_valid_price(&self, price: Decimal) -> bool {
        let tick = self.min_price_increment;
        if price < tick || price > Decimal::ONE - tick {
            return false;
        }
        (price / tick).fract().is_zero()
    }

    #[must_use]
    pub fn is_valid_quantity(&self, quantity: Decimal) -> bool {
        quantity > Decimal::ZERO
    }
}
