//! Trading fee schedule — spec §4.6 "fees apply to both sides at a
//! configured rate (default 0.2%)".
//!
//! The teacher's `FeeSchedule` (`orderbook/fees.rs`) carries independent
//! maker/taker basis-point rates with rebate support, since general-purpose
//! exchanges commonly rebate makers. Spec §4.6 asks for a single flat rate
//! charged to both counterparties of every trade, so this schedule drops the
//! maker/taker split but keeps the teacher's basis-points representation and
//! rounding discipline.

use rust_decimal::Decimal;
use rust_decimal::prelude::RoundingStrategy;
use serde::{Deserialize, Serialize};

/// A flat fee rate applied to both sides of every trade.
///
/// Spec §9 requires fee rounding to be deterministic so the conservation law
/// reproduces exactly: fees round up to the nearest `rounding_increment`
/// (the tick size, by convention), charged to each side independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee rate as a fraction of notional, e.g. `0.002` for 20 bps.
    pub rate: Decimal,
}

impl FeeSchedule {
    #[must_use]
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self { rate: Decimal::ZERO }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rate.is_zero()
    }

    /// Fee owed on a given notional (`price * quantity`), rounded up to the
    /// nearest multiple of `rounding_increment` so two parties charged on the
    /// same notional never disagree by a fraction of a sub-unit.
    #[must_use]
    pub fn calculate_fee(&self, notional: Decimal, rounding_increment: Decimal) -> Decimal {
        let raw = notional * self.rate;
        if rounding_increment.is_zero() {
            return raw;
        }
        (raw / rounding_increment)
            .round_dp_with_strategy(0, RoundingStrategy::AwayFromZero)
            * rounding_increment
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(Decimal::new(2, 3)) // 0.002 == 20 bps, spec default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_rate_is_twenty_basis_points() {
        assert_eq!(FeeSchedule::default().rate, dec!(0.002));
    }

    #[test]
    fn fee_rounds_up_to_the_nearest_increment() {
        let schedule = FeeSchedule::new(dec!(0.002));
        // notional 60 * 0.002 = 0.12, already on the 0.01 grid.
        assert_eq!(schedule.calculate_fee(dec!(60), dec!(0.01)), dec!(0.12));
        // notional 33 * 0.002 = 0.066 -> rounds up to 0.07.
        assert_eq!(schedule.calculate_fee(dec!(33), dec!(0.01)), dec!(0.07));
    }

    #[test]
    fn zero_schedule_charges_nothing() {
        let schedule = FeeSchedule::zero();
        assert!(schedule.is_zero());
        assert_eq!(schedule.calculate_fee(dec!(1000), dec!(0.01)), Decimal::ZERO);
    }
}
