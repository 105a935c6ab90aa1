//! Wallet balances — spec §3 "Wallet".

use crate::ids::AgentId;
use crate::order::{TimestampMs, now_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One agent's balance: `available` is spendable, `locked` is reserved as
/// collateral for open orders. Invariant: both are non-negative at all times
/// (spec §3, §8 property 2); their sum changes only through recorded
/// transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub agent: AgentId,
    pub available: Decimal,
    pub locked: Decimal,
    pub created_at: TimestampMs,
    pub updated_at: TimestampMs,
}

impl Wallet {
    #[must_use]
    pub fn new(agent: AgentId, initial: Decimal) -> Self {
        let now = now_millis();
        Self {
            agent,
            available: initial,
            locked: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.available + self.locked
    }

    pub(super) fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}
