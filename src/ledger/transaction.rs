//! Immutable transaction log — spec §3 "Transaction".

use crate::ids::{AgentId, TransactionId};
use crate::order::{TimestampMs, now_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of balance-changing event a [`Transaction`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    EscrowLock,
    EscrowRelease,
    TradeDebit,
    SettlementPayout,
}

/// What a transaction's `reference` points at — another record's kind and id,
/// recorded as opaque strings so the ledger doesn't need to know about trades
/// or sessions directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReference {
    pub kind: String,
    pub id: String,
}

impl TransactionReference {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// An append-only, never-mutated record of one balance change to `available`
/// for a wallet. `amount` is signed: positive credits, negative debits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub agent: AgentId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub available_before: Decimal,
    pub available_after: Decimal,
    pub reference: Option<TransactionReference>,
    pub description: String,
    pub created_at: TimestampMs,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        agent: AgentId,
        kind: TransactionKind,
        amount: Decimal,
        available_before: Decimal,
        available_after: Decimal,
        reference: Option<TransactionReference>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            agent,
            kind,
            amount,
            available_before,
            available_after,
            reference,
            description: description.into(),
            created_at: now_millis(),
        }
    }
}
