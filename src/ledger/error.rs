//! Ledger error types — spec §7 error taxonomy, ledger-facing subset.

use crate::ids::AgentId;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LedgerError {
    /// A wallet already exists for this agent (`create_wallet`).
    WalletAlreadyExists(AgentId),

    /// Operation on a non-existent wallet. Fatal to the call; indicates a
    /// caller bug (spec §7).
    UnknownWallet(AgentId),

    /// `release`/`transfer_to_trade_escrow` would move more than is
    /// currently locked. Fatal; indicates an engine/ledger bug (spec §7).
    InsufficientLocked { agent: AgentId, requested: rust_decimal::Decimal, locked: rust_decimal::Decimal },

    /// A deposit/withdraw/lock/release amount was zero or negative.
    NonPositiveAmount,

    /// `withdraw` requested more than `available`. Recoverable; not the same
    /// path as `lock`'s rejection (spec §4.5 distinguishes the two).
    InsufficientAvailable { agent: AgentId, requested: rust_decimal::Decimal, available: rust_decimal::Decimal },

    /// `deposit_from_external` replayed a previously observed `session_id`.
    /// Recoverable; the caller treats this as a success-noop (spec §7).
    DuplicateSession(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::WalletAlreadyExists(agent) => {
                write!(f, "wallet already exists for agent {agent}")
            }
            LedgerError::UnknownWallet(agent) => write!(f, "no wallet for agent {agent}"),
            LedgerError::InsufficientLocked { agent, requested, locked } => write!(
                f,
                "agent {agent} has {locked} locked, cannot move {requested}"
            ),
            LedgerError::NonPositiveAmount => write!(f, "amount must be positive"),
            LedgerError::InsufficientAvailable { agent, requested, available } => write!(
                f,
                "agent {agent} has {available} available, cannot withdraw {requested}"
            ),
            LedgerError::DuplicateSession(session_id) => {
                write!(f, "external deposit session {session_id} already processed")
            }
        }
    }
}

impl std::error::Error for LedgerError {}
