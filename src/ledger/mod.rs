//! Escrow ledger — spec component 4.5: wallets, the transaction log, and
//! per-trade escrow accumulation.

mod error;
mod escrow;
mod ledger;
mod transaction;
mod wallet;

pub use error::LedgerError;
pub use escrow::TradeEscrow;
pub use ledger::{Balance, EscrowLedger, LockOutcome};
pub use transaction::{Transaction, TransactionKind, TransactionReference};
pub use wallet::Wallet;
