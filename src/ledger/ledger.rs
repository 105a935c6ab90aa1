//! Escrow ledger — spec component 4.5. The only writer of wallet balances.
//!
//! Grounded on the teacher pack's `openibank-escrow`/`openibank-wallet`
//! crates (`Arc<RwLock<HashMap<...>>>` state, async methods returning a
//! crate `Result`) rather than the orderbook teacher, which has no wallet
//! concept at all. Per-wallet serialization (spec §5) is modeled with a
//! `DashMap<AgentId, tokio::sync::Mutex<WalletState>>`: `DashMap` gives O(1)
//! concurrent access to the wallet table itself (the same role it plays for
//! order-id lookups in the orderbook teacher), and the inner
//! `tokio::sync::Mutex` totally orders mutations to one agent's balance
//! without blocking unrelated wallets.

use crate::ids::{AgentId, TradeId, TransactionId};
use crate::ledger::error::LedgerError;
use crate::ledger::escrow::TradeEscrow;
use crate::ledger::transaction::{Transaction, TransactionKind, TransactionReference};
use crate::ledger::wallet::Wallet;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct WalletState {
    wallet: Wallet,
    transactions: Vec<Transaction>,
}

/// Outcome of [`EscrowLedger::lock`]. Spec §4.5: "this is the one operation
/// that returns a result variant rather than signaling a fault, because the
/// engine treats insufficient funds as a placement rejection rather than an
/// exception." Every other precondition violation on `lock` (unknown wallet,
/// non-positive amount) is still a fatal `Err(LedgerError)`.
#[derive(Debug, Clone, PartialEq)]
pub enum LockOutcome {
    Locked {
        locked_amount: Decimal,
        transaction_id: TransactionId,
    },
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },
}

impl LockOutcome {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, LockOutcome::Locked { .. })
    }
}

/// `{available, locked, total}` — spec §6 `get_balance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub available: Decimal,
    pub locked: Decimal,
    pub total: Decimal,
}

/// Wallet balances, locked funds, per-trade escrow, and the append-only
/// transaction log. See spec §4.5 for the full operation contract.
pub struct EscrowLedger {
    wallets: DashMap<AgentId, Mutex<WalletState>>,
    trade_escrows: DashMap<TradeId, TradeEscrow>,
    external_sessions: DashMap<String, TransactionId>,
}

impl Default for EscrowLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl EscrowLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wallets: DashMap::new(),
            trade_escrows: DashMap::new(),
            external_sessions: DashMap::new(),
        }
    }

    fn require_positive(amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Creates a wallet for `agent`. Fails if one already exists. Records a
    /// `DEPOSIT` transaction if `initial > 0`.
    pub async fn create_wallet(&self, agent: AgentId, initial: Decimal) -> Result<(), LedgerError> {
        if self.wallets.contains_key(&agent) {
            return Err(LedgerError::WalletAlreadyExists(agent));
        }
        let wallet = Wallet::new(agent.clone(), initial);
        let mut transactions = Vec::new();
        if initial > Decimal::ZERO {
            transactions.push(Transaction::new(
                agent.clone(),
                TransactionKind::Deposit,
                initial,
                Decimal::ZERO,
                initial,
                None,
                "initial deposit on wallet creation",
            ));
        }
        self.wallets.insert(agent.clone(), Mutex::new(WalletState { wallet, transactions }));
        debug!(%agent, %initial, "wallet created");
        Ok(())
    }

    async fn with_wallet<T>(
        &self,
        agent: &AgentId,
        f: impl FnOnce(&mut WalletState) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let entry = self
            .wallets
            .get(agent)
            .ok_or_else(|| LedgerError::UnknownWallet(agent.clone()))?;
        let mut state = entry.lock().await;
        f(&mut state)
    }

    /// Credits `available`. Requires `amount > 0` and an existing wallet.
    pub async fn deposit(
        &self,
        agent: &AgentId,
        amount: Decimal,
        description: impl Into<String> + Send,
    ) -> Result<TransactionId, LedgerError> {
        Self::require_positive(amount)?;
        let description = description.into();
        self.with_wallet(agent, |state| {
            let before = state.wallet.available;
            state.wallet.available += amount;
            state.wallet.touch();
            let tx = Transaction::new(
                agent.clone(),
                TransactionKind::Deposit,
                amount,
                before,
                state.wallet.available,
                None,
                description,
            );
            let id = tx.id;
            state.transactions.push(tx);
            Ok(id)
        })
        .await
    }

    /// Debits `available`. Requires `amount > 0` and `available >= amount`.
    pub async fn withdraw(
        &self,
        agent: &AgentId,
        amount: Decimal,
        description: impl Into<String> + Send,
    ) -> Result<TransactionId, LedgerError> {
        Self::require_positive(amount)?;
        let description = description.into();
        let agent_owned = agent.clone();
        self.with_wallet(agent, |state| {
            if state.wallet.available < amount {
                return Err(LedgerError::InsufficientAvailable {
                    agent: agent_owned.clone(),
                    requested: amount,
                    available: state.wallet.available,
                });
            }
            let before = state.wallet.available;
            state.wallet.available -= amount;
            state.wallet.touch();
            let tx = Transaction::new(
                agent_owned.clone(),
                TransactionKind::Withdrawal,
                -amount,
                before,
                state.wallet.available,
                None,
                description,
            );
            let id = tx.id;
            state.transactions.push(tx);
            Ok(id)
        })
        .await
    }

    /// Idempotent at the granularity of `session_id`: a replayed id fails
    /// with `DuplicateSession` and no side effects. The session id is
    /// recorded *before* the credit; the credit auto-creates the wallet if
    /// absent (spec §4.5).
    pub async fn deposit_from_external(
        &self,
        agent: AgentId,
        amount: Decimal,
        session_id: impl Into<String>,
    ) -> Result<TransactionId, LedgerError> {
        Self::require_positive(amount)?;
        let session_id = session_id.into();

        // Reserve the session id first so a second caller racing on the same
        // id sees DuplicateSession rather than a double credit.
        let reservation = self.external_sessions.entry(session_id.clone());
        if matches!(reservation, dashmap::mapref::entry::Entry::Occupied(_)) {
            return Err(LedgerError::DuplicateSession(session_id));
        }

        if !self.wallets.contains_key(&agent) {
            self.create_wallet(agent.clone(), Decimal::ZERO).await?;
        }

        let description = format!("external deposit session {session_id}");
        let transaction_id = self.deposit(&agent, amount, description).await?;
        reservation.or_insert(transaction_id);
        info!(%agent, %amount, %session_id, "external deposit applied");
        Ok(transaction_id)
    }

    /// Moves `amount` from `available` to `locked`. The sole recoverable
    /// path: insufficient funds returns `Ok(LockOutcome::InsufficientFunds)`
    /// rather than an `Err` (spec §4.5, §7).
    pub async fn lock(
        &self,
        agent: &AgentId,
        amount: Decimal,
        ref_type: &str,
        ref_id: Option<&str>,
    ) -> Result<LockOutcome, LedgerError> {
        Self::require_positive(amount)?;
        let reference = ref_id.map(|id| TransactionReference::new(ref_type, id));
        self.with_wallet(agent, |state| {
            if state.wallet.available < amount {
                return Ok(LockOutcome::InsufficientFunds {
                    available: state.wallet.available,
                    requested: amount,
                });
            }
            let before = state.wallet.available;
            state.wallet.available -= amount;
            state.wallet.locked += amount;
            state.wallet.touch();
            let tx = Transaction::new(
                agent.clone(),
                TransactionKind::EscrowLock,
                -amount,
                before,
                state.wallet.available,
                reference,
                "escrow lock",
            );
            let transaction_id = tx.id;
            state.transactions.push(tx);
            Ok(LockOutcome::Locked { locked_amount: amount, transaction_id })
        })
        .await
    }

    /// Moves `amount` from `locked` back to `available`. Requires `amount >
    /// 0` and `locked >= amount`; a shortfall is an `InsufficientLocked`
    /// fault (engine/ledger bug, not a placement rejection).
    pub async fn release(
        &self,
        agent: &AgentId,
        amount: Decimal,
        ref_type: &str,
        ref_id: Option<&str>,
    ) -> Result<TransactionId, LedgerError> {
        Self::require_positive(amount)?;
        let reference = ref_id.map(|id| TransactionReference::new(ref_type, id));
        let agent_owned = agent.clone();
        self.with_wallet(agent, |state| {
            if state.wallet.locked < amount {
                return Err(LedgerError::InsufficientLocked {
                    agent: agent_owned.clone(),
                    requested: amount,
                    locked: state.wallet.locked,
                });
            }
            let before = state.wallet.available;
            state.wallet.locked -= amount;
            state.wallet.available += amount;
            state.wallet.touch();
            let tx = Transaction::new(
                agent_owned.clone(),
                TransactionKind::EscrowRelease,
                amount,
                before,
                state.wallet.available,
                reference,
                "escrow release",
            );
            let id = tx.id;
            state.transactions.push(tx);
            Ok(id)
        })
        .await
    }

    /// Debits `locked` directly (total wallet value falls by `amount`) and
    /// upserts the trade-escrow record, accumulating the contribution.
    pub async fn transfer_to_trade_escrow(
        &self,
        agent: &AgentId,
        amount: Decimal,
        trade: TradeId,
        is_buyer: bool,
    ) -> Result<TransactionId, LedgerError> {
        Self::require_positive(amount)?;
        let agent_owned = agent.clone();
        let transaction_id = self
            .with_wallet(agent, |state| {
                if state.wallet.locked < amount {
                    return Err(LedgerError::InsufficientLocked {
                        agent: agent_owned.clone(),
                        requested: amount,
                        locked: state.wallet.locked,
                    });
                }
                let before = state.wallet.available;
                state.wallet.locked -= amount;
                state.wallet.touch();
                let tx = Transaction::new(
                    agent_owned.clone(),
                    TransactionKind::TradeDebit,
                    -amount,
                    before,
                    before, // available is untouched by a trade debit
                    Some(TransactionReference::new("trade", trade.to_string())),
                    "trade escrow contribution",
                );
                let id = tx.id;
                state.transactions.push(tx);
                Ok(id)
            })
            .await?;

        self.trade_escrows
            .entry(trade)
            .and_modify(|escrow| {
                if is_buyer {
                    escrow.buyer_contribution += amount;
                } else {
                    escrow.seller_contribution += amount;
                }
            })
            .or_insert_with(|| {
                let mut escrow = TradeEscrow::new(trade);
                if is_buyer {
                    escrow.buyer_contribution = amount;
                } else {
                    escrow.seller_contribution = amount;
                }
                escrow
            });

        Ok(transaction_id)
    }

    /// Credits `winner`'s `available` by `payout`; appends a
    /// `SETTLEMENT_PAYOUT` to both winner and loser (a zero-amount record on
    /// the loser preserves the audit trail).
    pub async fn settle_position(
        &self,
        winner: &AgentId,
        loser: &AgentId,
        payout: Decimal,
        market_id: &str,
    ) -> Result<(TransactionId, TransactionId), LedgerError> {
        let reference = TransactionReference::new("market", market_id);
        let winner_tx = self
            .with_wallet(winner, |state| {
                let before = state.wallet.available;
                state.wallet.available += payout;
                state.wallet.touch();
                let tx = Transaction::new(
                    winner.clone(),
                    TransactionKind::SettlementPayout,
                    payout,
                    before,
                    state.wallet.available,
                    Some(reference.clone()),
                    "settlement payout",
                );
                let id = tx.id;
                state.transactions.push(tx);
                Ok(id)
            })
            .await?;

        let loser_tx = self
            .with_wallet(loser, |state| {
                let before = state.wallet.available;
                let tx = Transaction::new(
                    loser.clone(),
                    TransactionKind::SettlementPayout,
                    Decimal::ZERO,
                    before,
                    before,
                    Some(reference.clone()),
                    "settlement payout (losing side, audit record)",
                );
                let id = tx.id;
                state.transactions.push(tx);
                Ok(id)
            })
            .await?;

        info!(%winner, %loser, %payout, %market_id, "position settled");
        Ok((winner_tx, loser_tx))
    }

    pub async fn get_balance(&self, agent: &AgentId) -> Result<Balance, LedgerError> {
        self.with_wallet(agent, |state| {
            Ok(Balance {
                available: state.wallet.available,
                locked: state.wallet.locked,
                total: state.wallet.total(),
            })
        })
        .await
    }

    pub async fn get_transactions(&self, agent: &AgentId, limit: usize) -> Result<Vec<Transaction>, LedgerError> {
        self.with_wallet(agent, |state| {
            let len = state.transactions.len();
            let start = len.saturating_sub(limit);
            Ok(state.transactions[start..].to_vec())
        })
        .await
    }

    #[must_use]
    pub fn get_trade_escrow(&self, trade: TradeId) -> Option<TradeEscrow> {
        self.trade_escrows.get(&trade).map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn agent(name: &str) -> AgentId {
        AgentId::from(name)
    }

    #[tokio::test]
    async fn lock_then_release_restores_balances_exactly() {
        let ledger = EscrowLedger::new();
        let a = agent("a");
        ledger.create_wallet(a.clone(), dec!(1000)).await.unwrap();

        ledger.lock(&a, dec!(60), "order", Some("o1")).await.unwrap();
        let mid = ledger.get_balance(&a).await.unwrap();
        assert_eq!(mid.available, dec!(940));
        assert_eq!(mid.locked, dec!(60));

        ledger.release(&a, dec!(60), "order", Some("o1")).await.unwrap();
        let after = ledger.get_balance(&a).await.unwrap();
        assert_eq!(after.available, dec!(1000));
        assert_eq!(after.locked, Decimal::ZERO);

        let txs = ledger.get_transactions(&a, 10).await.unwrap();
        // initial deposit + lock + release = 3 transactions
        assert_eq!(txs.len(), 3);
    }

    #[tokio::test]
    async fn lock_with_insufficient_funds_is_a_recoverable_outcome_not_an_error() {
        let ledger = EscrowLedger::new();
        let a = agent("a");
        ledger.create_wallet(a.clone(), dec!(10)).await.unwrap();

        let outcome = ledger.lock(&a, dec!(60), "order", None).await.unwrap();
        assert!(!outcome.is_locked());
        let balance = ledger.get_balance(&a).await.unwrap();
        assert_eq!(balance.available, dec!(10));
    }

    #[tokio::test]
    async fn deposit_from_external_is_idempotent_per_session() {
        let ledger = EscrowLedger::new();
        let a = agent("a");

        let first = ledger.deposit_from_external(a.clone(), dec!(500), "sess-42").await;
        assert!(first.is_ok());

        let second = ledger.deposit_from_external(a.clone(), dec!(500), "sess-42").await;
        assert_eq!(second, Err(LedgerError::DuplicateSession("sess-42".to_string())));

        let balance = ledger.get_balance(&a).await.unwrap();
        assert_eq!(balance.available, dec!(500));
    }

    #[tokio::test]
    async fn operations_on_unknown_wallet_are_fatal() {
        let ledger = EscrowLedger::new();
        let a = agent("ghost");
        let err = ledger.deposit(&a, dec!(10), "x").await.unwrap_err();
        assert_eq!(err, LedgerError::UnknownWallet(a));
    }

    #[tokio::test]
    async fn transfer_to_trade_escrow_accumulates_both_sides() {
        let ledger = EscrowLedger::new();
        let buyer = agent("buyer");
        let seller = agent("seller");
        ledger.create_wallet(buyer.clone(), dec!(1000)).await.unwrap();
        ledger.create_wallet(seller.clone(), dec!(1000)).await.unwrap();
        ledger.lock(&buyer, dec!(60), "order", None).await.unwrap();
        ledger.lock(&seller, dec!(40), "order", None).await.unwrap();

        let trade = TradeId::new();
        ledger.transfer_to_trade_escrow(&buyer, dec!(60), trade, true).await.unwrap();
        ledger.transfer_to_trade_escrow(&seller, dec!(40), trade, false).await.unwrap();

        let escrow = ledger.get_trade_escrow(trade).unwrap();
        assert_eq!(escrow.buyer_contribution, dec!(60));
        assert_eq!(escrow.seller_contribution, dec!(40));
        assert_eq!(escrow.total(), dec!(100));

        let buyer_balance = ledger.get_balance(&buyer).await.unwrap();
        assert_eq!(buyer_balance.locked, Decimal::ZERO);
        assert_eq!(buyer_balance.available, dec!(940));
    }

    #[tokio::test]
    async fn settle_position_pays_winner_and_records_loser_audit_entry() {
        let ledger = EscrowLedger::new();
        let winner = agent("winner");
        let loser = agent("loser");
        ledger.create_wallet(winner.clone(), Decimal::ZERO).await.unwrap();
        ledger.create_wallet(loser.clone(), Decimal::ZERO).await.unwrap();

        ledger.settle_position(&winner, &loser, dec!(100), "market-1").await.unwrap();

        assert_eq!(ledger.get_balance(&winner).await.unwrap().available, dec!(100));
        assert_eq!(ledger.get_balance(&loser).await.unwrap().available, Decimal::ZERO);
        let loser_txs = ledger.get_transactions(&loser, 10).await.unwrap();
        assert!(loser_txs.iter().any(|tx| tx.kind == TransactionKind::SettlementPayout));
    }
}
