//! The matching engine — spec component 4.6.
//!
//! Grounded on the teacher's `BookManagerTokio` (`orderbook/manager.rs`) for
//! the "one `tokio::sync::Mutex` per managed book, looked up through a
//! concurrent map" shape; the matching algorithm itself (placement, the
//! matching loop, per-trade escrow moves, cancellation) has no teacher
//! analogue — the teacher's engine never touches a ledger — so it is built
//! directly from the component contract, using the teacher's book/iterator
//! primitives as the substrate.

use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::events::{Event, EventPublisher};
use crate::ids::{AgentId, MarketId, OrderId};
use crate::ledger::{Balance, EscrowLedger, LedgerError, LockOutcome, Transaction};
use crate::market::Market;
use crate::order::{Order, OrderAttachment, OrderStatus, OrderType, Outcome, Side, now_millis};
use crate::orderbook::{FeeSchedule, OrderBook, OrderBookSnapshot, Trade};
use dashmap::DashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Request fields for [`MatchingEngine::place_order`] (spec §6).
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub side: Side,
    pub outcome: Outcome,
    pub order_type: OrderType,
    pub price: Option<Decimal>,
    pub quantity: Decimal,
    pub client_order_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// `{order, match_result}` — the accepted placement's final order plus the
/// trades it produced, in execution order.
#[derive(Debug, Clone)]
pub struct PlaceOrderResult {
    pub order: Order,
    pub trades: Vec<Trade>,
}

/// `{best_bid, best_ask, spread, mid, last_trade_price}` (spec §6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestPrices {
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub spread: Option<Decimal>,
    pub mid: Option<Decimal>,
    pub last_trade_price: Option<Decimal>,
}

/// Matches incoming orders against resident liquidity and drives escrow
/// moves through the ledger. One instance owns every market it hosts plus
/// the shared ledger (spec §5: the ledger is the only cross-book resource).
pub struct MatchingEngine {
    markets: DashMap<MarketId, Arc<Mutex<Market>>>,
    ledger: EscrowLedger,
    config: EngineConfig,
    fee_schedule: FeeSchedule,
    events: Arc<dyn EventPublisher>,
}

impl MatchingEngine {
    #[must_use]
    pub fn new(config: EngineConfig, events: Arc<dyn EventPublisher>) -> Self {
        Self {
            markets: DashMap::new(),
            ledger: EscrowLedger::new(),
            fee_schedule: FeeSchedule::new(config.fee_rate),
            config,
            events,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &EscrowLedger {
        &self.ledger
    }

    fn market_handle(&self, market: &MarketId) -> Arc<Mutex<Market>> {
        self.markets
            .entry(market.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Market::new(market.clone()))))
            .clone()
    }

    /// Ensures a market's two books exist. Markets are also created lazily
    /// by the first `place_order` against them (spec §4.6 "Unknown market →
    /// the engine lazily creates books; never an error"); this is for
    /// callers who want the side effect up front.
    pub fn initialize_market(&self, market: MarketId) {
        self.market_handle(&market);
    }

    // ---- ledger passthroughs (spec §6 "Ingress — ledger operations") ----

    pub async fn create_wallet(&self, agent: AgentId, initial: Decimal) -> Result<(), LedgerError> {
        self.ledger.create_wallet(agent, initial).await
    }

    pub async fn deposit(&self, agent: &AgentId, amount: Decimal, description: impl Into<String> + Send) -> Result<(), LedgerError> {
        self.ledger.deposit(agent, amount, description).await.map(|_| ())
    }

    pub async fn withdraw(&self, agent: &AgentId, amount: Decimal, description: impl Into<String> + Send) -> Result<(), LedgerError> {
        self.ledger.withdraw(agent, amount, description).await.map(|_| ())
    }

    pub async fn deposit_from_external(&self, agent: AgentId, amount: Decimal, session_id: impl Into<String>) -> Result<(), LedgerError> {
        self.ledger.deposit_from_external(agent, amount, session_id).await.map(|_| ())
    }

    pub async fn get_balance(&self, agent: &AgentId) -> Result<Balance, LedgerError> {
        self.ledger.get_balance(agent).await
    }

    pub async fn get_transactions(&self, agent: &AgentId, limit: usize) -> Result<Vec<Transaction>, LedgerError> {
        self.ledger.get_transactions(agent, limit).await
    }

    // ---- engine operations (spec §6 "Ingress — engine operations") ----

    /// Validates, locks escrow, constructs the order, runs the matching
    /// loop, and settles the order to its terminal/resident state (spec
    /// §4.6 "Placement").
    pub async fn place_order(
        &self,
        agent: AgentId,
        market: MarketId,
        request: PlaceOrderRequest,
    ) -> Result<PlaceOrderResult, EngineError> {
        if !self.config.is_valid_quantity(request.quantity) {
            return Err(EngineError::InvalidQuantity(request.quantity));
        }

        let price = match request.order_type {
            OrderType::Limit => {
                let price = request
                    .price
                    .ok_or(EngineError::InvalidPrice { price: Decimal::ZERO, tick_size: self.config.min_price_increment })?;
                if !self.config.is_valid_price(price) {
                    return Err(EngineError::InvalidPrice { price, tick_size: self.config.min_price_increment });
                }
                Some(price)
            }
            OrderType::Market => None,
        };

        let handle = self.market_handle(&market);
        let mut guard = handle.lock().await;
        let book = guard.book_mut(request.outcome);

        let escrow_required = self.required_escrow(request.side, request.order_type, price, request.quantity, book);

        match self.ledger.lock(&agent, escrow_required, "order", None).await? {
            LockOutcome::Locked { .. } => {}
            LockOutcome::InsufficientFunds { available, requested } => {
                warn!(%agent, %requested, %available, "placement rejected: insufficient funds");
                return Err(EngineError::InsufficientFunds { agent: agent.to_string(), requested, available });
            }
        }

        let mut order = Order::new(
            agent.clone(),
            market.clone(),
            request.side,
            request.outcome,
            request.order_type,
            price,
            request.quantity,
            escrow_required,
            OrderAttachment { client_order_id: request.client_order_id, metadata: request.metadata },
        );

        let trades = self.run_matching_loop(&mut order, book, &market, escrow_required).await?;

        self.settle_terminal_state(&mut order, book).await?;

        info!(order_id = %order.id, %market, status = ?order.status, trade_count = trades.len(), "placement accepted");
        self.events.publish(Event::OrdersCreated { order: order.clone(), trades: trades.clone() });

        Ok(PlaceOrderResult { order, trades })
    }

    fn required_escrow(
        &self,
        side: Side,
        order_type: OrderType,
        price: Option<Decimal>,
        quantity: Decimal,
        book: &OrderBook,
    ) -> Decimal {
        match order_type {
            OrderType::Limit => {
                let price = price.expect("validated by caller");
                let principal = match side {
                    Side::Buy => price * quantity,
                    Side::Sell => (Decimal::ONE - price) * quantity,
                };
                // Headroom for the fee the per-trade escrow move will also
                // draw from `locked` (spec §4.6 "per-trade escrow moves");
                // the bare `price * quantity` formula in the placement step
                // has no room for it, so a literal reading would make the
                // trade-escrow transfer fail on its own first fill whenever
                // the fee rate is nonzero. See DESIGN.md.
                principal * (Decimal::ONE + self.config.fee_rate)
            }
            OrderType::Market => {
                let opposite_best = match side {
                    Side::Buy => book.best_ask(),
                    Side::Sell => book.best_bid(),
                };
                let estimate_price = opposite_best.unwrap_or(match side {
                    Side::Buy => dec!(0.99),
                    Side::Sell => dec!(0.01),
                });
                let principal = match side {
                    Side::Buy => estimate_price * quantity,
                    Side::Sell => (Decimal::ONE - estimate_price) * quantity,
                };
                principal * (Decimal::ONE + self.config.market_buffer_pct)
            }
        }
    }

    /// Drives the matchable iterator to completion for one placement (spec
    /// §4.6 "Matching loop"). Re-derives the iterator fresh each step rather
    /// than holding it across the mutations it triggers, since the iterator
    /// borrows the book immutably while each step needs `&mut book`.
    ///
    /// A MARKET order's `escrow_required` is only an estimate (best opposite
    /// price plus a buffer); walking deep enough into the book can demand
    /// more than was ever locked. Per spec §9 open question 1, this caps
    /// matching at the locked budget rather than topping up from `available`
    /// mid-walk — the recommended resolution, since it never risks moving
    /// more than what `lock` actually reserved.
    async fn run_matching_loop(
        &self,
        order: &mut Order,
        book: &mut OrderBook,
        market: &MarketId,
        escrow_required: Decimal,
    ) -> Result<Vec<Trade>, EngineError> {
        let mut trades = Vec::new();
        let mut taker_locked_consumed = Decimal::ZERO;

        loop {
            if order.remaining_quantity.is_zero() || trades.len() >= self.config.max_orders_per_match {
                break;
            }

            let limit_for_iterator = match order.order_type {
                OrderType::Limit => order.price,
                OrderType::Market => None,
            };

            let next = {
                let mut iter = book.matchable_orders(order.side, limit_for_iterator);
                iter.next().map(|(price, resting)| (price, resting.id, resting.agent.clone(), resting.remaining_quantity))
            };
            let Some((price, resting_id, resting_agent, resting_remaining)) = next else { break };

            let fill_quantity = order.remaining_quantity.min(resting_remaining);

            let (buyer_agent, seller_agent, buy_order_id, sell_order_id) = match order.side {
                Side::Buy => (order.agent.clone(), resting_agent.clone(), order.id, resting_id),
                Side::Sell => (resting_agent.clone(), order.agent.clone(), resting_id, order.id),
            };

            let notional = price * fill_quantity;
            let fee = self.fee_schedule.calculate_fee(notional, self.config.min_price_increment);
            let buyer_contribution = notional + fee;
            let seller_contribution = (Decimal::ONE - price) * fill_quantity + fee;

            let (taker_contribution, maker_contribution) = match order.side {
                Side::Buy => (buyer_contribution, seller_contribution),
                Side::Sell => (seller_contribution, buyer_contribution),
            };

            if order.order_type == OrderType::Market && taker_locked_consumed + taker_contribution > escrow_required {
                break;
            }

            order.apply_fill(fill_quantity, price);
            taker_locked_consumed += taker_contribution;

            book.apply_fill_to_resident(order.side.opposite(), resting_id, fill_quantity, price, maker_contribution);

            let trade = Trade::new(
                market.clone(),
                order.outcome,
                buy_order_id,
                sell_order_id,
                buyer_agent.clone(),
                seller_agent.clone(),
                price,
                fill_quantity,
                fee,
                fee,
            );

            self.ledger.transfer_to_trade_escrow(&buyer_agent, buyer_contribution, trade.id, true).await?;
            self.ledger.transfer_to_trade_escrow(&seller_agent, seller_contribution, trade.id, false).await?;

            book.record_trade(price, fill_quantity);
            self.events.publish(Event::TradesExecuted { trade: trade.clone() });
            trades.push(trade);
        }

        order.reduce_locked(taker_locked_consumed);
        Ok(trades)
    }

    /// Applies the terminal-state rules of spec §4.6 step 6: a MARKET order
    /// with a remainder is always cancelled and its unused escrow released; a
    /// LIMIT order with a remainder rests in the book; anything fully filled
    /// needs neither.
    async fn settle_terminal_state(&self, order: &mut Order, book: &mut OrderBook) -> Result<(), EngineError> {
        if order.remaining_quantity.is_zero() {
            return Ok(());
        }

        match order.order_type {
            OrderType::Market => {
                order.status = OrderStatus::Cancelled;
                order.updated_at = now_millis();
                let release_amount = order.locked_amount;
                if release_amount > Decimal::ZERO {
                    self.ledger.release(&order.agent, release_amount, "order", Some(&order.id.to_string())).await?;
                }
                order.locked_amount = Decimal::ZERO;
            }
            OrderType::Limit => {
                book.add_order(order.clone())?;
            }
        }
        Ok(())
    }

    /// Searches every open market's two books for a resident order matching
    /// both `order_id` and `agent`, releases its locked escrow, and marks it
    /// cancelled (spec §4.6 "Cancellation"). Returns `None` on no match,
    /// which is an absent result, not an error.
    pub async fn cancel_order(&self, order_id: OrderId, agent: &AgentId) -> Result<Option<Order>, EngineError> {
        let handles: Vec<Arc<Mutex<Market>>> = self.markets.iter().map(|entry| entry.value().clone()).collect();

        for handle in handles {
            let mut market = handle.lock().await;
            for outcome in [Outcome::Yes, Outcome::No] {
                let book = market.book_mut(outcome);
                match book.get_order(order_id) {
                    Some(order) if order.agent == *agent => {}
                    _ => continue,
                }
                let mut removed = book.remove_order(order_id).expect("get_order just confirmed residency");
                removed.cancel();
                if removed.locked_amount > Decimal::ZERO {
                    self.ledger.release(agent, removed.locked_amount, "order", Some(&order_id.to_string())).await?;
                }
                info!(order_id = %order_id, %agent, "order cancelled");
                self.events.publish(Event::OrdersCancelled { order: removed.clone() });
                return Ok(Some(removed));
            }
        }
        Ok(None)
    }

    pub async fn get_book_snapshot(&self, market: &MarketId, outcome: Outcome, max_levels: usize) -> Option<OrderBookSnapshot> {
        let handle = self.markets.get(market)?.value().clone();
        let guard = handle.lock().await;
        let book = guard.book(outcome);
        let (bids, asks) = book.levels(max_levels);
        Some(OrderBookSnapshot::new(market.clone(), outcome, bids, asks))
    }

    pub async fn best_prices(&self, market: &MarketId, outcome: Outcome) -> Option<BestPrices> {
        let handle = self.markets.get(market)?.value().clone();
        let guard = handle.lock().await;
        let book = guard.book(outcome);
        Some(BestPrices {
            best_bid: book.best_bid(),
            best_ask: book.best_ask(),
            spread: book.spread(),
            mid: book.mid(),
            last_trade_price: book.last_trade_price(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullEventPublisher;
    use rust_decimal_macros::dec;

    fn engine() -> MatchingEngine {
        MatchingEngine::new(EngineConfig::default(), Arc::new(NullEventPublisher))
    }

    fn limit_request(side: Side, price: Decimal, quantity: Decimal) -> PlaceOrderRequest {
        PlaceOrderRequest {
            side,
            outcome: Outcome::Yes,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity,
            client_order_id: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn full_fill_at_a_single_level_settles_both_sides() {
        let engine = engine();
        let a = AgentId::from("a");
        let b = AgentId::from("b");
        engine.create_wallet(a.clone(), dec!(1000)).await.unwrap();
        engine.create_wallet(b.clone(), dec!(1000)).await.unwrap();
        let market = MarketId::from("m1");

        let sell = engine
            .place_order(a.clone(), market.clone(), limit_request(Side::Sell, dec!(0.60), dec!(100)))
            .await
            .unwrap();
        assert_eq!(sell.order.status, OrderStatus::Open);
        assert!(sell.trades.is_empty());

        let buy = engine
            .place_order(b.clone(), market.clone(), limit_request(Side::Buy, dec!(0.60), dec!(100)))
            .await
            .unwrap();

        assert_eq!(buy.order.status, OrderStatus::Filled);
        assert_eq!(buy.trades.len(), 1);
        assert_eq!(buy.trades[0].price, dec!(0.60));
        assert_eq!(buy.trades[0].quantity, dec!(100));

        let snapshot = engine.get_book_snapshot(&market, Outcome::Yes, 10).await.unwrap();
        assert!(snapshot.bids.is_empty());
        assert!(snapshot.asks.is_empty());

        let best = engine.best_prices(&market, Outcome::Yes).await.unwrap();
        assert_eq!(best.last_trade_price, Some(dec!(0.60)));
    }

    #[tokio::test]
    async fn walking_the_book_stops_at_the_takers_limit_and_rests_the_remainder() {
        let engine = engine();
        let market = MarketId::from("m1");
        let m1 = AgentId::from("m1-maker");
        let m2 = AgentId::from("m2-maker");
        let m3 = AgentId::from("m3-maker");
        let taker = AgentId::from("taker");
        for agent in [&m1, &m2, &m3, &taker] {
            engine.create_wallet(agent.clone(), dec!(10000)).await.unwrap();
        }

        engine.place_order(m1, market.clone(), limit_request(Side::Sell, dec!(0.60), dec!(50))).await.unwrap();
        engine.place_order(m2, market.clone(), limit_request(Side::Sell, dec!(0.62), dec!(40))).await.unwrap();
        engine.place_order(m3, market.clone(), limit_request(Side::Sell, dec!(0.65), dec!(30))).await.unwrap();

        let result = engine
            .place_order(taker, market.clone(), limit_request(Side::Buy, dec!(0.63), dec!(100)))
            .await
            .unwrap();

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.order.status, OrderStatus::Partial);
        assert_eq!(result.order.filled_quantity, dec!(90));
        assert_eq!(result.order.remaining_quantity, dec!(10));

        let expected_avg = (dec!(50) * dec!(0.60) + dec!(40) * dec!(0.62)) / dec!(90);
        assert_eq!(result.order.average_fill_price, Some(expected_avg));

        let best = engine.best_prices(&market, Outcome::Yes).await.unwrap();
        assert_eq!(best.best_bid, Some(dec!(0.63)));
        assert_eq!(best.best_ask, Some(dec!(0.65)));
    }

    #[tokio::test]
    async fn fifo_within_a_price_level_is_earliest_accepted_first() {
        let engine = engine();
        let market = MarketId::from("m1");
        let o1 = AgentId::from("o1");
        let o2 = AgentId::from("o2");
        let seller = AgentId::from("seller");
        for agent in [&o1, &o2, &seller] {
            engine.create_wallet(agent.clone(), dec!(10000)).await.unwrap();
        }

        engine.place_order(o1, market.clone(), limit_request(Side::Buy, dec!(0.50), dec!(50))).await.unwrap();
        engine.place_order(o2.clone(), market.clone(), limit_request(Side::Buy, dec!(0.50), dec!(50))).await.unwrap();

        let sell_request = PlaceOrderRequest {
            side: Side::Sell,
            outcome: Outcome::Yes,
            order_type: OrderType::Limit,
            price: Some(dec!(0.50)),
            quantity: dec!(70),
            client_order_id: None,
            metadata: None,
        };
        let result = engine.place_order(seller, market.clone(), sell_request).await.unwrap();

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].quantity, dec!(50));
        assert_eq!(result.trades[1].quantity, dec!(20));
        assert_eq!(result.trades[1].buyer, o2);

        let snapshot = engine.get_book_snapshot(&market, Outcome::Yes, 10).await.unwrap();
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.bids[0].quantity, dec!(30));
    }

    #[tokio::test]
    async fn underfunded_placement_is_rejected_with_no_order_created() {
        let engine = engine();
        let agent = AgentId::from("poor");
        engine.create_wallet(agent.clone(), dec!(10)).await.unwrap();
        let market = MarketId::from("m1");

        let err = engine
            .place_order(agent.clone(), market.clone(), limit_request(Side::Buy, dec!(0.60), dec!(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds { .. }));

        let balance = engine.get_balance(&agent).await.unwrap();
        assert_eq!(balance.available, dec!(10));
        assert_eq!(balance.locked, Decimal::ZERO);
    }

    #[tokio::test]
    async fn market_order_with_partial_liquidity_cancels_and_releases_the_unused_estimate() {
        let engine = engine();
        let market = MarketId::from("m1");
        let maker = AgentId::from("maker");
        let taker = AgentId::from("taker");
        engine.create_wallet(maker.clone(), dec!(1000)).await.unwrap();
        engine.create_wallet(taker.clone(), dec!(1000)).await.unwrap();

        engine.place_order(maker, market.clone(), limit_request(Side::Sell, dec!(0.70), dec!(10))).await.unwrap();

        let market_request = PlaceOrderRequest {
            side: Side::Buy,
            outcome: Outcome::Yes,
            order_type: OrderType::Market,
            price: None,
            quantity: dec!(100),
            client_order_id: None,
            metadata: None,
        };
        let result = engine.place_order(taker.clone(), market.clone(), market_request).await.unwrap();

        assert_eq!(result.order.status, OrderStatus::Cancelled);
        assert_eq!(result.order.filled_quantity, dec!(10));
        assert_eq!(result.order.average_fill_price, Some(dec!(0.70)));
        assert_eq!(result.trades.len(), 1);

        let balance = engine.get_balance(&taker).await.unwrap();
        assert_eq!(balance.locked, Decimal::ZERO);
    }

    #[tokio::test]
    async fn market_order_walking_past_its_escrow_estimate_stops_rather_than_overdrawing_locked() {
        let engine = engine();
        let market = MarketId::from("m1");
        let cheap_maker = AgentId::from("cheap");
        let expensive_maker = AgentId::from("expensive");
        let taker = AgentId::from("taker");
        engine.create_wallet(cheap_maker.clone(), dec!(1000)).await.unwrap();
        engine.create_wallet(expensive_maker.clone(), dec!(10000)).await.unwrap();
        engine.create_wallet(taker.clone(), dec!(10000)).await.unwrap();

        engine.place_order(cheap_maker, market.clone(), limit_request(Side::Sell, dec!(0.10), dec!(10))).await.unwrap();
        engine.place_order(expensive_maker, market.clone(), limit_request(Side::Sell, dec!(0.95), dec!(1000))).await.unwrap();

        let market_request = PlaceOrderRequest {
            side: Side::Buy,
            outcome: Outcome::Yes,
            order_type: OrderType::Market,
            price: None,
            quantity: dec!(1000),
            client_order_id: None,
            metadata: None,
        };
        let result = engine.place_order(taker.clone(), market.clone(), market_request).await.unwrap();

        // Estimate was built off the 0.10 best ask; walking into the 0.95
        // level would blow well past that budget, so the loop stops after
        // the cheap level instead of draining the taker's locked funds.
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.order.filled_quantity, dec!(10));
        assert_eq!(result.order.status, OrderStatus::Cancelled);

        let balance = engine.get_balance(&taker).await.unwrap();
        assert_eq!(balance.locked, Decimal::ZERO);
    }

    #[tokio::test]
    async fn cancelling_an_unmatched_limit_order_restores_available_exactly() {
        let engine = engine();
        let agent = AgentId::from("a");
        engine.create_wallet(agent.clone(), dec!(1000)).await.unwrap();
        let market = MarketId::from("m1");

        let placed = engine
            .place_order(agent.clone(), market.clone(), limit_request(Side::Buy, dec!(0.40), dec!(50)))
            .await
            .unwrap();
        assert_eq!(placed.order.status, OrderStatus::Open);

        let cancelled = engine.cancel_order(placed.order.id, &agent).await.unwrap();
        assert!(cancelled.is_some());
        assert_eq!(cancelled.unwrap().status, OrderStatus::Cancelled);

        let balance = engine.get_balance(&agent).await.unwrap();
        assert_eq!(balance.available, dec!(1000));
        assert_eq!(balance.locked, Decimal::ZERO);

        let snapshot = engine.get_book_snapshot(&market, Outcome::Yes, 10).await.unwrap();
        assert!(snapshot.bids.is_empty());
    }

    #[tokio::test]
    async fn cancel_of_unknown_order_returns_absent_not_an_error() {
        let engine = engine();
        let agent = AgentId::from("a");
        engine.create_wallet(agent.clone(), dec!(1000)).await.unwrap();
        let result = engine.cancel_order(OrderId::new(), &agent).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn invalid_price_is_rejected_before_any_lock() {
        let engine = engine();
        let agent = AgentId::from("a");
        engine.create_wallet(agent.clone(), dec!(1000)).await.unwrap();
        let market = MarketId::from("m1");

        let err = engine
            .place_order(agent.clone(), market, limit_request(Side::Buy, dec!(0.005), dec!(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidPrice { .. }));

        let balance = engine.get_balance(&agent).await.unwrap();
        assert_eq!(balance.available, dec!(1000));
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let engine = engine();
        let agent = AgentId::from("a");
        engine.create_wallet(agent.clone(), dec!(1000)).await.unwrap();
        let market = MarketId::from("m1");

        let err = engine
            .place_order(agent, market, limit_request(Side::Buy, dec!(0.50), Decimal::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidQuantity(_)));
    }
}
