//! # marketcore
//!
//! Matching and escrow core for a two-sided binary prediction market.
//!
//! Each market carries two independent price-time-priority order books — one
//! per outcome token (YES/NO) — plus a shared escrow ledger that the one
//! [`engine::MatchingEngine`] serializes every balance mutation through.
//! Orders are LIMIT or MARKET; fills move funds into a per-trade escrow
//! record rather than settling directly, since settlement (who wins the
//! market) is outside this crate's scope.
//!
//! ## Layout
//!
//! - [`order`] — order identity, sides, lifecycle state.
//! - [`orderbook`] — the price-level FIFO queue, the ordered price index, the
//!   matchable iterator, and the book that composes them (spec components
//!   4.1–4.4).
//! - [`ledger`] — wallets, the transaction log, and per-trade escrow
//!   accumulation (component 4.5).
//! - [`engine`] — the matching engine: placement, the matching loop,
//!   cancellation, configuration, and the error taxonomy (components 4.6–4.8).
//! - [`events`] — the `orders.created` / `trades.executed` / `orders.cancelled`
//!   event bus.
//! - [`market`] — pairs a market's two outcome books.
//! - [`ids`] — strongly-typed identifiers.
//!
//! ## Example
//!
//! ```
//! use marketcore::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = MatchingEngine::new(EngineConfig::default(), std::sync::Arc::new(NullEventPublisher));
//! let alice = AgentId::from("alice");
//! let bob = AgentId::from("bob");
//! engine.create_wallet(alice.clone(), dec!(1000)).await.unwrap();
//! engine.create_wallet(bob.clone(), dec!(1000)).await.unwrap();
//!
//! let market = MarketId::from("will-it-rain");
//! let sell = PlaceOrderRequest {
//!     side: Side::Sell,
//!     outcome: Outcome::Yes,
//!     order_type: OrderType::Limit,
//!     price: Some(dec!(0.60)),
//!     quantity: dec!(100),
//!     client_order_id: None,
//!     metadata: None,
//! };
//! engine.place_order(alice, market.clone(), sell).await.unwrap();
//!
//! let buy = PlaceOrderRequest {
//!     side: Side::Buy,
//!     outcome: Outcome::Yes,
//!     order_type: OrderType::Limit,
//!     price: Some(dec!(0.60)),
//!     quantity: dec!(100),
//!     client_order_id: None,
//!     metadata: None,
//! };
//! let result = engine.place_order(bob, market, buy).await.unwrap();
//! assert_eq!(result.trades.len(), 1);
//! # }
//! ```

pub mod engine;
pub mod events;
pub mod ids;
pub mod ledger;
pub mod market;
pub mod order;
pub mod orderbook;
pub mod prelude;

pub use engine::{BestPrices, EngineConfig, EngineError, MatchingEngine, PlaceOrderRequest, PlaceOrderResult};
pub use events::{BroadcastEventPublisher, CallbackTradePublisher, Event, EventPublisher, NullEventPublisher};
pub use ids::{AgentId, MarketId, OrderId, TradeId, TransactionId};
pub use ledger::{Balance, EscrowLedger, LedgerError, LockOutcome, Transaction, TransactionKind};
pub use market::Market;
pub use order::{Order, OrderAttachment, OrderStatus, OrderType, Outcome, Side};
pub use orderbook::{FeeSchedule, LevelInfo, OrderBook, OrderBookError, OrderBookSnapshot, Trade};
