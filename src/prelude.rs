//! Prelude module that re-exports the commonly used types and traits.
//!
//! ```
//! use marketcore::prelude::*;
//! ```

pub use crate::engine::{BestPrices, EngineConfig, EngineError, MatchingEngine, PlaceOrderRequest, PlaceOrderResult};
pub use crate::events::{BroadcastEventPublisher, CallbackTradePublisher, Event, EventPublisher, NullEventPublisher};
pub use crate::ids::{AgentId, MarketId, OrderId, TradeId, TransactionId};
pub use crate::ledger::{Balance, EscrowLedger, LedgerError, LockOutcome, Transaction, TransactionKind};
pub use crate::market::Market;
pub use crate::order::{Order, OrderAttachment, OrderStatus, OrderType, Outcome, Side};
pub use crate::orderbook::{FeeSchedule, LevelInfo, OrderBook, OrderBookError, OrderBookSnapshot, Trade};
