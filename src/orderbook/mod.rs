//! Order-book components — spec §4.1–§4.4.

mod book;
mod error;
mod fees;
mod iterators;
mod price_level;
mod side;
mod trade;

mod snapshot;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use fees::FeeSchedule;
pub use iterators::{LevelInfo, MatchableOrders};
pub use price_level::PriceLevel;
pub use side::OrderBookSide;
pub use snapshot::OrderBookSnapshot;
pub use trade::{Trade, TradeListener};
