//! Matching engine — spec component 4.6, plus the configuration (§6) and
//! error taxonomy (§7) it's built from.

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::{BestPrices, MatchingEngine, PlaceOrderRequest, PlaceOrderResult};
pub use error::EngineError;
