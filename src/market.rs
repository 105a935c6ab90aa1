//! Market container — spec §3 "Market container": pairs the YES and NO
//! order books for one market.

use crate::ids::MarketId;
use crate::order::Outcome;
use crate::orderbook::OrderBook;

pub struct Market {
    pub id: MarketId,
    yes: OrderBook,
    no: OrderBook,
}

impl Market {
    #[must_use]
    pub fn new(id: MarketId) -> Self {
        Self {
            id,
            yes: OrderBook::new(),
            no: OrderBook::new(),
        }
    }

    #[must_use]
    pub fn book(&self, outcome: Outcome) -> &OrderBook {
        match outcome {
            Outcome::Yes => &self.yes,
            Outcome::No => &self.no,
        }
    }

    pub fn book_mut(&mut self, outcome: Outcome) -> &mut OrderBook {
        match outcome {
            Outcome::Yes => &mut self.yes,
            Outcome::No => &mut self.no,
        }
    }
}
