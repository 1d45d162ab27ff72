use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::alerts::AlertTrigger;
use crate::llm::Commentary;
use crate::market::{NewsItem, Stock};

/// Fresh snapshot after one tick. Shared so every subscriber clone is cheap.
#[derive(Clone, Debug)]
pub struct MarketUpdate {
    pub stocks: Arc<Vec<Stock>>,
    pub timestamp: DateTime<Utc>,
}

// Global Event Enum
#[derive(Clone, Debug)]
pub enum Event {
    Market(MarketUpdate),
    News(NewsItem),
    Alert(AlertTrigger),
    Commentary(Commentary),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Market(_) => "market",
            Event::News(_) => "news",
            Event::Alert(_) => "alert",
            Event::Commentary(_) => "commentary",
        }
    }
}
