use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One fixed-duration OHLCV bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Start of the period covered by this bar
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    /// A fresh live candle where every price equals `price`.
    pub fn seeded(time: DateTime<Utc>, price: f64, volume: u64) -> Self {
        Self {
            time,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }

    /// Fold a new trade price into the live candle.
    pub fn absorb(&mut self, price: f64, volume: u64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += volume;
    }

    /// `low <= min(open, close) <= max(open, close) <= high`
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
    pub prev_close: f64,
    /// Oldest first; the back element is the live candle
    pub candles: VecDeque<Candle>,
}

impl Stock {
    pub fn live_candle(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }

    /// Recompute `change` and `change_percent` against the session reference.
    pub(crate) fn reprice(&mut self, price: f64) {
        self.price = price;
        self.change = price - self.prev_close;
        self.change_percent = percent_change(price, self.prev_close);
        self.high = self.high.max(price);
        self.low = self.low.min(price);
    }
}

pub fn percent_change(price: f64, reference: f64) -> f64 {
    ((price - reference) / reference) * 100.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn from_move(delta: f64) -> Self {
        if delta > 0.0 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub headline: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub related_symbol: String,
    pub sentiment: Sentiment,
}

/// Result of one simulation step.
#[derive(Clone, Debug, Serialize)]
pub struct TickReport {
    pub stocks: Vec<Stock>,
    pub news: Option<NewsItem>,
}
