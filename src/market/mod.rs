pub mod registry;
pub mod simulator;
pub mod types;

pub use registry::{Instrument, NASDAQ_50};
pub use simulator::MarketSimulator;
pub use types::{Candle, NewsItem, Sentiment, Stock, TickReport};

#[cfg(test)]
mod simulator_tests;
