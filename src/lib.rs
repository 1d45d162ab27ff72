//! Liquid Terminal - simulated equity market dashboard core
//!
//! This library provides a seeded random-walk market over the NASDAQ-50,
//! synthetic news, price alerts, and LLM market commentary, all driven by a
//! periodic ticker that publishes to an event bus.

pub mod alerts;
pub mod bus;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod llm;
pub mod market;
pub mod services;
pub mod views;

// Re-export commonly used types
pub use alerts::{AlertBook, AlertCondition, AlertTrigger, PriceAlert};
pub use bus::EventBus;
pub use config::AppConfig;
pub use error::{CommentaryError, DashboardError};
pub use events::{Event, MarketUpdate};
pub use market::{Candle, MarketSimulator, NewsItem, Sentiment, Stock, TickReport};
pub use services::{Dashboard, MarketTicker, TickerHandle};

#[cfg(test)]
mod config_tests;
