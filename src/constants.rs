//! Application-wide constants and magic numbers
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make the simulation easier to tune.

use std::time::Duration;

/// Market simulation constants
pub mod simulation {
    use super::*;

    /// Length of one candle period
    pub const CANDLE_PERIOD: Duration = Duration::from_secs(60);

    /// Number of one-minute candles synthesized at session start
    pub const HISTORY_CANDLES: usize = 60;

    /// Maximum candles kept per instrument (oldest evicted first)
    pub const CANDLE_CAP: usize = 100;

    /// Maximum news items kept by the engine
    pub const NEWS_CAP: usize = 20;

    /// Volatility used while synthesizing history, as a fraction of price
    pub const HISTORY_VOLATILITY: f64 = 0.005;

    /// Per-tick volatility for sectors without an override
    pub const DEFAULT_VOLATILITY: f64 = 0.001;

    /// Per-tick volatility for the technology sector
    pub const TECH_VOLATILITY: f64 = 0.002;

    /// Sector name that carries the higher volatility by default
    pub const TECH_SECTOR: &str = "Technology";

    /// Lowest price an instrument may drift to
    pub const MIN_PRICE: f64 = 0.01;

    /// Uniform start-price range for instruments without a curated base price
    pub const RANDOM_BASE_MIN: f64 = 50.0;
    pub const RANDOM_BASE_SPAN: f64 = 200.0;

    /// Historical candle volume range
    pub const HISTORY_VOLUME_MIN: u64 = 1_000;
    pub const HISTORY_VOLUME_SPAN: u64 = 50_000;

    /// Volume seeded into a freshly opened live candle (exclusive upper bound)
    pub const NEW_CANDLE_VOLUME: u64 = 1_000;

    /// Volume added to the live candle per tick (exclusive upper bound)
    pub const LIVE_CANDLE_VOLUME_STEP: u64 = 500;

    /// Volume added to the cumulative session volume per tick (exclusive upper bound)
    pub const SESSION_VOLUME_STEP: u64 = 1_000;
}

/// News wire constants
pub mod news {
    /// Minimum |move| as a fraction of price before a headline is considered.
    /// Must stay below half the largest sector volatility or no headline can fire.
    /// The historical default of 0.0015 sits above that bound (max move is
    /// 0.001 of price at 0.002 volatility), so it is lowered here.
    pub const MOVE_THRESHOLD: f64 = 0.0008;

    /// A uniform draw must exceed this for a headline to be emitted
    pub const EMIT_GATE: f64 = 0.95;

    /// Instruments that receive an opening headline
    pub const OPENING_HEADLINES: usize = 5;

    /// Opening headlines are back-dated by up to this many milliseconds
    pub const OPENING_BACKDATE_MS: f64 = 3_600_000.0;

    pub const OPENING_SOURCES: [&str; 4] = ["Bloomberg", "Yahoo Finance", "Reuters", "CNBC"];
    pub const WIRE_SOURCES: [&str; 3] = ["Dow Jones", "Yahoo Finance", "MarketWatch"];

    /// Maximum news items kept by the dashboard feed
    pub const FEED_CAP: usize = 50;
}

/// Dashboard timing constants
pub mod dashboard {
    use super::*;

    /// Interval between simulation ticks
    pub const TICK_INTERVAL: Duration = Duration::from_millis(1_500);

    /// How long an alert toast stays visible
    pub const TOAST_TTL: Duration = Duration::from_secs(5);

    /// Delay between ticker start and the first commentary request
    pub const COMMENTARY_DELAY: Duration = Duration::from_secs(1);

    /// Broadcast capacity of the event bus
    pub const EVENT_BUS_CAPACITY: usize = 1_000;
}

/// Commentary constants
pub mod commentary {
    /// Number of top movers sent to the text generator
    pub const TOP_MOVERS: usize = 5;

    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

    /// Returned when the generator fails for any reason
    pub const OFFLINE_FALLBACK: &str =
        "Analyst systems are currently offline. Please check connection.";

    /// Returned when the generator answers with an empty body
    pub const EMPTY_FALLBACK: &str = "Market analysis unavailable at this moment.";

    /// Shown before the first commentary arrives
    pub const INITIAL_TEXT: &str = "Initializing AI market surveillance...";
}

/// Chart and heatmap constants
pub mod views {
    /// Percent change at which a tile reaches full color intensity
    pub const FULL_INTENSITY_PCT: f64 = 4.0;

    pub const SMA_FAST: usize = 5;
    pub const SMA_SLOW: usize = 20;
}

/// Logging event names for structured logging
pub mod events {
    pub const MARKET_INITIALIZED: &str = "market_initialized";
    pub const NEWS_EMITTED: &str = "news_emitted";
    pub const ALERT_CREATED: &str = "alert_created";
    pub const ALERT_REJECTED: &str = "alert_rejected";
    pub const ALERT_TRIGGERED: &str = "alert_triggered";
    pub const COMMENTARY_FALLBACK: &str = "commentary_fallback";
    pub const COMMENTARY_SKIPPED: &str = "commentary_skipped";
}
