//! Random-walk market simulator.
//!
//! [`MarketSimulator`] owns every piece of mutable market state: prices, candle
//! history and the news wire. It is advanced by [`MarketSimulator::tick`], which
//! performs one full pass over all instruments under `&mut self`, so callers
//! only ever see whole ticks through the snapshot accessors.
//!
//! Randomness is injected, which makes seeded runs reproducible:
//!
//! ```ignore
//! let mut sim = MarketSimulator::seeded(&registry::NASDAQ_50, SimulationConfig::default(), 42);
//! let report = sim.tick();
//! ```

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::constants::{events, news, simulation};
use crate::market::registry::{self, Instrument};
use crate::market::types::{percent_change, Candle, NewsItem, Sentiment, Stock, TickReport};

pub struct MarketSimulator<R: Rng = StdRng> {
    config: SimulationConfig,
    stocks: Vec<Stock>,
    /// Newest first
    news: VecDeque<NewsItem>,
    rng: R,
    last_update: DateTime<Utc>,
}

impl MarketSimulator<StdRng> {
    pub fn seeded(instruments: &[Instrument], config: SimulationConfig, seed: u64) -> Self {
        Self::new(instruments, config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(instruments: &[Instrument], config: SimulationConfig) -> Self {
        Self::new(instruments, config, StdRng::from_entropy())
    }
}

impl<R: Rng> MarketSimulator<R> {
    pub fn new(instruments: &[Instrument], config: SimulationConfig, rng: R) -> Self {
        Self::new_at(instruments, config, rng, Utc::now())
    }

    /// Build the session as if it started at `now`.
    pub fn new_at(
        instruments: &[Instrument],
        config: SimulationConfig,
        rng: R,
        now: DateTime<Utc>,
    ) -> Self {
        let mut sim = Self {
            config,
            stocks: Vec::with_capacity(instruments.len()),
            news: VecDeque::new(),
            rng,
            last_update: now,
        };

        for instrument in instruments {
            let stock = sim.open_instrument(instrument, now);
            sim.stocks.push(stock);
        }
        sim.publish_opening_news(now);

        info!(
            event = events::MARKET_INITIALIZED,
            "📈 [SIM] Market initialized: {} instruments, {} candles each",
            sim.stocks.len(),
            sim.config.history_candles
        );
        sim
    }

    fn open_instrument(&mut self, instrument: &Instrument, now: DateTime<Utc>) -> Stock {
        let start_price = registry::base_price(instrument.symbol).unwrap_or_else(|| {
            self.rng.gen::<f64>() * simulation::RANDOM_BASE_SPAN + simulation::RANDOM_BASE_MIN
        });
        let candles = self.synthesize_history(start_price, now);

        let prev_close = candles.front().map_or(start_price, |c| c.open);
        let price = candles.back().map_or(start_price, |c| c.close);
        let high = candles.iter().map(|c| c.high).fold(price, f64::max);
        let low = candles.iter().map(|c| c.low).fold(price, f64::min);

        Stock {
            symbol: instrument.symbol.to_string(),
            name: instrument.name.to_string(),
            sector: instrument.sector.to_string(),
            price,
            change: price - prev_close,
            change_percent: percent_change(price, prev_close),
            volume: candles.iter().map(|c| c.volume).sum(),
            high,
            low,
            prev_close,
            candles,
        }
    }

    /// Random-walk one-period candles ending just before `now`, oldest first.
    fn synthesize_history(&mut self, base_price: f64, now: DateTime<Utc>) -> VecDeque<Candle> {
        let count = self.config.history_candles;
        let period = self.config.candle_period();
        let mut candles = VecDeque::with_capacity(count);
        let mut current = base_price;

        for i in (1..=count).rev() {
            let steps = i32::try_from(i).unwrap_or(i32::MAX);
            let time = now - period * steps;
            let vol = current * simulation::HISTORY_VOLATILITY;

            let open = current;
            let close = open + (self.rng.gen::<f64>() - 0.5) * vol;
            let high = open.max(close) + self.rng.gen::<f64>() * vol * 0.5;
            let low = open.min(close) - self.rng.gen::<f64>() * vol * 0.5;
            let volume = self.rng.gen_range(0..simulation::HISTORY_VOLUME_SPAN)
                + simulation::HISTORY_VOLUME_MIN;

            candles.push_back(Candle {
                time,
                open,
                high,
                low,
                close,
                volume,
            });
            current = close;
        }
        candles
    }

    fn publish_opening_news(&mut self, now: DateTime<Utc>) {
        let mut opening = Vec::new();
        for stock in self.stocks.iter().take(news::OPENING_HEADLINES) {
            let backdate_ms = self.rng.gen::<f64>() * news::OPENING_BACKDATE_MS;
            let source = news::OPENING_SOURCES[self.rng.gen_range(0..news::OPENING_SOURCES.len())];
            opening.push(NewsItem {
                id: random_id(&mut self.rng),
                headline: format!("{} volume spikes as trading session begins.", stock.name),
                source: source.to_string(),
                timestamp: now - chrono::Duration::milliseconds(backdate_ms as i64),
                related_symbol: stock.symbol.clone(),
                sentiment: Sentiment::Neutral,
            });
        }
        opening.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.news = opening.into();
        self.news.truncate(self.config.news_cap);
    }

    pub fn stocks(&self) -> Vec<Stock> {
        self.stocks.clone()
    }

    /// News sorted newest first.
    pub fn news(&self) -> Vec<NewsItem> {
        let mut items: Vec<NewsItem> = self.news.iter().cloned().collect();
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items
    }

    pub fn stock(&self, symbol: &str) -> Option<Stock> {
        self.stocks.iter().find(|s| s.symbol == symbol).cloned()
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick_at(Utc::now())
    }

    /// Advance every instrument by one step at wall-clock `now`.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> TickReport {
        self.last_update = now;
        let period = self.config.candle_period();
        let mut headline: Option<NewsItem> = None;

        let Self {
            config, stocks, rng, ..
        } = &mut *self;

        for stock in stocks.iter_mut() {
            let volatility = config.sector_volatility(&stock.sector);
            let delta = (rng.gen::<f64>() - 0.5) * volatility * stock.price;
            let new_price = (stock.price + delta).max(config.min_price);

            let rolls_over = stock
                .live_candle()
                .map_or(true, |live| now - live.time > period);
            if rolls_over {
                let volume = rng.gen_range(0..simulation::NEW_CANDLE_VOLUME);
                stock.candles.push_back(Candle::seeded(now, new_price, volume));
                while stock.candles.len() > config.candle_cap {
                    stock.candles.pop_front();
                }
            } else if let Some(live) = stock.candles.back_mut() {
                live.absorb(new_price, rng.gen_range(0..simulation::LIVE_CANDLE_VOLUME_STEP));
            }

            if headline.is_none()
                && delta.abs() > stock.price * config.news_move_threshold
                && rng.gen::<f64>() > config.news_gate
            {
                headline = Some(wire_headline(rng, stock, delta, now));
            }

            stock.volume += rng.gen_range(0..simulation::SESSION_VOLUME_STEP);
            stock.reprice(new_price);
        }

        if let Some(item) = &headline {
            debug!(
                event = events::NEWS_EMITTED,
                "📰 [SIM] {} ({:?}) via {}", item.headline, item.sentiment, item.source
            );
            self.news.push_front(item.clone());
            self.news.truncate(self.config.news_cap);
        }

        TickReport {
            stocks: self.stocks.clone(),
            news: headline,
        }
    }
}

fn wire_headline<R: Rng>(rng: &mut R, stock: &Stock, delta: f64, now: DateTime<Utc>) -> NewsItem {
    let sentiment = Sentiment::from_move(delta);
    let headline = match sentiment {
        Sentiment::Positive => format!("{} rallies breaking key intraday resistance.", stock.symbol),
        _ => format!("{} slips as selling pressure mounts.", stock.symbol),
    };
    let source = news::WIRE_SOURCES[rng.gen_range(0..news::WIRE_SOURCES.len())];

    NewsItem {
        id: random_id(rng),
        headline,
        source: source.to_string(),
        timestamp: now,
        related_symbol: stock.symbol.clone(),
        sentiment,
    }
}

/// UUID drawn from the simulator's RNG so seeded sessions repeat exactly.
fn random_id<R: Rng>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}
