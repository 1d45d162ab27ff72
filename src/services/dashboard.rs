//! UI session state: what the presentation layer renders between ticks.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::info;

use crate::alerts::{AlertBook, AlertCondition, AlertTrigger, PriceAlert};
use crate::config::AppConfig;
use crate::constants::commentary;
use crate::error::DashboardError;
use crate::llm::Commentary;
use crate::market::{MarketSimulator, NewsItem, Stock, TickReport};

/// Transient alert notification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Toast {
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub struct Dashboard {
    stocks: Vec<Stock>,
    /// Newest first
    news: VecDeque<NewsItem>,
    feed_cap: usize,
    selected: Option<Stock>,
    alerts: AlertBook,
    toast: Option<Toast>,
    toast_ttl: chrono::Duration,
    commentary: Commentary,
    last_tick: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(stocks: Vec<Stock>, news: Vec<NewsItem>, config: &AppConfig) -> Self {
        let mut feed: VecDeque<NewsItem> = news.into();
        feed.truncate(config.news_feed_cap);

        Self {
            stocks,
            news: feed,
            feed_cap: config.news_feed_cap,
            selected: None,
            alerts: AlertBook::new(),
            toast: None,
            toast_ttl: config.toast_ttl(),
            commentary: Commentary {
                text: commentary::INITIAL_TEXT.to_string(),
                generated_at: Utc::now(),
            },
            last_tick: None,
        }
    }

    /// Mount on a simulator's current snapshot.
    pub fn from_simulator<R: Rng>(sim: &MarketSimulator<R>, config: &AppConfig) -> Self {
        Self::new(sim.stocks(), sim.news(), config)
    }

    /// Fold one tick into the session and return the alerts it fired.
    pub fn apply_tick(&mut self, report: &TickReport, now: DateTime<Utc>) -> Vec<AlertTrigger> {
        self.stocks = report.stocks.clone();
        self.last_tick = Some(now);

        if let Some(item) = &report.news {
            self.news.push_front(item.clone());
            self.news.truncate(self.feed_cap);
        }

        let triggers = self.alerts.evaluate(&self.stocks);
        for trigger in &triggers {
            self.raise_toast(trigger.message(), now);
        }

        if let Some(prev) = self.selected.take() {
            let refreshed = self.stocks.iter().find(|s| s.symbol == prev.symbol).cloned();
            self.selected = Some(refreshed.unwrap_or(prev));
        }

        self.expire_toast(now);
        triggers
    }

    pub fn stocks(&self) -> Vec<Stock> {
        self.stocks.clone()
    }

    pub fn stock(&self, symbol: &str) -> Option<Stock> {
        self.stocks.iter().find(|s| s.symbol == symbol).cloned()
    }

    /// Feed sorted newest first.
    pub fn news(&self) -> Vec<NewsItem> {
        self.news.iter().cloned().collect()
    }

    pub fn last_tick(&self) -> Option<DateTime<Utc>> {
        self.last_tick
    }

    pub fn select(&mut self, symbol: &str) -> Result<(), DashboardError> {
        let stock = self.stock(symbol).ok_or_else(|| DashboardError::UnknownSymbol {
            symbol: symbol.to_string(),
        })?;
        self.selected = Some(stock);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_symbol(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.symbol.as_str())
    }

    /// The detail-chart stock: the selection, else the first instrument.
    pub fn selected_stock(&self) -> Option<Stock> {
        self.selected.clone().or_else(|| self.stocks.first().cloned())
    }

    pub fn add_alert(
        &mut self,
        symbol: &str,
        target_price: f64,
        condition: AlertCondition,
    ) -> Result<PriceAlert, DashboardError> {
        if self.stock(symbol).is_none() {
            return Err(DashboardError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
        self.alerts.add(symbol, target_price, condition)
    }

    /// Form submission path: bad input is ignored and returns `None`.
    pub fn add_alert_from_input(
        &mut self,
        symbol: &str,
        raw_price: &str,
        condition: AlertCondition,
    ) -> Option<PriceAlert> {
        if self.stock(symbol).is_none() {
            return None;
        }
        self.alerts.add_from_input(symbol, raw_price, condition)
    }

    pub fn remove_alert(&mut self, id: &str) -> bool {
        self.alerts.remove(id)
    }

    pub fn alerts(&self) -> &[PriceAlert] {
        self.alerts.alerts()
    }

    fn raise_toast(&mut self, message: String, now: DateTime<Utc>) {
        info!("🔔 [DASHBOARD] {}", message);
        self.toast = Some(Toast {
            message,
            raised_at: now,
            expires_at: now
                .checked_add_signed(self.toast_ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        });
    }

    pub fn active_toast(&self, now: DateTime<Utc>) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| t.is_visible(now))
    }

    pub fn expire_toast(&mut self, now: DateTime<Utc>) {
        if self.toast.as_ref().is_some_and(|t| !t.is_visible(now)) {
            self.toast = None;
        }
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub fn commentary(&self) -> &Commentary {
        &self.commentary
    }

    pub fn set_commentary(&mut self, commentary: Commentary) {
        self.commentary = commentary;
    }
}
