//! Price alerts owned by the dashboard session.
//!
//! The simulator knows nothing about alerts; [`AlertBook::evaluate`] is run
//! against each fresh snapshot and consumes every alert whose condition holds.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::constants::events;
use crate::error::DashboardError;
use crate::market::Stock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCondition {
    /// Fires when price >= target
    Above,
    /// Fires when price <= target
    Below,
}

impl AlertCondition {
    pub fn is_met(self, price: f64, target: f64) -> bool {
        match self {
            AlertCondition::Above => price >= target,
            AlertCondition::Below => price <= target,
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertCondition::Above => write!(f, "ABOVE"),
            AlertCondition::Below => write!(f, "BELOW"),
        }
    }
}

impl FromStr for AlertCondition {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ABOVE" => Ok(AlertCondition::Above),
            "BELOW" => Ok(AlertCondition::Below),
            _ => Err(DashboardError::InvalidCondition {
                input: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub id: String,
    pub symbol: String,
    pub target_price: f64,
    pub condition: AlertCondition,
    pub active: bool,
}

/// An alert consumed by a price crossing.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTrigger {
    pub alert: PriceAlert,
    pub price: f64,
}

impl AlertTrigger {
    /// Toast text, e.g. `PRICE ALERT: AAPL reached 178.20 (ABOVE 178)`
    pub fn message(&self) -> String {
        format!(
            "PRICE ALERT: {} reached {:.2} ({} {})",
            self.alert.symbol, self.price, self.alert.condition, self.alert.target_price
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct AlertBook {
    /// Insertion order is evaluation order
    alerts: Vec<PriceAlert>,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        symbol: impl Into<String>,
        target_price: f64,
        condition: AlertCondition,
    ) -> Result<PriceAlert, DashboardError> {
        let symbol = symbol.into();
        if !target_price.is_finite() || target_price <= 0.0 {
            return Err(DashboardError::InvalidTargetPrice {
                symbol,
                price: target_price,
            });
        }

        let alert = PriceAlert {
            id: uuid::Uuid::new_v4().to_string(),
            symbol,
            target_price,
            condition,
            active: true,
        };
        info!(
            event = events::ALERT_CREATED,
            "🔔 [ALERTS] Added alert {} {} {}", alert.symbol, alert.condition, alert.target_price
        );
        self.alerts.push(alert.clone());
        Ok(alert)
    }

    /// Create an alert from raw form input. Empty or non-numeric prices are
    /// ignored without raising; `None` means nothing was created.
    pub fn add_from_input(
        &mut self,
        symbol: &str,
        raw_price: &str,
        condition: AlertCondition,
    ) -> Option<PriceAlert> {
        let parsed = raw_price.trim().parse::<f64>();
        let Ok(target) = parsed else {
            debug!(
                event = events::ALERT_REJECTED,
                "🔕 [ALERTS] Ignoring non-numeric target {:?} for {}", raw_price, symbol
            );
            return None;
        };

        match self.add(symbol, target, condition) {
            Ok(alert) => Some(alert),
            Err(e) => {
                debug!(event = events::ALERT_REJECTED, "🔕 [ALERTS] {}", e);
                None
            }
        }
    }

    /// Idempotent; returns whether an alert was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    /// Fire and consume every active alert whose condition holds in `stocks`.
    ///
    /// Alerts are checked independently in insertion order, so several alerts
    /// on the same symbol can all fire in one pass.
    pub fn evaluate(&mut self, stocks: &[Stock]) -> Vec<AlertTrigger> {
        if self.alerts.is_empty() {
            return Vec::new();
        }

        let prices: HashMap<&str, f64> = stocks
            .iter()
            .map(|s| (s.symbol.as_str(), s.price))
            .collect();

        let mut triggers = Vec::new();
        for alert in self.alerts.iter_mut().filter(|a| a.active) {
            let Some(&price) = prices.get(alert.symbol.as_str()) else {
                continue;
            };
            if alert.condition.is_met(price, alert.target_price) {
                alert.active = false;
                let trigger = AlertTrigger {
                    alert: alert.clone(),
                    price,
                };
                info!(event = events::ALERT_TRIGGERED, "🚨 [ALERTS] {}", trigger.message());
                triggers.push(trigger);
            }
        }

        self.alerts.retain(|a| a.active);
        triggers
    }

    pub fn alerts(&self) -> &[PriceAlert] {
        &self.alerts
    }

    pub fn get(&self, id: &str) -> Option<&PriceAlert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
