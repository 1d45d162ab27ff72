use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{info, warn};

use super::TextGenerator;
use crate::constants::{commentary, events};
use crate::market::Stock;

const SYSTEM_PROMPT: &str = "Act as a senior Bloomberg market analyst.";

/// Compact view of one instrument sent to the text generator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopMover {
    pub symbol: String,
    pub name: String,
    /// Two decimals, e.g. "175.50"
    pub price: String,
    /// Two decimals with a percent sign, e.g. "-1.25%"
    pub change: String,
    pub sector: String,
}

/// The latest commentary and when it was produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Commentary {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// Rank by absolute percent change, largest first, and keep `limit`.
pub fn top_movers(stocks: &[Stock], limit: usize) -> Vec<TopMover> {
    let mut ranked: Vec<&Stock> = stocks.iter().collect();
    ranked.sort_by(|a, b| b.change_percent.abs().total_cmp(&a.change_percent.abs()));

    ranked
        .into_iter()
        .take(limit)
        .map(|s| TopMover {
            symbol: s.symbol.clone(),
            name: s.name.clone(),
            price: format!("{:.2}", s.price),
            change: format!("{:.2}%", s.change_percent),
            sector: s.sector.clone(),
        })
        .collect()
}

fn build_prompt(movers: &[TopMover]) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(movers)?;
    Ok(format!(
        "Analyze the following live market data snapshot for NASDAQ top movers.\n\n\
         Data: {data}\n\n\
         Provide a concise, professional, and slightly dramatic 2-3 sentence market commentary. \
         Focus on the biggest mover and the sector implications. \
         Do not use markdown. Just plain text."
    ))
}

/// Requests market commentary with at most one call in flight.
///
/// Failures never escape: callers always get displayable text.
#[derive(Clone)]
pub struct CommentaryDesk {
    generator: Arc<dyn TextGenerator>,
    in_flight: Arc<Semaphore>,
}

impl CommentaryDesk {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    /// Claim the in-flight slot. `None` when a request is already outstanding.
    /// The slot is held until the returned permit is dropped.
    pub fn try_begin(&self) -> Option<OwnedSemaphorePermit> {
        match self.in_flight.clone().try_acquire_owned() {
            Ok(permit) => Some(permit),
            Err(_) => {
                info!(
                    event = events::COMMENTARY_SKIPPED,
                    "🤖 [COMMENTARY] Request already in flight, ignoring"
                );
                None
            }
        }
    }

    /// Returns `None` when a previous request is still outstanding; the new
    /// request is dropped rather than queued.
    pub async fn request(&self, stocks: &[Stock]) -> Option<String> {
        let permit = self.try_begin()?;
        Some(self.complete(permit, stocks).await)
    }

    /// Run a request whose slot was claimed with [`CommentaryDesk::try_begin`].
    pub async fn complete(&self, permit: OwnedSemaphorePermit, stocks: &[Stock]) -> String {
        let text = self.analyze(stocks).await;
        drop(permit);
        text
    }

    async fn analyze(&self, stocks: &[Stock]) -> String {
        let movers = top_movers(stocks, commentary::TOP_MOVERS);
        let prompt = match build_prompt(&movers) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!(event = events::COMMENTARY_FALLBACK, "⚠️ [COMMENTARY] Prompt encoding failed: {}", e);
                return commentary::OFFLINE_FALLBACK.to_string();
            }
        };

        match self.generator.generate(SYSTEM_PROMPT, &prompt).await {
            Ok(text) if text.trim().is_empty() => commentary::EMPTY_FALLBACK.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(event = events::COMMENTARY_FALLBACK, "⚠️ [COMMENTARY] LLM error: {}", e);
                commentary::OFFLINE_FALLBACK.to_string()
            }
        }
    }
}
