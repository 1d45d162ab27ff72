use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{commentary, dashboard, news, simulation};
use crate::error::DashboardError;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Per-tick volatility for any sector without an override
    pub default: f64,
    pub sector_overrides: Option<HashMap<String, f64>>,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert(simulation::TECH_SECTOR.to_string(), simulation::TECH_VOLATILITY);
        Self {
            default: simulation::DEFAULT_VOLATILITY,
            sector_overrides: Some(overrides),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub history_candles: usize,
    pub candle_cap: usize,
    pub candle_period_secs: u64,
    pub news_cap: usize,
    pub min_price: f64,
    /// |move| / price must exceed this before a headline is considered
    pub news_move_threshold: f64,
    /// A uniform draw must exceed this for a headline to be emitted
    pub news_gate: f64,
    pub volatility: VolatilityConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            history_candles: simulation::HISTORY_CANDLES,
            candle_cap: simulation::CANDLE_CAP,
            candle_period_secs: simulation::CANDLE_PERIOD.as_secs(),
            news_cap: simulation::NEWS_CAP,
            min_price: simulation::MIN_PRICE,
            news_move_threshold: news::MOVE_THRESHOLD,
            news_gate: news::EMIT_GATE,
            volatility: VolatilityConfig::default(),
        }
    }
}

impl SimulationConfig {
    // Helper to get the effective per-tick volatility for a sector
    pub fn sector_volatility(&self, sector: &str) -> f64 {
        self.volatility
            .sector_overrides
            .as_ref()
            .and_then(|overrides| overrides.get(sector).copied())
            .unwrap_or(self.volatility.default)
    }

    pub fn candle_period(&self) -> chrono::Duration {
        chrono::Duration::from_std(Duration::from_secs(self.candle_period_secs))
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: commentary::DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Restricts the session to these registry symbols; all symbols when absent
    pub symbols: Option<Vec<String>>,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,

    pub tick_interval_ms: u64,
    pub commentary_delay_ms: u64,
    pub toast_ttl_secs: u64,
    pub news_feed_cap: usize,
    pub event_bus_capacity: usize,

    pub simulation: SimulationConfig,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: None,
            seed: None,
            tick_interval_ms: millis(dashboard::TICK_INTERVAL),
            commentary_delay_ms: millis(dashboard::COMMENTARY_DELAY),
            toast_ttl_secs: dashboard::TOAST_TTL.as_secs(),
            news_feed_cap: news::FEED_CAP,
            event_bus_capacity: dashboard::EVENT_BUS_CAPACITY,
            simulation: SimulationConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    /// Load `config.yaml` from the working directory, falling back to defaults
    /// when the file does not exist. Environment overrides are applied last.
    pub fn load() -> Result<Self, DashboardError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            tracing::info!("⚙️ [CONFIG] {} not found, using defaults", DEFAULT_CONFIG_PATH);
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DashboardError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, DashboardError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let config: AppConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `LLM_API_KEY`, `LLM_BASE_URL` and `LLM_MODEL` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            self.llm.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm.model = model;
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be > 0".into());
        }
        if self.event_bus_capacity == 0 {
            return Err("event_bus_capacity must be > 0".into());
        }
        if self.news_feed_cap == 0 || self.simulation.news_cap == 0 {
            return Err("news caps must be > 0".into());
        }
        if self.simulation.candle_cap == 0 || self.simulation.history_candles == 0 {
            return Err("candle_cap and history_candles must be > 0".into());
        }
        if self.simulation.history_candles > self.simulation.candle_cap {
            return Err(format!(
                "history_candles ({}) exceeds candle_cap ({})",
                self.simulation.history_candles, self.simulation.candle_cap
            )
            .into());
        }
        if self.simulation.min_price.is_nan() || self.simulation.min_price <= 0.0 {
            return Err("min_price must be positive".into());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn commentary_delay(&self) -> Duration {
        Duration::from_millis(self.commentary_delay_ms)
    }

    pub fn toast_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(Duration::from_secs(self.toast_ttl_secs))
            .unwrap_or(chrono::Duration::MAX)
    }
}
