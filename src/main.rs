use liquid_terminal::config::AppConfig;
use liquid_terminal::events::Event;
use liquid_terminal::llm::{CommentaryDesk, LLMClient};
use liquid_terminal::market::{registry, MarketSimulator};
use liquid_terminal::{EventBus, MarketTicker};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Liquid Terminal...");

    // Load Configuration
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("⚠️ Failed to load configuration ({}), using defaults", e);
            AppConfig::default()
        }
    };
    info!(
        "Loaded Configuration: tick every {}ms, {} symbols",
        config.tick_interval_ms,
        config.symbols.as_ref().map_or(registry::NASDAQ_50.len(), Vec::len)
    );

    let instruments = registry::select(config.symbols.as_deref())?;
    let simulator = match config.seed {
        Some(seed) => {
            info!("🎲 Seeded session: {}", seed);
            MarketSimulator::seeded(&instruments, config.simulation.clone(), seed)
        }
        None => MarketSimulator::from_entropy(&instruments, config.simulation.clone()),
    };

    // Initialize Clients
    info!("Initializing AI Client...");
    if let Some(url) = &config.llm.base_url {
        info!("Using Custom OpenAI Base URL: {}", url);
    }
    info!("Using LLM Model: {}", config.llm.model);
    let desk = CommentaryDesk::new(Arc::new(LLMClient::from_config(&config.llm)));

    let bus = EventBus::new(config.event_bus_capacity);
    let mut rx = bus.subscribe();
    let handle = MarketTicker::new(simulator, bus, desk, &config).start();

    let listener = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::Market(update)) => {
                    tracing::debug!("📈 {} quotes at {}", update.stocks.len(), update.timestamp);
                }
                Ok(Event::News(item)) => {
                    info!("📰 [{}] {} ({:?})", item.source, item.headline, item.sentiment);
                }
                Ok(Event::Alert(trigger)) => info!("🔔 {}", trigger.message()),
                Ok(Event::Commentary(c)) => info!("🤖 {}", c.text),
                Err(RecvError::Lagged(n)) => warn!("⚠️ Event listener lagged by {} events", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    handle.stop().await;
    listener.abort();

    Ok(())
}
