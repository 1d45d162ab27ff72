use chrono::Utc;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::bus::EventBus;
use crate::config::AppConfig;
use crate::events::{Event, MarketUpdate};
use crate::llm::{Commentary, CommentaryDesk};
use crate::market::MarketSimulator;
use crate::services::dashboard::Dashboard;

pub(crate) fn lock_dashboard(dashboard: &Mutex<Dashboard>) -> MutexGuard<'_, Dashboard> {
    // Recover from poisoning; ticks must keep flowing
    dashboard.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Teardown flag shared by the handle and commentary tasks.
///
/// A commentary task holds the gate for the whole of its dashboard update, so
/// once [`StopGate::close`] returns no further update can start or be running.
/// Lock order is dashboard, then gate.
#[derive(Clone, Default)]
struct StopGate(Arc<Mutex<bool>>);

impl StopGate {
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self) {
        *self.lock() = true;
    }

    fn is_closed(&self) -> bool {
        *self.lock()
    }
}

/// Drives the simulator on a fixed interval and fans results out to the
/// dashboard and the event bus.
pub struct MarketTicker<R: Rng + Send + 'static = StdRng> {
    simulator: MarketSimulator<R>,
    dashboard: Arc<Mutex<Dashboard>>,
    bus: EventBus,
    commentary: CommentaryDesk,
    interval: Duration,
    commentary_delay: Duration,
}

impl<R: Rng + Send + 'static> MarketTicker<R> {
    /// Takes ownership of the simulator; the dashboard is mounted on its
    /// current snapshot.
    pub fn new(
        simulator: MarketSimulator<R>,
        bus: EventBus,
        commentary: CommentaryDesk,
        config: &AppConfig,
    ) -> Self {
        let dashboard = Arc::new(Mutex::new(Dashboard::from_simulator(&simulator, config)));
        Self {
            simulator,
            dashboard,
            bus,
            commentary,
            interval: config.tick_interval(),
            commentary_delay: config.commentary_delay(),
        }
    }

    pub fn dashboard(&self) -> Arc<Mutex<Dashboard>> {
        self.dashboard.clone()
    }

    /// Run one tick synchronously. The spawned loop uses the same path.
    pub fn step(&mut self) {
        let now = Utc::now();
        let report = self.simulator.tick_at(now);
        let triggers = lock_dashboard(&self.dashboard).apply_tick(&report, now);

        if let Some(item) = report.news {
            self.bus.emit(Event::News(item));
        }
        self.bus.emit(Event::Market(MarketUpdate {
            stocks: Arc::new(report.stocks),
            timestamp: now,
        }));
        for trigger in triggers {
            self.bus.emit(Event::Alert(trigger));
        }
    }

    /// Start the repeating timer. Stopping (or dropping) the returned handle
    /// ends the loop.
    pub fn start(mut self) -> TickerHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let stopped = StopGate::default();

        let handle_dashboard = self.dashboard.clone();
        let handle_bus = self.bus.clone();
        let handle_desk = self.commentary.clone();
        let task_stopped = stopped.clone();

        let task = tokio::spawn(async move {
            info!("⏱️ [TICKER] Market ticker started (every {:?})", self.interval);

            let mut interval = interval_at(Instant::now() + self.interval, self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let first_commentary = sleep(self.commentary_delay);
            tokio::pin!(first_commentary);
            let mut commentary_requested = false;
            let mut ticks: u64 = 0;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {
                        self.step();
                        ticks += 1;
                        debug!("⏱️ [TICKER] Tick {}", ticks);
                    }
                    _ = &mut first_commentary, if !commentary_requested => {
                        commentary_requested = true;
                        spawn_commentary(&self.commentary, &self.dashboard, &self.bus, &task_stopped);
                    }
                }
            }

            info!("⏱️ [TICKER] Market ticker stopped after {} ticks", ticks);
        });

        TickerHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
            stopped,
            dashboard: handle_dashboard,
            bus: handle_bus,
            commentary: handle_desk,
        }
    }
}

/// Fire a commentary request off the tick path. Returns `false` when one is
/// already outstanding or the ticker has been stopped.
fn spawn_commentary(
    desk: &CommentaryDesk,
    dashboard: &Arc<Mutex<Dashboard>>,
    bus: &EventBus,
    stopped: &StopGate,
) -> bool {
    if stopped.is_closed() {
        return false;
    }
    let Some(permit) = desk.try_begin() else {
        return false;
    };

    let stocks = lock_dashboard(dashboard).stocks();
    let desk = desk.clone();
    let dashboard = dashboard.clone();
    let bus = bus.clone();
    let stopped = stopped.clone();

    tokio::spawn(async move {
        let text = desk.complete(permit, &stocks).await;

        let mut dash = lock_dashboard(&dashboard);
        let gate = stopped.lock();
        if *gate {
            debug!("🤖 [TICKER] Discarding commentary that arrived after stop");
            return;
        }

        let commentary = Commentary {
            text,
            generated_at: Utc::now(),
        };
        dash.set_commentary(commentary.clone());
        bus.emit(Event::Commentary(commentary));
    });
    true
}

/// Cancellation handle for a running [`MarketTicker`].
pub struct TickerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    stopped: StopGate,
    dashboard: Arc<Mutex<Dashboard>>,
    bus: EventBus,
    commentary: CommentaryDesk,
}

impl TickerHandle {
    pub fn dashboard(&self) -> Arc<Mutex<Dashboard>> {
        self.dashboard.clone()
    }

    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Manual commentary refresh; ignored while a request is in flight.
    pub fn refresh_commentary(&self) -> bool {
        spawn_commentary(&self.commentary, &self.dashboard, &self.bus, &self.stopped)
    }

    /// Stop the timer and wait for the loop to exit. No dashboard updates
    /// happen after this returns, including late commentary.
    pub async fn stop(mut self) {
        self.stopped.close();
        if let Some(tx) = self.shutdown_tx.take() {
            // Err means the loop already exited
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!("❌ [TICKER] Ticker task ended abnormally: {}", e);
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        // The loop itself ends when `shutdown_tx` is dropped
        self.stopped.close();
    }
}
