//! Feed Controller
//!
//! Guarantees the scene always has an event source. With a live transport it
//! connects, subscribes and forwards classified events; on any transport
//! failure it drops to `Disconnected`, starts the simulated loop as a
//! stopgap and reconnects with exponential backoff. Without a transport it
//! runs simulated-only.
//!
//! At most one simulated loop exists at a time. Once the controller goes
//! `Live`, the loop notices on its next wake and exits without emitting.
//! Everything reaches the consumer through one callback.

pub mod simulator;
pub mod transport;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::classifier::classify;
use crate::models::effects::{Classification, ClassifiedEvent, EventSource};
use crate::models::feed::{FeedConnectionState, FeedStats};
use transport::{FeedConnection, FeedTransport};

pub type EventCallback = Arc<dyn Fn(ClassifiedEvent) + Send + Sync>;

/// Reconnect and simulated-loop timing.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedTiming {
    pub initial_reconnect: Duration,
    pub max_reconnect: Duration,
    pub backoff: f64,
    /// Simulated loop wait range, ms (inclusive).
    pub sim_interval_ms: (u64, u64),
}

impl Default for FeedTiming {
    fn default() -> Self {
        Self {
            initial_reconnect: Duration::from_millis(2000),
            max_reconnect: Duration::from_millis(30_000),
            backoff: 1.5,
            sim_interval_ms: (80, 200),
        }
    }
}

impl FeedTiming {
    pub fn next_reconnect_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff).min(self.max_reconnect)
    }
}

struct FeedShared {
    state: FeedConnectionState,
    stopped: bool,
    sim_running: bool,
    reconnect_delay: Duration,
    event_count: u64,
    last_event_ms: Option<i64>,
}

/// Everything the background tasks need, cloned into each.
#[derive(Clone)]
struct FeedContext {
    shared: Arc<Mutex<FeedShared>>,
    callback: EventCallback,
    timing: FeedTiming,
}

impl FeedContext {
    fn lock(&self) -> std::sync::MutexGuard<'_, FeedShared> {
        self.shared.lock().expect("feed state poisoned")
    }

    fn set_state(&self, state: FeedConnectionState) {
        let mut guard = self.lock();
        if guard.stopped {
            return;
        }
        if guard.state != state {
            log::info!("[feed] {:?} -> {:?}", guard.state, state);
            guard.state = state;
        }
    }

    fn deliver(&self, classification: Classification, signature: String, source: EventSource) {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        {
            let mut guard = self.lock();
            guard.event_count += 1;
            guard.last_event_ms = Some(timestamp_ms);
        }
        (self.callback)(ClassifiedEvent {
            kind: classification.kind,
            magnitude: classification.magnitude,
            signature,
            source,
            timestamp_ms,
        });
    }

    /// Start the simulated loop unless one is already scheduling itself.
    fn ensure_simulated_loop(&self) {
        {
            let mut guard = self.lock();
            if guard.sim_running || guard.stopped {
                return;
            }
            guard.sim_running = true;
        }
        log::info!("[feed] starting simulated feed");
        let ctx = self.clone();
        tokio::spawn(async move { run_simulated_loop(ctx).await });
    }
}

pub struct FeedController {
    ctx: FeedContext,
    transport: Option<Arc<dyn FeedTransport>>,
    connection_task: Option<JoinHandle<()>>,
    stop_tx: Option<mpsc::Sender<()>>,
    running: bool,
}

impl FeedController {
    /// `transport` is `None` when no credential is available.
    pub fn new(
        transport: Option<Arc<dyn FeedTransport>>,
        callback: impl Fn(ClassifiedEvent) + Send + Sync + 'static,
    ) -> Self {
        Self::with_timing(transport, callback, FeedTiming::default())
    }

    pub fn with_timing(
        transport: Option<Arc<dyn FeedTransport>>,
        callback: impl Fn(ClassifiedEvent) + Send + Sync + 'static,
        timing: FeedTiming,
    ) -> Self {
        let shared = FeedShared {
            state: FeedConnectionState::Disconnected,
            stopped: false,
            sim_running: false,
            reconnect_delay: timing.initial_reconnect,
            event_count: 0,
            last_event_ms: None,
        };
        Self {
            ctx: FeedContext {
                shared: Arc::new(Mutex::new(shared)),
                callback: Arc::new(callback),
                timing,
            },
            transport,
            connection_task: None,
            stop_tx: None,
            running: false,
        }
    }

    /// Begin producing events. Must be called inside a tokio runtime.
    /// Calling it again while running does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        {
            let mut guard = self.ctx.lock();
            guard.stopped = false;
            guard.reconnect_delay = self.ctx.timing.initial_reconnect;
        }

        let Some(transport) = self.transport.clone() else {
            log::info!("[feed] no credential, running simulated feed only");
            self.ctx.set_state(FeedConnectionState::Simulated);
            self.ctx.ensure_simulated_loop();
            return;
        };

        self.ctx.set_state(FeedConnectionState::Connecting);
        let (stop_tx, stop_rx) = mpsc::channel::<()>(1);
        let ctx = self.ctx.clone();
        self.connection_task = Some(tokio::spawn(async move {
            run_connection_loop(ctx, transport, stop_rx).await;
        }));
        self.stop_tx = Some(stop_tx);
    }

    /// Stop the transport. Idempotent. A simulated loop already waiting on
    /// its timer exits when it next wakes.
    pub fn stop(&mut self) {
        self.running = false;
        {
            let mut guard = self.ctx.lock();
            if guard.stopped {
                return;
            }
            guard.stopped = true;
            guard.state = FeedConnectionState::Disconnected;
        }
        let signalled = self
            .stop_tx
            .take()
            .map(|tx| tx.try_send(()).is_ok())
            .unwrap_or(false);
        if let Some(task) = self.connection_task.take() {
            if !signalled {
                task.abort();
            }
        }
        log::info!("[feed] stopped");
    }

    pub fn state(&self) -> FeedConnectionState {
        self.ctx.lock().state
    }

    pub fn stats(&self) -> FeedStats {
        let guard = self.ctx.lock();
        let now = chrono::Utc::now().timestamp_millis();
        FeedStats {
            connected: guard.state == FeedConnectionState::Live,
            state: guard.state,
            event_count: guard.event_count,
            last_event_ms: guard.last_event_ms,
            ms_since_last_event: guard.last_event_ms.map(|t| (now - t).max(0)),
        }
    }

    /// Backoff that the next transport failure will wait before reconnecting.
    pub fn reconnect_delay(&self) -> Duration {
        self.ctx.lock().reconnect_delay
    }
}

impl Drop for FeedController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn connect_and_subscribe(
    transport: &dyn FeedTransport,
) -> anyhow::Result<Box<dyn FeedConnection>> {
    let mut conn = transport.connect().await?;
    conn.subscribe().await?;
    Ok(conn)
}

async fn run_connection_loop(
    ctx: FeedContext,
    transport: Arc<dyn FeedTransport>,
    mut stop_rx: mpsc::Receiver<()>,
) {
    'reconnect: loop {
        ctx.set_state(FeedConnectionState::Connecting);

        let attempt = tokio::select! {
            _ = stop_rx.recv() => break 'reconnect,
            result = connect_and_subscribe(transport.as_ref()) => result,
        };

        match attempt {
            Ok(mut conn) => {
                {
                    let mut guard = ctx.lock();
                    if guard.stopped {
                        break 'reconnect;
                    }
                    guard.reconnect_delay = ctx.timing.initial_reconnect;
                }
                ctx.set_state(FeedConnectionState::Live);

                loop {
                    let message = tokio::select! {
                        _ = stop_rx.recv() => break 'reconnect,
                        message = conn.next_message() => message,
                    };
                    match message {
                        Ok(Some(raw)) => {
                            let classification = classify(&raw.logs);
                            ctx.deliver(classification, raw.signature, EventSource::Live);
                        }
                        Ok(None) => {
                            log::warn!("[feed] live connection closed");
                            break;
                        }
                        Err(e) => {
                            log::warn!("[feed] live connection failed: {e:#}");
                            break;
                        }
                    }
                }
            }
            Err(e) => log::warn!("[feed] connect failed: {e:#}"),
        }

        let delay = {
            let mut guard = ctx.lock();
            if guard.stopped {
                break 'reconnect;
            }
            let delay = guard.reconnect_delay;
            guard.reconnect_delay = ctx.timing.next_reconnect_delay(delay);
            delay
        };
        ctx.set_state(FeedConnectionState::Disconnected);
        ctx.ensure_simulated_loop();

        log::info!("[feed] reconnecting in {}ms", delay.as_millis());
        tokio::select! {
            _ = stop_rx.recv() => break 'reconnect,
            _ = sleep(delay) => {}
        }
    }
    log::debug!("[feed] connection loop exited");
}

async fn run_simulated_loop(ctx: FeedContext) {
    let mut rng = StdRng::from_entropy();
    let (min_ms, max_ms) = ctx.timing.sim_interval_ms;

    loop {
        let wait = rng.gen_range(min_ms..=max_ms.max(min_ms));
        sleep(Duration::from_millis(wait)).await;

        {
            let mut guard = ctx.lock();
            if guard.stopped || guard.state == FeedConnectionState::Live {
                guard.sim_running = false;
                log::info!("[feed] simulated feed superseded");
                return;
            }
        }

        let classification = simulator::synthesize(&mut rng);
        let signature = format!("sim-{}", uuid::Uuid::new_v4().simple());
        ctx.deliver(classification, signature, EventSource::Simulated);
    }
}
