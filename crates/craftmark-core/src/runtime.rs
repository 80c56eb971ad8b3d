//! Async driver for the recorder.
//!
//! [`SessionRuntime`] owns the timer, the history and the click effects, and
//! mutates them from a single task in message-arrival order. Clients talk to
//! it through a cloneable [`SessionHandle`].
//!
//! Two kinds of background task feed the loop:
//!
//! - the ticker, a repeating one-second interval that exists only while
//!   recording. At most one is alive; starting aborts any previous ticker and
//!   stopping aborts it before the stop is applied. Every tick carries the
//!   generation of the ticker that sent it, so a tick already queued when the
//!   ticker was aborted is discarded.
//! - one sleep per click effect, which sends the expiry for that effect only.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::effects::{ClickEffect, EffectId, EffectTracker};
use crate::error::RuntimeError;
use crate::events::Event;
use crate::format;
use crate::session::{Session, SessionId, SessionStore};
use crate::storage::Config;
use crate::timer::{CraftTimer, TimerState};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Produces the date a stopped session is filed under.
pub type DateSource = Box<dyn Fn() -> String + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub tick_interval: Duration,
    pub effect_lifetime: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            effect_lifetime: Duration::from_millis(crate::effects::DEFAULT_EFFECT_LIFETIME_MS),
        }
    }
}

impl From<&Config> for RuntimeOptions {
    fn from(config: &Config) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.timer.tick_interval_ms.max(1)),
            effect_lifetime: Duration::from_millis(config.effects.lifetime_ms),
        }
    }
}

/// Point-in-time view of the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSnapshot {
    pub state: TimerState,
    pub duration: u64,
    pub taps: u64,
    pub clock: String,
    pub active_effects: usize,
    pub sessions: usize,
}

enum Command {
    Toggle(oneshot::Sender<Option<Event>>),
    Tap {
        x: f64,
        y: f64,
        reply: oneshot::Sender<Option<Event>>,
    },
    Delete {
        id: SessionId,
        reply: oneshot::Sender<bool>,
    },
    Snapshot(oneshot::Sender<RuntimeSnapshot>),
    Sessions(oneshot::Sender<Vec<Session>>),
    Effects(oneshot::Sender<Vec<ClickEffect>>),
    Shutdown(oneshot::Sender<SessionStore>),
}

/// Messages from the runtime's own background tasks.
enum Internal {
    Tick { generation: u64 },
    ExpireEffect(EffectId),
}

pub struct SessionRuntime {
    timer: CraftTimer,
    store: SessionStore,
    effects: EffectTracker,
    options: RuntimeOptions,
    date_source: DateSource,
    epoch: Instant,
    ticker: Option<JoinHandle<()>>,
    generation: u64,
    expiries: HashMap<EffectId, JoinHandle<()>>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    events: broadcast::Sender<Event>,
}

impl SessionRuntime {
    /// Spawn the runtime loop on the current tokio runtime.
    pub fn spawn(timer: CraftTimer, store: SessionStore, options: RuntimeOptions) -> SessionHandle {
        Self::spawn_with_dates(timer, store, options, Box::new(format::today))
    }

    /// Like [`SessionRuntime::spawn`] with a custom date for stopped sessions.
    pub fn spawn_with_dates(
        timer: CraftTimer,
        store: SessionStore,
        options: RuntimeOptions,
        date_source: DateSource,
    ) -> SessionHandle {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (internal_tx, internal) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let runtime = SessionRuntime {
            timer,
            effects: EffectTracker::new(options.effect_lifetime.as_millis() as u64),
            store,
            options,
            date_source,
            epoch: Instant::now(),
            ticker: None,
            generation: 0,
            expiries: HashMap::new(),
            internal_tx,
            events: events.clone(),
        };
        tokio::spawn(runtime.run(commands, internal));

        SessionHandle { tx, events }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut internal: mpsc::UnboundedReceiver<Internal>,
    ) {
        loop {
            tokio::select! {
                biased;
                Some(msg) = internal.recv() => self.handle_internal(msg),
                cmd = commands.recv() => match cmd {
                    Some(cmd) => {
                        if !self.handle_command(cmd) {
                            return;
                        }
                    }
                    None => {
                        tracing::debug!("all session handles dropped");
                        self.teardown();
                        return;
                    }
                },
            }
        }
    }

    /// Returns `false` once the loop should exit.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Toggle(reply) => {
                let event = self.toggle();
                let _ = reply.send(event);
            }
            Command::Tap { x, y, reply } => {
                let event = self.tap(x, y);
                let _ = reply.send(event);
            }
            Command::Delete { id, reply } => {
                let deleted = self.store.delete(id);
                if deleted {
                    self.emit(Event::SessionDeleted {
                        id,
                        at: chrono::Utc::now(),
                    });
                }
                let _ = reply.send(deleted);
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Sessions(reply) => {
                let _ = reply.send(self.store.sessions().to_vec());
            }
            Command::Effects(reply) => {
                let _ = reply.send(self.effects.active().to_vec());
            }
            Command::Shutdown(reply) => {
                self.teardown();
                let _ = reply.send(std::mem::take(&mut self.store));
                return false;
            }
        }
        true
    }

    fn handle_internal(&mut self, msg: Internal) {
        match msg {
            Internal::Tick { generation } => {
                if generation != self.generation {
                    tracing::trace!(generation, "stale tick dropped");
                    return;
                }
                if let Some(event) = self.timer.tick() {
                    self.emit(event);
                }
            }
            Internal::ExpireEffect(id) => {
                self.expiries.remove(&id);
                if self.effects.expire(id) {
                    self.emit(Event::EffectExpired { id });
                }
            }
        }
    }

    fn toggle(&mut self) -> Option<Event> {
        let event = match self.timer.state() {
            TimerState::Idle => {
                let event = self.timer.start();
                self.start_ticker();
                event
            }
            TimerState::Recording => {
                self.stop_ticker();
                let date = (self.date_source)();
                self.timer.stop(&mut self.store, date)
            }
        };
        if let Some(ref event) = event {
            self.emit(event.clone());
        }
        event
    }

    fn tap(&mut self, x: f64, y: f64) -> Option<Event> {
        let now_ms = self.epoch.elapsed().as_millis() as u64;
        let event = self.timer.tap(x, y, &mut self.effects, now_ms)?;
        if let Event::Tapped { effect, .. } = &event {
            self.schedule_expiry(effect);
        }
        self.emit(event.clone());
        Some(event)
    }

    fn snapshot(&self) -> RuntimeSnapshot {
        RuntimeSnapshot {
            state: self.timer.state(),
            duration: self.timer.duration(),
            taps: self.timer.taps(),
            clock: format::clock(self.timer.duration()),
            active_effects: self.effects.len(),
            sessions: self.store.len(),
        }
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        self.generation += 1;
        let generation = self.generation;
        let period = self.options.tick_interval;
        let tx = self.internal_tx.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(Internal::Tick { generation }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        // Ticks already queued from the aborted ticker no longer match.
        self.generation += 1;
    }

    fn schedule_expiry(&mut self, effect: &ClickEffect) {
        let id = effect.id;
        let deadline =
            self.epoch + Duration::from_millis(effect.expires_at_ms(self.effects.lifetime_ms()));
        let tx = self.internal_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(Internal::ExpireEffect(id));
        });
        self.expiries.insert(id, handle);
    }

    fn teardown(&mut self) {
        self.stop_ticker();
        for (_, handle) in self.expiries.drain() {
            handle.abort();
        }
        self.effects.clear();
    }

    fn emit(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

/// Cloneable client for a running [`SessionRuntime`].
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
    events: broadcast::Sender<Event>,
}

impl SessionHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await?;
        Ok(rx.await?)
    }

    /// Start recording when idle, stop and file the session when recording.
    pub async fn toggle(&self) -> Result<Option<Event>, RuntimeError> {
        self.request(Command::Toggle).await
    }

    /// Screen tap at `(x, y)`. `None` when not recording.
    pub async fn tap(&self, x: f64, y: f64) -> Result<Option<Event>, RuntimeError> {
        self.request(|reply| Command::Tap { x, y, reply }).await
    }

    /// Delete a session from history. `false` if it did not exist.
    pub async fn delete(&self, id: SessionId) -> Result<bool, RuntimeError> {
        self.request(|reply| Command::Delete { id, reply }).await
    }

    pub async fn snapshot(&self) -> Result<RuntimeSnapshot, RuntimeError> {
        self.request(Command::Snapshot).await
    }

    /// History, newest first.
    pub async fn sessions(&self) -> Result<Vec<Session>, RuntimeError> {
        self.request(Command::Sessions).await
    }

    pub async fn effects(&self) -> Result<Vec<ClickEffect>, RuntimeError> {
        self.request(Command::Effects).await
    }

    /// Stop all background tasks and hand back the history.
    /// A session still recording is discarded, not filed.
    pub async fn shutdown(self) -> Result<SessionStore, RuntimeError> {
        self.request(Command::Shutdown).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
