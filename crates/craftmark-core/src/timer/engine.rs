//! Recording state machine.
//!
//! Like a stopwatch with a clicker attached: `start` zeroes both counters,
//! `tick` adds a second, `tap` adds a tap, and `stop` turns the counters into
//! a [`Session`] at the front of the history.
//!
//! The machine owns no timer. The caller drives `tick()` once per second
//! while recording (see [`crate::runtime`] for the async driver).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Recording -> Idle -> ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = CraftTimer::new();
//! timer.start();
//! timer.tap(120.0, 300.0, &mut effects, now_ms);
//! timer.tick();
//! timer.stop(&mut store, format::today());
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::effects::EffectTracker;
use crate::events::Event;
use crate::format;
use crate::haptics::{HapticKind, HapticPatterns, Haptics, NoopHaptics};
use crate::session::{Session, SessionStore, DEFAULT_CRAFT_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Recording,
}

/// Core session timer and tap counter.
pub struct CraftTimer {
    state: TimerState,
    /// Seconds recorded since the last start.
    duration: u64,
    /// Taps counted since the last start.
    taps: u64,
    default_type: String,
    patterns: HapticPatterns,
    haptics: Arc<dyn Haptics>,
}

impl fmt::Debug for CraftTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CraftTimer")
            .field("state", &self.state)
            .field("duration", &self.duration)
            .field("taps", &self.taps)
            .field("default_type", &self.default_type)
            .finish_non_exhaustive()
    }
}

impl Default for CraftTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CraftTimer {
    /// Idle timer with no haptics and the stock patterns.
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            duration: 0,
            taps: 0,
            default_type: DEFAULT_CRAFT_TYPE.to_string(),
            patterns: HapticPatterns::default(),
            haptics: Arc::new(NoopHaptics),
        }
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn Haptics>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn with_patterns(mut self, patterns: HapticPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Label given to sessions created by `stop`.
    pub fn with_default_type(mut self, craft_type: impl Into<String>) -> Self {
        self.default_type = craft_type.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == TimerState::Recording
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn taps(&self) -> u64 {
        self.taps
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            duration: self.duration,
            taps: self.taps,
            clock: format::clock(self.duration),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.duration = 0;
                self.taps = 0;
                self.state = TimerState::Recording;
                self.vibrate(HapticKind::Start);
                tracing::debug!("recording started");
                Some(Event::RecordingStarted { at: Utc::now() })
            }
            TimerState::Recording => None,
        }
    }

    /// Finish the session and prepend it to `store`.
    ///
    /// `date` is the local calendar date the session is filed under.
    pub fn stop(&mut self, store: &mut SessionStore, date: impl Into<String>) -> Option<Event> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Recording => {
                let session = Session {
                    id: store.next_id(),
                    date: date.into(),
                    duration: self.duration,
                    taps: self.taps,
                    craft_type: self.default_type.clone(),
                };
                store.append(session.clone());
                self.vibrate(HapticKind::Stop);
                self.state = TimerState::Idle;
                self.duration = 0;
                self.taps = 0;
                tracing::debug!(
                    id = session.id.0,
                    duration = session.duration,
                    taps = session.taps,
                    "recording stopped"
                );
                Some(Event::RecordingStopped {
                    session,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Start when idle, stop when recording.
    pub fn toggle(&mut self, store: &mut SessionStore, date: impl Into<String>) -> Option<Event> {
        match self.state {
            TimerState::Idle => self.start(),
            TimerState::Recording => self.stop(store, date),
        }
    }

    /// Count one second. Ignored while idle.
    pub fn tick(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Recording => {
                self.duration += 1;
                Some(Event::Tick {
                    duration: self.duration,
                })
            }
            TimerState::Idle => None,
        }
    }

    /// Register a screen tap at `(x, y)`.
    ///
    /// While idle the tap is dropped entirely: no count, no vibration and no
    /// click effect.
    pub fn tap(
        &mut self,
        x: f64,
        y: f64,
        effects: &mut EffectTracker,
        now_ms: u64,
    ) -> Option<Event> {
        if self.state != TimerState::Recording {
            return None;
        }
        self.taps += 1;
        self.vibrate(HapticKind::Tap);
        let effect = effects.enqueue(x, y, now_ms);
        Some(Event::Tapped {
            taps: self.taps,
            effect,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn vibrate(&self, kind: HapticKind) {
        self.haptics.vibrate(self.patterns.get(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haptics::RecordingHaptics;

    #[test]
    fn start_stop_toggle() {
        let mut timer = CraftTimer::new();
        let mut store = SessionStore::new();
        assert_eq!(timer.state(), TimerState::Idle);

        assert!(timer.toggle(&mut store, "2026.10.18").is_some());
        assert_eq!(timer.state(), TimerState::Recording);

        assert!(timer.toggle(&mut store, "2026.10.18").is_some());
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn start_while_recording_is_noop() {
        let mut timer = CraftTimer::new();
        timer.start();
        timer.tick();
        assert!(timer.start().is_none());
        assert_eq!(timer.duration(), 1);
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let mut timer = CraftTimer::new();
        let mut store = SessionStore::new();
        assert!(timer.stop(&mut store, "2026.10.18").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn tick_only_counts_while_recording() {
        let mut timer = CraftTimer::new();
        assert!(timer.tick().is_none());
        assert_eq!(timer.duration(), 0);

        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(timer.duration(), 2);
    }

    #[test]
    fn idle_tap_is_ignored() {
        let haptics = RecordingHaptics::new();
        let mut timer = CraftTimer::new().with_haptics(Arc::new(haptics.clone()));
        let mut effects = EffectTracker::default();

        assert!(timer.tap(10.0, 10.0, &mut effects, 0).is_none());
        assert_eq!(timer.taps(), 0);
        assert!(effects.is_empty());
        assert_eq!(haptics.count(), 0);
    }

    #[test]
    fn haptic_patterns_follow_events() {
        let haptics = RecordingHaptics::new();
        let mut timer = CraftTimer::new().with_haptics(Arc::new(haptics.clone()));
        let mut effects = EffectTracker::default();
        let mut store = SessionStore::new();

        timer.start();
        timer.tap(1.0, 1.0, &mut effects, 0);
        timer.stop(&mut store, "2026.10.18");

        assert_eq!(
            haptics.patterns(),
            vec![vec![15], vec![5], vec![30, 50, 30]]
        );
    }

    #[test]
    fn stop_uses_default_type_and_resets() {
        let mut timer = CraftTimer::new().with_default_type("Pottery");
        let mut store = SessionStore::new();
        let mut effects = EffectTracker::default();

        timer.start();
        timer.tick();
        timer.tap(0.0, 0.0, &mut effects, 0);
        let event = timer.stop(&mut store, "2026.10.18");

        match event {
            Some(Event::RecordingStopped { session, .. }) => {
                assert_eq!(session.craft_type, "Pottery");
                assert_eq!(session.duration, 1);
                assert_eq!(session.taps, 1);
                assert_eq!(session.date, "2026.10.18");
            }
            other => panic!("Expected RecordingStopped, got {other:?}"),
        }
        assert_eq!(timer.duration(), 0);
        assert_eq!(timer.taps(), 0);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let mut timer = CraftTimer::new();
        timer.start();
        for _ in 0..61 {
            timer.tick();
        }
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                duration,
                clock,
                ..
            } => {
                assert_eq!(state, TimerState::Recording);
                assert_eq!(duration, 61);
                assert_eq!(clock, "00:01:01");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
