use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::effects::{ClickEffect, EffectId};
use crate::session::{Session, SessionId};
use crate::timer::TimerState;

/// Every state change in the system produces an Event.
/// Front ends render from these; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RecordingStarted {
        at: DateTime<Utc>,
    },
    /// One second of recording elapsed.
    Tick {
        duration: u64,
    },
    Tapped {
        taps: u64,
        effect: ClickEffect,
        at: DateTime<Utc>,
    },
    RecordingStopped {
        session: Session,
        at: DateTime<Utc>,
    },
    SessionDeleted {
        id: SessionId,
        at: DateTime<Utc>,
    },
    EffectExpired {
        id: EffectId,
    },
    StateSnapshot {
        state: TimerState,
        duration: u64,
        taps: u64,
        clock: String,
        at: DateTime<Utc>,
    },
}
