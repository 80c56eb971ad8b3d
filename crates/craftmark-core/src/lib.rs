//! # Craftmark Core Library
//!
//! This library provides the core logic for Craftmark, a recorder for manual
//! craft sessions. A session is timed while recording, every tap during it is
//! counted, and stopping files the session at the front of the history.
//! Front ends (the CLI today) are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Timer**: A caller-driven state machine (`Idle` / `Recording`) counting
//!   seconds and taps
//! - **Session Store**: In-memory, newest-first history of completed sessions
//! - **Effects**: Self-expiring click markers dropped at each counted tap
//! - **Runtime**: Tokio task that owns all of the above and drives the
//!   one-second tick and effect expiry
//! - **Platform bridges**: Injectable haptics and install-prompt capabilities
//!
//! ## Key Components
//!
//! - [`CraftTimer`]: Core recording state machine
//! - [`SessionStore`]: Session history
//! - [`SessionRuntime`]: Async owner of the recorder state
//! - [`Config`]: Application configuration management

pub mod effects;
pub mod error;
pub mod events;
pub mod format;
pub mod haptics;
pub mod install;
pub mod nebula;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod timer;

pub use effects::{ClickEffect, EffectId, EffectTracker};
pub use error::{ConfigError, CoreError, RuntimeError};
pub use events::Event;
pub use haptics::{HapticKind, HapticPatterns, Haptics, LogHaptics, NoopHaptics, RecordingHaptics};
pub use install::{DeferredPrompt, InstallBridge, InstallOutcome, InstallResult};
pub use nebula::{NebulaField, Particle, ParticleColor};
pub use runtime::{RuntimeOptions, RuntimeSnapshot, SessionHandle, SessionRuntime};
pub use session::{Session, SessionId, SessionStore, SessionTotals};
pub use storage::Config;
pub use timer::{CraftTimer, TimerState};
