//! Haptic feedback abstraction.
//!
//! The platform vibration capability is fire-and-forget: nothing is returned,
//! nothing is surfaced on failure, and a missing capability is simply a no-op.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Which event a vibration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticKind {
    Start,
    Stop,
    Tap,
}

/// Pulse patterns in milliseconds, one per [`HapticKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticPatterns {
    pub start: Vec<u32>,
    pub stop: Vec<u32>,
    pub tap: Vec<u32>,
}

impl HapticPatterns {
    pub fn get(&self, kind: HapticKind) -> &[u32] {
        match kind {
            HapticKind::Start => &self.start,
            HapticKind::Stop => &self.stop,
            HapticKind::Tap => &self.tap,
        }
    }
}

impl Default for HapticPatterns {
    fn default() -> Self {
        Self {
            start: vec![15],
            // Heavier three-pulse pattern marks the end of a session.
            stop: vec![30, 50, 30],
            tap: vec![5],
        }
    }
}

/// A platform's vibration capability.
pub trait Haptics: Send + Sync {
    /// Request a vibration with the given pulse pattern.
    fn vibrate(&self, pattern: &[u32]);
}

/// Used when the platform has no vibration support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn vibrate(&self, _pattern: &[u32]) {}
}

/// Emits each vibration request as a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn vibrate(&self, pattern: &[u32]) {
        tracing::debug!(?pattern, "vibrate");
    }
}

/// Records every requested pattern. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingHaptics {
    log: Arc<Mutex<Vec<Vec<u32>>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns requested so far, oldest first.
    pub fn patterns(&self) -> Vec<Vec<u32>> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.log.lock().map(|log| log.len()).unwrap_or(0)
    }
}

impl Haptics for RecordingHaptics {
    fn vibrate(&self, pattern: &[u32]) {
        if let Ok(mut log) = self.log.lock() {
            log.push(pattern.to_vec());
        }
    }
}
