//! Click effects: short-lived visual markers dropped at each counted tap.
//!
//! Each effect expires on its own after a fixed lifetime. The tracker is the
//! only thing that mutates the active set.

use serde::{Deserialize, Serialize};

/// Default lifetime of a click effect.
pub const DEFAULT_EFFECT_LIFETIME_MS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickEffect {
    pub id: EffectId,
    pub x: f64,
    pub y: f64,
    /// Creation timestamp in milliseconds.
    pub created_at_ms: u64,
}

impl ClickEffect {
    /// Millisecond at which an effect with this lifetime should disappear.
    pub fn expires_at_ms(&self, lifetime_ms: u64) -> u64 {
        self.created_at_ms.saturating_add(lifetime_ms)
    }
}

#[derive(Debug, Clone)]
pub struct EffectTracker {
    active: Vec<ClickEffect>,
    next_id: u64,
    lifetime_ms: u64,
}

impl Default for EffectTracker {
    fn default() -> Self {
        Self::new(DEFAULT_EFFECT_LIFETIME_MS)
    }
}

impl EffectTracker {
    pub fn new(lifetime_ms: u64) -> Self {
        Self {
            active: Vec::new(),
            next_id: 0,
            lifetime_ms,
        }
    }

    pub fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }

    /// Add an effect at `(x, y)` created at `now_ms`.
    ///
    /// Ids come from a counter, so two taps in the same millisecond still get
    /// distinct effects.
    pub fn enqueue(&mut self, x: f64, y: f64, now_ms: u64) -> ClickEffect {
        self.next_id += 1;
        let effect = ClickEffect {
            id: EffectId(self.next_id),
            x,
            y,
            created_at_ms: now_ms,
        };
        self.active.push(effect);
        effect
    }

    /// Remove the effect if it is still active.
    pub fn expire(&mut self, id: EffectId) -> bool {
        let before = self.active.len();
        self.active.retain(|e| e.id != id);
        let removed = self.active.len() != before;
        if removed {
            tracing::trace!(effect = id.0, "click effect expired");
        }
        removed
    }

    pub fn active(&self) -> &[ClickEffect] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
