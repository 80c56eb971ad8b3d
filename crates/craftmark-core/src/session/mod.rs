//! Completed craft sessions and the in-memory history that holds them.

mod store;

pub use store::{SessionStore, SessionTotals};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label for sessions nobody has named yet.
pub const DEFAULT_CRAFT_TYPE: &str = "New craft";

/// Identifier of a completed session, unique within a [`SessionStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A completed work interval. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Local calendar date at stop time, `YYYY.MM.DD`.
    pub date: String,
    /// Whole seconds spent recording.
    pub duration: u64,
    pub taps: u64,
    #[serde(rename = "type")]
    pub craft_type: String,
}
