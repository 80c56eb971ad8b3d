//! Newest-first session history.
//!
//! Every mutator keeps the most recent session at index 0. Nothing here is
//! persisted; the history lives as long as its owner.

use serde::{Deserialize, Serialize};

use super::{Session, SessionId};

/// Aggregates over the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub sessions: usize,
    pub duration: u64,
    pub taps: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    sessions: Vec<Session>,
    last_id: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// History pre-populated with two demo sessions.
    pub fn with_seed() -> Self {
        Self::from_sessions(vec![
            Session {
                id: SessionId(1),
                date: "2026.05.20".into(),
                duration: 5400,
                taps: 124,
                craft_type: "Woodwork".into(),
            },
            Session {
                id: SessionId(2),
                date: "2026.05.19".into(),
                duration: 3200,
                taps: 89,
                craft_type: "Leatherwork".into(),
            },
        ])
    }

    /// Build a store from sessions already ordered newest-first.
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        let last_id = sessions.iter().map(|s| s.id.0).max().unwrap_or(0);
        Self { sessions, last_id }
    }

    /// Hand out a fresh identifier, never equal to one already issued or seeded.
    pub fn next_id(&mut self) -> SessionId {
        self.last_id += 1;
        SessionId(self.last_id)
    }

    /// Insert at the front.
    pub fn append(&mut self, session: Session) {
        self.last_id = self.last_id.max(session.id.0);
        self.sessions.insert(0, session);
    }

    /// Remove the session with `id`. Returns `false` if there was none.
    pub fn delete(&mut self, id: SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        self.sessions.len() != before
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|s| s.id).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn totals(&self) -> SessionTotals {
        self.sessions.iter().fold(
            SessionTotals {
                sessions: self.sessions.len(),
                ..SessionTotals::default()
            },
            |mut acc, s| {
                acc.duration += s.duration;
                acc.taps += s.taps;
                acc
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(store: &mut SessionStore, duration: u64) -> Session {
        Session {
            id: store.next_id(),
            date: "2026.10.18".into(),
            duration,
            taps: 0,
            craft_type: "New craft".into(),
        }
    }

    #[test]
    fn append_prepends() {
        let mut store = SessionStore::with_seed();
        let s = session(&mut store, 10);
        let id = s.id;
        store.append(s);
        assert_eq!(store.ids(), vec![id, SessionId(1), SessionId(2)]);
    }

    #[test]
    fn next_id_continues_after_seed() {
        let mut store = SessionStore::with_seed();
        assert_eq!(store.next_id(), SessionId(3));
        assert_eq!(store.next_id(), SessionId(4));
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let mut store = SessionStore::with_seed();
        assert!(!store.delete(SessionId(99)));
        assert_eq!(store.ids(), vec![SessionId(1), SessionId(2)]);
    }

    #[test]
    fn delete_removes_match() {
        let mut store = SessionStore::with_seed();
        assert!(store.delete(SessionId(1)));
        assert_eq!(store.ids(), vec![SessionId(2)]);
        assert!(store.get(SessionId(1)).is_none());
    }

    #[test]
    fn ids_stay_unique_after_delete() {
        let mut store = SessionStore::new();
        let a = session(&mut store, 1);
        let a_id = a.id;
        store.append(a);
        store.delete(a_id);
        assert_ne!(store.next_id(), a_id);
    }

    #[test]
    fn totals_sum_history() {
        let totals = SessionStore::with_seed().totals();
        assert_eq!(totals.sessions, 2);
        assert_eq!(totals.duration, 8600);
        assert_eq!(totals.taps, 213);
        assert_eq!(SessionStore::new().totals(), SessionTotals::default());
    }
}
