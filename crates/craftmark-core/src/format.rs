//! Display helpers for the live clock and history cards.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::{Session, SessionId};

/// `HH:MM:SS`. Hours keep counting past 99 rather than wrapping.
pub fn clock(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// `YYYY.MM.DD`
pub fn session_date(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Today's local date in session format.
pub fn today() -> String {
    session_date(Local::now().date_naive())
}

/// What a history card shows for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCard {
    pub id: SessionId,
    pub date: String,
    pub clock: String,
    pub taps: u64,
    #[serde(rename = "type")]
    pub craft_type: String,
}

impl From<&Session> for SessionCard {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            date: session.date.clone(),
            clock: clock(session.duration),
            taps: session.taps,
            craft_type: session.craft_type.clone(),
        }
    }
}

impl std::fmt::Display for SessionCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:<4} {}  {}  {} taps  {}",
            self.id.0, self.date, self.clock, self.taps, self.craft_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats() {
        assert_eq!(clock(0), "00:00:00");
        assert_eq!(clock(5400), "01:30:00");
        assert_eq!(clock(3200), "00:53:20");
        assert_eq!(clock(100 * 3600 + 61), "100:01:01");
    }

    #[test]
    fn session_date_uses_dots() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();
        assert_eq!(session_date(date), "2026.05.02");
    }

    #[test]
    fn card_from_session() {
        let session = Session {
            id: SessionId(7),
            date: "2026.05.20".into(),
            duration: 5400,
            taps: 124,
            craft_type: "Woodwork".into(),
        };
        let card = SessionCard::from(&session);
        assert_eq!(card.clock, "01:30:00");
        assert!(card.to_string().contains("124 taps"));
    }
}
