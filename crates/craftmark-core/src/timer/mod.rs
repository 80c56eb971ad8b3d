mod engine;

pub use engine::{CraftTimer, TimerState};
