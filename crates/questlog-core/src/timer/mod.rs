mod engine;

pub use engine::{TickUpdate, TimerEngine, TimerSession};
