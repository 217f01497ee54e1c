pub mod game;
pub mod selection;
pub mod timer;

pub use game::{GameSession, GameState, SessionSnapshot, TickOutcome};
