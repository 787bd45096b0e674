//! Game module - session flow and tick scheduling

mod state;
mod time;

pub use state::{CreatureTick, Game, GameError, GameState, TickEvent};
pub use time::TickTimer;
