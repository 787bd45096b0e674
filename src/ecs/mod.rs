//! Entity Component System module
//!
//! Defines the components carried by level entities and the movement
//! systems that operate on them.

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::{is_occupied, move_creature, move_player, MoveOutcome};
