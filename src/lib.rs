//! Treasure Mine - simulation core of a tile-based mining dungeon
//!
//! Dig through obstacles, fight the creatures of the mine and find the
//! hidden exit to go one level deeper. This crate holds the pure simulation:
//! a presentation layer feeds it pointer positions and tool events and draws
//! the reports it returns.

pub mod game;
pub mod ecs;
pub mod world;
pub mod combat;
pub mod items;
pub mod progression;
pub mod save;
pub mod data;

// Re-export commonly used types
pub use game::{Game, GameError, GameState};
pub use ecs::components::*;
pub use ecs::MoveOutcome;
pub use world::{LevelModel, LevelSnapshot, TileGrid};
pub use combat::{AttackReport, HitReport};
pub use data::GameConfig;
