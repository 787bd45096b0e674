//! World module
//!
//! Contains the tile grid, random placement and the level model.

pub mod map;
pub mod generation;
pub mod level;

pub use map::TileGrid;
pub use generation::GenerationError;
pub use level::{EntityView, LevelModel, LevelRules, LevelSnapshot};
