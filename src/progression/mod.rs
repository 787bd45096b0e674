//! Progression systems

pub mod difficulty;
pub mod tracker;

pub use difficulty::{difficulty_multiplier, DepthScaling};
pub use tracker::ProgressionTracker;
