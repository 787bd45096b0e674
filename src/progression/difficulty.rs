//! Depth-based difficulty scaling
//!
//! Obstacles and creatures get tougher as the player digs deeper. The
//! multiplier grows with the binary logarithm of the depth, so it steps up
//! at depths 3, 7, 15, 31 and so on.

use serde::{Deserialize, Serialize};

use crate::combat::DamageRange;

/// Difficulty multiplier for a depth: `max(1, floor(log2(depth + 1)))`
pub fn difficulty_multiplier(depth: u32) -> i32 {
    let depth = depth.saturating_add(1);
    depth.ilog2().max(1) as i32
}

// =============================================================================
// Depth Scaling
// =============================================================================

/// Scaling applied to everything spawned on one depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthScaling {
    /// Depth (1-indexed)
    pub depth: u32,
    /// Derived multiplier
    pub multiplier: i32,
}

impl DepthScaling {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            multiplier: difficulty_multiplier(depth),
        }
    }

    /// Scale a base health value
    pub fn scale_health(&self, base: i32) -> i32 {
        base * self.multiplier
    }

    /// Scale a base damage range
    pub fn scale_power(&self, base: DamageRange) -> DamageRange {
        base.scaled(self.multiplier)
    }
}
