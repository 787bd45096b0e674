//! Depth tracking
//!
//! Keeps the current depth of a session. Advancing never touches the level
//! itself; the caller regenerates the level for the new depth.

use super::difficulty::difficulty_multiplier;

/// Tracks the current and deepest depth reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionTracker {
    depth: u32,
    highest: u32,
}

impl ProgressionTracker {
    /// Start at depth 1
    pub fn new() -> Self {
        Self { depth: 1, highest: 1 }
    }

    /// Resume at a previously reached depth
    pub fn with_depth(depth: u32) -> Self {
        let depth = depth.max(1);
        Self { depth, highest: depth }
    }

    /// Resume with a known deepest depth
    pub fn resume(depth: u32, highest: u32) -> Self {
        let depth = depth.max(1);
        Self { depth, highest: highest.max(depth) }
    }

    pub fn current_depth(&self) -> u32 {
        self.depth
    }

    pub fn highest_depth(&self) -> u32 {
        self.highest
    }

    /// Go one level deeper and return the new depth
    pub fn advance(&mut self) -> u32 {
        self.depth += 1;
        self.highest = self.highest.max(self.depth);
        self.depth
    }

    /// Multiplier for the current depth
    pub fn multiplier(&self) -> i32 {
        difficulty_multiplier(self.depth)
    }
}

impl Default for ProgressionTracker {
    fn default() -> Self {
        Self::new()
    }
}
