//! Damage calculation
//!
//! Damage in the mine is a uniform roll inside an inclusive range.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive `(low, high)` damage bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub low: i32,
    pub high: i32,
}

impl DamageRange {
    /// Create a range; bounds given in the wrong order are swapped
    pub fn new(low: i32, high: i32) -> Self {
        if low <= high {
            Self { low, high }
        } else {
            Self { low: high, high: low }
        }
    }

    /// A range that always rolls the same value
    pub fn fixed(value: i32) -> Self {
        Self { low: value, high: value }
    }

    /// Both bounds multiplied by the difficulty multiplier
    pub fn scaled(&self, multiplier: i32) -> Self {
        Self::new(self.low * multiplier, self.high * multiplier)
    }

    pub fn contains(&self, value: i32) -> bool {
        let (low, high) = self.bounds();
        (low..=high).contains(&value)
    }

    /// Draw a damage value uniformly from the range
    pub fn roll(&self, rng: &mut impl Rng) -> i32 {
        let (low, high) = self.bounds();
        rng.gen_range(low..=high)
    }

    /// Ordered bounds; the fields are public and may arrive reversed
    fn bounds(&self) -> (i32, i32) {
        (self.low.min(self.high), self.low.max(self.high))
    }
}

impl From<(i32, i32)> for DamageRange {
    fn from((low, high): (i32, i32)) -> Self {
        Self::new(low, high)
    }
}
