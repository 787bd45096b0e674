//! ECS Components
//!
//! All components attached to entities living in a mine level.

use serde::{Deserialize, Serialize};

use crate::combat::DamageRange;
use crate::items::Tool;

// ============================================================================
// Position
// ============================================================================

/// Position in the mine, in pixel units.
///
/// Every placed entity sits on a tile corner, so both coordinates are
/// multiples of the grid's tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a number of pixels on each axis
    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Stable handle of an entity inside a level.
pub type EntityId = hecs::Entity;

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Obstacle,
    Creature,
    ExitMarker,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Obstacle => "obstacle",
            EntityKind::Creature => "creature",
            EntityKind::ExitMarker => "exit",
        }
    }
}

// ============================================================================
// Combat Stats
// ============================================================================

/// Health pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage without clamping; health may go negative.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.current -= amount;
        self.current
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Melee power of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power(pub DamageRange);

/// The tool the player currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTool(pub Tool);

// ============================================================================
// Map Interaction
// ============================================================================

/// Entity blocks movement onto its tile
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksMovement;
