//! Tool definitions
//!
//! Mining and fighting tools the player can hold.

use serde::{Deserialize, Serialize};

use crate::combat::DamageRange;
use crate::ecs::EntityKind;

/// Tool categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Pickaxe,
    Sword,
}

impl ToolKind {
    /// The kind of entity this tool damages
    pub fn target_kind(&self) -> EntityKind {
        match self {
            ToolKind::Pickaxe => EntityKind::Obstacle,
            ToolKind::Sword => EntityKind::Creature,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pickaxe => "Pickaxe",
            ToolKind::Sword => "Sword",
        }
    }
}

/// Concrete tool templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    BasicPickaxe,
    BasicSword,
}

impl ToolType {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolType::BasicPickaxe => ToolKind::Pickaxe,
            ToolType::BasicSword => ToolKind::Sword,
        }
    }

    /// Base damage bounds of the template
    pub fn power(&self) -> DamageRange {
        match self {
            ToolType::BasicPickaxe => DamageRange::new(10, 30),
            ToolType::BasicSword => DamageRange::new(10, 30),
        }
    }

    pub fn tool(&self) -> Tool {
        Tool::new(self.kind(), self.power())
    }
}

/// A tool in hand: a kind plus its damage range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub kind: ToolKind,
    pub power: DamageRange,
}

impl Tool {
    pub fn new(kind: ToolKind, power: DamageRange) -> Self {
        Self { kind, power }
    }
}

impl Default for Tool {
    fn default() -> Self {
        ToolType::BasicPickaxe.tool()
    }
}
