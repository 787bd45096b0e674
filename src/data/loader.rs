//! RON configuration loader
//!
//! Loads the mine's tunables from an external RON file, with fallback to the
//! built-in defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::combat::DamageRange;
use crate::items::{Tool, ToolKind};
use crate::world::{LevelRules, TileGrid};

/// Tunable parameters of a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playable area in pixels
    pub map_width: i32,
    pub map_height: i32,
    /// Tiles along the shorter side; also drives entity counts
    pub tile_amount: i32,
    pub player_health: i32,
    pub obstacle_base_health: i32,
    pub creature_base_health: i32,
    pub creature_power: (i32, i32),
    pub pickaxe_power: (i32, i32),
    pub sword_power: (i32, i32),
    /// Interval of the player movement tick
    pub player_tick_ms: u64,
    /// Interval of the creature movement / attack tick
    pub creature_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 800,
            map_height: 540,
            tile_amount: 20,
            player_health: 100,
            obstacle_base_health: 100,
            creature_base_health: 150,
            creature_power: (5, 15),
            pickaxe_power: (10, 30),
            sword_power: (10, 30),
            player_tick_ms: 100,
            creature_tick_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Parse a config from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        let config: GameConfig = ron::from_str(content).context("invalid game config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_ron(&content).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Load a config file, falling back to defaults when it is missing or
    /// broken
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Config loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Reject configs that cannot produce a playable grid
    pub fn validate(&self) -> Result<()> {
        ensure!(self.tile_amount > 0, "tile_amount must be positive");
        ensure!(
            self.map_width > 0 && self.map_height > 0,
            "map size must be positive, got {}x{}",
            self.map_width,
            self.map_height
        );
        ensure!(
            self.tile_grid().tile_size > 0,
            "map {}x{} is too small for {} tiles",
            self.map_width,
            self.map_height,
            self.tile_amount
        );
        ensure!(self.player_health > 0, "player_health must be positive");
        ensure!(
            self.obstacle_base_health > 0 && self.creature_base_health > 0,
            "base health values must be positive"
        );
        for (name, (low, high)) in [
            ("creature_power", self.creature_power),
            ("pickaxe_power", self.pickaxe_power),
            ("sword_power", self.sword_power),
        ] {
            ensure!(low >= 0 && low <= high, "{} must satisfy 0 <= low <= high", name);
        }
        ensure!(
            self.player_tick_ms > 0 && self.creature_tick_ms > 0,
            "tick intervals must be positive"
        );
        Ok(())
    }

    pub fn tile_grid(&self) -> TileGrid {
        TileGrid::fit(self.map_width, self.map_height, self.tile_amount)
    }

    pub fn level_rules(&self) -> LevelRules {
        let tile_amount = self.tile_amount.max(0) as usize;
        LevelRules {
            player_health: self.player_health,
            obstacle_base_health: self.obstacle_base_health,
            creature_base_health: self.creature_base_health,
            creature_power: self.creature_power.into(),
            ..LevelRules::for_tile_amount(tile_amount)
        }
    }

    /// Tool of a kind with the configured damage range
    pub fn tool(&self, kind: ToolKind) -> Tool {
        let power: DamageRange = match kind {
            ToolKind::Pickaxe => self.pickaxe_power.into(),
            ToolKind::Sword => self.sword_power.into(),
        };
        Tool::new(kind, power)
    }

    pub fn player_tick(&self) -> Duration {
        Duration::from_millis(self.player_tick_ms)
    }

    pub fn creature_tick(&self) -> Duration {
        Duration::from_millis(self.creature_tick_ms)
    }
}
