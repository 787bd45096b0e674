//! Level model
//!
//! Owns every entity placed on the current mine level together with the
//! difficulty scaling of its depth. Entities live in a `hecs::World`; a side
//! list keeps their insertion order so iteration is deterministic.

use std::collections::HashSet;

use hecs::{Entity, World};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generation::GenerationError;
use super::TileGrid;
use crate::combat::DamageRange;
use crate::ecs::{ActiveTool, BlocksMovement, EntityId, EntityKind, Health, Position, Power};
use crate::items::Tool;
use crate::progression::DepthScaling;

/// Counts and base stats used when populating a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRules {
    /// Obstacles per level; the first one hides the exit
    pub obstacle_count: usize,
    pub creature_count: usize,
    pub player_health: i32,
    /// Obstacle health at multiplier 1
    pub obstacle_base_health: i32,
    /// Creature health at multiplier 1
    pub creature_base_health: i32,
    /// Creature power at multiplier 1
    pub creature_power: DamageRange,
}

impl LevelRules {
    /// Half as many obstacles and a third as many creatures as `tile_amount`
    pub fn for_tile_amount(tile_amount: usize) -> Self {
        Self {
            obstacle_count: tile_amount / 2,
            creature_count: tile_amount / 3,
            ..Self::default()
        }
    }
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            obstacle_count: 10,
            creature_count: 6,
            player_health: 100,
            obstacle_base_health: 100,
            creature_base_health: 150,
            creature_power: DamageRange::new(5, 15),
        }
    }
}

/// Read-only view of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    /// `None` for the exit marker
    pub health: Option<i32>,
    /// Creatures only
    pub power: Option<DamageRange>,
}

/// Everything a renderer needs to draw a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSnapshot {
    pub depth: u32,
    pub multiplier: i32,
    pub grid: TileGrid,
    pub player: Option<EntityView>,
    pub tool: Option<Tool>,
    pub exit: Option<Position>,
    pub obstacles: Vec<EntityView>,
    pub creatures: Vec<EntityView>,
}

/// What the player keeps when moving to another level
#[derive(Debug, Clone, Copy)]
struct PlayerCarry {
    health: Health,
    tool: Tool,
}

/// The entities of one mine level
pub struct LevelModel {
    world: World,
    order: Vec<Entity>,
    grid: TileGrid,
    rules: LevelRules,
    scaling: DepthScaling,
    player: Option<Entity>,
    exit: Option<Entity>,
}

impl LevelModel {
    /// Create an empty model; call [`LevelModel::generate`] to populate it
    pub fn new(grid: TileGrid, rules: LevelRules) -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
            grid,
            rules,
            scaling: DepthScaling::new(1),
            player: None,
            exit: None,
        }
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Build a fresh level for `depth` with a brand new player.
    ///
    /// On failure the previous level is left untouched.
    pub fn generate(&mut self, rng: &mut impl Rng, depth: u32) -> Result<LevelSnapshot, GenerationError> {
        let carry = PlayerCarry {
            health: Health::new(self.rules.player_health),
            tool: Tool::default(),
        };
        self.build(rng, depth, carry)
    }

    /// Build the level for `depth`, keeping the current player's health and
    /// tool. Falls back to a fresh player when no level exists yet.
    pub fn descend(&mut self, rng: &mut impl Rng, depth: u32) -> Result<LevelSnapshot, GenerationError> {
        let carry = match self.player {
            Some(player) => PlayerCarry {
                health: self
                    .world
                    .get::<&Health>(player)
                    .map(|h| *h)
                    .unwrap_or_else(|_| Health::new(self.rules.player_health)),
                tool: self.active_tool().unwrap_or_default(),
            },
            None => PlayerCarry {
                health: Health::new(self.rules.player_health),
                tool: Tool::default(),
            },
        };
        self.build(rng, depth, carry)
    }

    fn build(&mut self, rng: &mut impl Rng, depth: u32, carry: PlayerCarry) -> Result<LevelSnapshot, GenerationError> {
        let scaling = DepthScaling::new(depth);
        let mut occupied: HashSet<Position> = HashSet::new();

        let player_tiles = self.grid.place_random_tiles(rng, 1, &occupied)?;
        occupied.extend(player_tiles.iter().copied());

        let obstacle_tiles = self
            .grid
            .place_random_tiles(rng, self.rules.obstacle_count.max(1), &occupied)?;
        occupied.extend(obstacle_tiles.iter().copied());

        let creature_tiles = self
            .grid
            .place_random_tiles(rng, self.rules.creature_count, &occupied)?;

        self.clear();
        self.scaling = scaling;

        for pos in player_tiles {
            self.spawn_player(pos, carry.health, carry.tool);
        }

        let obstacle_health = scaling.scale_health(self.rules.obstacle_base_health);
        for (i, pos) in obstacle_tiles.into_iter().enumerate() {
            self.spawn_obstacle(pos, obstacle_health);
            if i == 0 {
                self.spawn_exit(pos);
            }
        }

        let creature_health = scaling.scale_health(self.rules.creature_base_health);
        let creature_power = scaling.scale_power(self.rules.creature_power);
        for pos in creature_tiles {
            self.spawn_creature(pos, creature_health, creature_power);
        }

        log::info!(
            "Generated depth {} (x{}): {} obstacles, {} creatures, exit at {:?}",
            depth,
            scaling.multiplier,
            self.count_of_kind(EntityKind::Obstacle),
            self.count_of_kind(EntityKind::Creature),
            self.exit(),
        );

        Ok(self.snapshot())
    }

    fn clear(&mut self) {
        self.world.clear();
        self.order.clear();
        self.player = None;
        self.exit = None;
    }

    pub(crate) fn spawn_player(&mut self, pos: Position, health: Health, tool: Tool) -> EntityId {
        let entity = self.world.spawn((EntityKind::Player, pos, health, ActiveTool(tool)));
        self.order.push(entity);
        self.player = Some(entity);
        entity
    }

    pub(crate) fn spawn_obstacle(&mut self, pos: Position, health: i32) -> EntityId {
        let entity = self
            .world
            .spawn((EntityKind::Obstacle, pos, Health::new(health), BlocksMovement));
        self.order.push(entity);
        entity
    }

    pub(crate) fn spawn_creature(&mut self, pos: Position, health: i32, power: DamageRange) -> EntityId {
        let entity = self
            .world
            .spawn((EntityKind::Creature, pos, Health::new(health), Power(power), BlocksMovement));
        self.order.push(entity);
        entity
    }

    pub(crate) fn spawn_exit(&mut self, pos: Position) -> EntityId {
        let entity = self.world.spawn((EntityKind::ExitMarker, pos));
        self.order.push(entity);
        self.exit = Some(entity);
        entity
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn depth(&self) -> u32 {
        self.scaling.depth
    }

    pub fn multiplier(&self) -> i32 {
        self.scaling.multiplier
    }

    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    /// Number of live entities, exit marker included
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.world.contains(id)
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player_view(&self) -> Option<EntityView> {
        self.player.and_then(|p| self.view(p))
    }

    pub fn player_position(&self) -> Option<Position> {
        self.player.and_then(|p| self.position_of(p))
    }

    pub fn player_health(&self) -> Option<i32> {
        self.player
            .and_then(|p| self.world.get::<&Health>(p).ok().map(|h| h.current))
    }

    /// Tile of the exit marker
    pub fn exit(&self) -> Option<Position> {
        self.exit.and_then(|e| self.position_of(e))
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.world.get::<&Position>(id).ok().map(|p| *p)
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.world.get::<&EntityKind>(id).ok().map(|k| *k)
    }

    /// Snapshot of a single entity
    pub fn view(&self, id: EntityId) -> Option<EntityView> {
        let kind = self.kind_of(id)?;
        let position = self.position_of(id)?;
        Some(EntityView {
            id,
            kind,
            position,
            health: self.world.get::<&Health>(id).ok().map(|h| h.current),
            power: self.world.get::<&Power>(id).ok().map(|p| p.0),
        })
    }

    /// Entity standing on a tile. When the exit marker shares its tile with
    /// an obstacle, the obstacle is reported.
    pub fn entity_at(&self, pos: Position) -> Option<EntityView> {
        let mut exit = None;
        for &entity in &self.order {
            if self.position_of(entity) != Some(pos) {
                continue;
            }
            match self.view(entity) {
                Some(view) if view.kind == EntityKind::ExitMarker => exit = Some(view),
                Some(view) => return Some(view),
                None => {}
            }
        }
        exit
    }

    /// All entities of a kind in insertion order
    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<EntityView> {
        self.order
            .iter()
            .filter(|&&e| self.kind_of(e) == Some(kind))
            .filter_map(|&e| self.view(e))
            .collect()
    }

    fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.order.iter().filter(|&&e| self.kind_of(e) == Some(kind)).count()
    }

    /// Entities in insertion order
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Full snapshot for rendering
    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            depth: self.depth(),
            multiplier: self.multiplier(),
            grid: self.grid,
            player: self.player_view(),
            tool: self.active_tool(),
            exit: self.exit(),
            obstacles: self.entities_of_kind(EntityKind::Obstacle),
            creatures: self.entities_of_kind(EntityKind::Creature),
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Delete an entity; does nothing if it is already gone
    pub fn remove(&mut self, id: EntityId) {
        if self.world.despawn(id).is_err() {
            log::debug!("remove: entity {:?} already gone", id);
            return;
        }
        self.order.retain(|&e| e != id);
        if self.player == Some(id) {
            self.player = None;
        }
        if self.exit == Some(id) {
            self.exit = None;
        }
    }

    /// Subtract health from an entity and remove it once health drops to
    /// zero or below. Returns whether the entity was removed.
    ///
    /// The player is never removed; callers read its health instead.
    pub fn apply_damage(&mut self, id: EntityId, amount: i32) -> bool {
        let Some(kind) = self.kind_of(id) else {
            log::debug!("apply_damage: unknown entity {:?}", id);
            return false;
        };

        let remaining = match self.world.get::<&mut Health>(id) {
            Ok(mut health) => health.take_damage(amount),
            Err(_) => {
                log::debug!("apply_damage: {} {:?} has no health", kind.name(), id);
                return false;
            }
        };

        if remaining > 0 || kind == EntityKind::Player {
            return false;
        }

        self.remove(id);
        log::debug!("{} {:?} destroyed", kind.name(), id);
        true
    }

    /// Move an entity to another tile
    pub(crate) fn set_position(&mut self, id: EntityId, pos: Position) -> bool {
        match self.world.get::<&mut Position>(id) {
            Ok(mut current) => {
                *current = pos;
                true
            }
            Err(_) => false,
        }
    }

    /// Overwrite the player's current health
    pub(crate) fn set_player_health(&mut self, value: i32) {
        if let Some(player) = self.player {
            if let Ok(mut health) = self.world.get::<&mut Health>(player) {
                health.current = value;
            }
        }
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.player
            .and_then(|p| self.world.get::<&ActiveTool>(p).ok().map(|t| t.0))
    }

    /// Equip a tool; returns whether the selection changed
    pub fn select_tool(&mut self, tool: Tool) -> bool {
        let Some(player) = self.player else {
            return false;
        };
        match self.world.get::<&mut ActiveTool>(player) {
            Ok(mut active) if active.0 != tool => {
                active.0 = tool;
                true
            }
            _ => false,
        }
    }

    /// Whether an Obstacle or Creature stands exactly on `pos`
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.world
            .query::<(&Position, &BlocksMovement)>()
            .iter()
            .any(|(_, (p, _))| *p == pos)
    }

    /// Whether any entity other than `except` stands on `pos`. The exit
    /// marker never takes a tile.
    pub fn is_taken(&self, pos: Position, except: EntityId) -> bool {
        self.order.iter().any(|&e| {
            e != except
                && self.kind_of(e) != Some(EntityKind::ExitMarker)
                && self.position_of(e) == Some(pos)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn level(columns: i32, rows: i32) -> LevelModel {
        LevelModel::new(TileGrid::new(columns, rows, 20), LevelRules::default())
    }

    fn assert_level_invariants(model: &LevelModel) {
        let grid = model.grid();
        let mut tiles: HashSet<Position> = HashSet::new();
        for &id in model.entity_ids() {
            let view = model.view(id).unwrap();
            assert!(grid.in_bounds(view.position), "{:?} out of bounds", view);
            assert!(grid.is_aligned(view.position));
            if view.kind == EntityKind::ExitMarker {
                continue;
            }
            assert!(tiles.insert(view.position), "two entities on {:?}", view.position);
            if let Some(health) = view.health {
                if view.kind != EntityKind::Player {
                    assert!(health > 0);
                }
            }
        }
        let exits = model.entities_of_kind(EntityKind::ExitMarker);
        assert_eq!(exits.len(), 1);
    }

    #[test]
    fn test_generated_levels_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut model = level(29, 20);
        for depth in 1..40 {
            let snapshot = model.generate(&mut rng, depth).unwrap();
            assert_eq!(snapshot.obstacles.len(), 10);
            assert_eq!(snapshot.creatures.len(), 6);
            assert_level_invariants(&model);

            let exit = snapshot.exit.unwrap();
            assert_eq!(exit, snapshot.obstacles[0].position);
            assert_eq!(model.entity_at(exit).unwrap().kind, EntityKind::Obstacle);
        }
    }

    #[test]
    fn test_generation_scales_with_depth() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut model = level(20, 20);

        let snapshot = model.generate(&mut rng, 7).unwrap();
        assert_eq!(snapshot.multiplier, 3);
        assert!(snapshot.obstacles.iter().all(|o| o.health == Some(300)));
        assert!(snapshot.creatures.iter().all(|c| c.health == Some(450)));
        assert!(snapshot
            .creatures
            .iter()
            .all(|c| c.power == Some(DamageRange::new(15, 45))));
        assert_eq!(snapshot.player.unwrap().health, Some(100));
    }

    #[test]
    fn test_capacity_exceeded_after_player() {
        // Two placeable tiles: one for the player, one left for two obstacles
        let mut rng = StdRng::seed_from_u64(5);
        let rules = LevelRules { obstacle_count: 2, creature_count: 0, ..LevelRules::default() };
        let mut model = LevelModel::new(TileGrid::new(3, 2, 20), rules);

        let err = model.generate(&mut rng, 1).unwrap_err();
        assert_eq!(err, GenerationError::CapacityExceeded { requested: 2, available: 1 });
        assert!(model.is_empty());
    }

    #[test]
    fn test_failed_generation_keeps_previous_level() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut model = level(10, 10);
        model.generate(&mut rng, 1).unwrap();
        let before = model.len();

        model.grid = TileGrid::new(3, 2, 20);
        assert!(model.generate(&mut rng, 2).is_err());
        assert_eq!(model.len(), before);
        assert_eq!(model.depth(), 1);
    }

    #[test]
    fn test_descend_carries_player() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut model = level(15, 15);
        model.generate(&mut rng, 1).unwrap();
        model.set_player_health(42);
        model.select_tool(crate::items::ToolType::BasicSword.tool());

        let snapshot = model.descend(&mut rng, 2).unwrap();
        assert_eq!(snapshot.depth, 2);
        assert_eq!(snapshot.player.unwrap().health, Some(42));
        assert_eq!(snapshot.tool.unwrap().kind, crate::items::ToolKind::Sword);

        let fresh = model.generate(&mut rng, 2).unwrap();
        assert_eq!(fresh.player.unwrap().health, Some(100));
        assert_eq!(fresh.tool.unwrap().kind, crate::items::ToolKind::Pickaxe);
    }

    #[test]
    fn test_apply_damage_and_removal() {
        let mut model = level(10, 10);
        let pos = Position::new(40, 40);
        let rock = model.spawn_obstacle(pos, 100);

        assert!(!model.apply_damage(rock, 60));
        assert_eq!(model.view(rock).unwrap().health, Some(40));
        assert!(model.apply_damage(rock, 40));
        assert!(!model.contains(rock));
        assert!(model.entity_at(pos).is_none());

        // Further damage against a removed id is a no-op
        assert!(!model.apply_damage(rock, 10));
        model.remove(rock);
        assert!(model.is_empty());
    }

    #[test]
    fn test_player_is_never_removed() {
        let mut model = level(10, 10);
        let player = model.spawn_player(Position::new(20, 20), Health::new(10), Tool::default());
        assert!(!model.apply_damage(player, 25));
        assert!(model.contains(player));
        assert_eq!(model.player_health(), Some(-15));
    }

    #[test]
    fn test_exit_marker_has_no_health() {
        let mut model = level(10, 10);
        let exit = model.spawn_exit(Position::new(60, 60));
        assert!(!model.apply_damage(exit, 10));
        assert!(model.contains(exit));
        assert_eq!(model.entity_at(Position::new(60, 60)).unwrap().kind, EntityKind::ExitMarker);
        assert!(!model.is_blocked(Position::new(60, 60)));
    }

    #[test]
    fn test_entities_of_kind_keeps_insertion_order() {
        let mut model = level(10, 10);
        let a = model.spawn_creature(Position::new(20, 20), 10, DamageRange::fixed(1));
        model.spawn_obstacle(Position::new(40, 20), 10);
        let b = model.spawn_creature(Position::new(60, 20), 10, DamageRange::fixed(1));
        let c = model.spawn_creature(Position::new(80, 20), 10, DamageRange::fixed(1));
        model.remove(b);

        let ids: Vec<EntityId> = model
            .entities_of_kind(EntityKind::Creature)
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(ids, vec![a, c]);
    }
}
