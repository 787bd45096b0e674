//! Movement systems
//!
//! Player steps toward a pointer target one tile at a time; creatures wander
//! randomly. Both use exact-tile collision.

use rand::Rng;

use crate::ecs::{EntityId, EntityKind, Position};
use crate::world::LevelModel;

/// Result of a movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Out of bounds or tile taken; nothing changed
    Blocked,
    Moved,
    /// The player stepped onto the exit
    MovedAndExited,
}

impl MoveOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, MoveOutcome::Blocked)
    }
}

/// One-tile step toward a target along a single axis
fn axis_step(diff: i32, tile_size: i32) -> i32 {
    if diff.abs() >= tile_size {
        diff.signum() * tile_size
    } else {
        0
    }
}

/// Candidate tile when stepping from `from` toward a pointer position
pub fn step_toward(from: Position, target_x: i32, target_y: i32, tile_size: i32) -> Position {
    from.offset(
        axis_step(target_x - from.x, tile_size),
        axis_step(target_y - from.y, tile_size),
    )
}

/// Whether an Obstacle or Creature stands exactly on `pos`.
///
/// Strictly tile equality; combat uses the wider `in_strike_range`.
pub fn is_occupied(model: &LevelModel, pos: Position) -> bool {
    model.is_blocked(pos)
}

/// Move the player one step toward `(target_x, target_y)`
pub fn move_player(model: &mut LevelModel, target_x: i32, target_y: i32) -> MoveOutcome {
    let Some(player) = model.player() else {
        log::debug!("move_player: no player in level");
        return MoveOutcome::Blocked;
    };
    let Some(from) = model.position_of(player) else {
        return MoveOutcome::Blocked;
    };

    let grid = model.grid();
    let to = step_toward(from, target_x, target_y, grid.tile_size);
    if to == from {
        return MoveOutcome::Moved;
    }

    if !grid.in_bounds(to) {
        log::debug!("move_player: {:?} is outside the map", to);
        return MoveOutcome::Blocked;
    }
    if is_occupied(model, to) {
        return MoveOutcome::Blocked;
    }

    model.set_position(player, to);
    if model.exit() == Some(to) {
        log::info!("Player reached the exit at {:?}", to);
        MoveOutcome::MovedAndExited
    } else {
        MoveOutcome::Moved
    }
}

/// Move a creature to a random cell of its 3x3 neighbourhood (staying put
/// included). Never returns `MovedAndExited`.
pub fn move_creature(model: &mut LevelModel, rng: &mut impl Rng, creature: EntityId) -> MoveOutcome {
    if model.kind_of(creature) != Some(EntityKind::Creature) {
        log::debug!("move_creature: {:?} is not a live creature", creature);
        return MoveOutcome::Blocked;
    }
    let Some(from) = model.position_of(creature) else {
        return MoveOutcome::Blocked;
    };

    let grid = model.grid();
    let dx = rng.gen_range(-1..=1) * grid.tile_size;
    let dy = rng.gen_range(-1..=1) * grid.tile_size;
    let to = from.offset(dx, dy);
    if to == from {
        return MoveOutcome::Moved;
    }

    if !grid.in_bounds(to) || model.is_taken(to, creature) {
        return MoveOutcome::Blocked;
    }

    model.set_position(creature, to);
    MoveOutcome::Moved
}
