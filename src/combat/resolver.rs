//! Melee resolution
//!
//! Tool swings against obstacles and creatures, and creature attacks
//! against the player.

use rand::Rng;

use super::DamageRange;
use crate::ecs::{EntityId, EntityKind, Position};
use crate::items::Tool;
use crate::world::LevelModel;

/// Whether `target` lies in the 3x3 tile neighbourhood around `actor`.
///
/// Wider than the exact-tile test movement uses: anything closer than two
/// tiles on both axes can be hit.
pub fn in_strike_range(actor: Position, target: Position, tile_size: i32) -> bool {
    let reach = 2 * tile_size;
    (actor.x - target.x).abs() < reach && (actor.y - target.y).abs() < reach
}

/// Damage dealt to one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub target: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub damage: i32,
    pub removed: bool,
}

/// An entity destroyed by a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
}

/// Result of swinging a tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitReport {
    pub hits: Vec<Hit>,
    pub removed: Vec<Removal>,
}

impl HitReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Damage numbers in hit order
    pub fn damages(&self) -> Vec<i32> {
        self.hits.iter().map(|h| h.damage).collect()
    }

    pub fn total_damage(&self) -> i32 {
        self.hits.iter().map(|h| h.damage).sum()
    }
}

/// Damage one creature dealt to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatureHit {
    pub attacker: EntityId,
    pub position: Position,
    pub damage: i32,
}

/// Result of the creatures' attack on the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackReport {
    pub hits: Vec<CreatureHit>,
    /// Player health after all applied hits; zero or below means death
    pub player_health: i32,
}

impl AttackReport {
    pub fn is_fatal(&self) -> bool {
        self.player_health <= 0
    }

    pub fn damages(&self) -> Vec<i32> {
        self.hits.iter().map(|h| h.damage).collect()
    }

    pub fn total_damage(&self) -> i32 {
        self.hits.iter().map(|h| h.damage).sum()
    }
}

/// Swing `tool` from `actor`, damaging every matching target in strike range
pub fn use_tool(model: &mut LevelModel, rng: &mut impl Rng, tool: Tool, actor: Position) -> HitReport {
    let mut report = HitReport::default();
    let grid = model.grid();
    if !grid.in_bounds(actor) {
        log::debug!("use_tool: swing from {:?} is outside the map", actor);
        return report;
    }

    let targets: Vec<_> = model
        .entities_of_kind(tool.kind.target_kind())
        .into_iter()
        .filter(|t| in_strike_range(actor, t.position, grid.tile_size))
        .collect();

    for target in targets {
        let damage = tool.power.roll(rng);
        let removed = model.apply_damage(target.id, damage);
        report.hits.push(Hit {
            target: target.id,
            kind: target.kind,
            position: target.position,
            damage,
            removed,
        });
        if removed {
            report.removed.push(Removal {
                id: target.id,
                kind: target.kind,
                position: target.position,
            });
        }
    }

    if !report.is_empty() {
        log::debug!(
            "{} hit {} target(s) for {:?}, destroyed {}",
            tool.kind.name(),
            report.hits.len(),
            report.damages(),
            report.removed.len()
        );
    }
    report
}

/// Let every creature in strike range of `actor` hit the player once.
///
/// Hits are applied in creature insertion order; once the player's health
/// reaches zero the remaining hits of this call are skipped.
pub fn creature_attack(model: &mut LevelModel, rng: &mut impl Rng, actor: Position) -> AttackReport {
    let Some(mut health) = model.player_health() else {
        log::warn!("creature_attack: level has no player");
        return AttackReport::default();
    };

    let mut report = AttackReport { hits: Vec::new(), player_health: health };
    let grid = model.grid();
    if health <= 0 || !grid.in_bounds(actor) {
        return report;
    }

    for creature in model.entities_of_kind(EntityKind::Creature) {
        if !in_strike_range(actor, creature.position, grid.tile_size) {
            continue;
        }
        let power: DamageRange = match creature.power {
            Some(power) => power,
            None => continue,
        };

        let damage = power.roll(rng);
        health -= damage;
        report.hits.push(CreatureHit {
            attacker: creature.id,
            position: creature.position,
            damage,
        });
        if health <= 0 {
            break;
        }
    }

    model.set_player_health(health);
    report.player_health = health;
    if report.is_fatal() {
        log::info!("Player killed ({} hits this tick)", report.hits.len());
    }
    report
}
