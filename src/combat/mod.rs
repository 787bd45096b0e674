//! Combat system

pub mod damage;
pub mod resolver;

pub use damage::DamageRange;
pub use resolver::{creature_attack, in_strike_range, use_tool, AttackReport, CreatureHit, Hit, HitReport, Removal};
