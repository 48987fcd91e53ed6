// src/combat/src/lib.rs
//! Combat data model and the pure rules shared by the simulation loop.

use rand::Rng;

pub mod boss;
pub mod combatant;
pub mod damage;
pub mod enemy;
pub mod entity;
pub mod explosion;
pub mod feedback;
pub mod position;
pub mod projectile;
pub mod status_effect;
pub mod tuning;

pub use crate::combatant::Combatant;
pub use crate::damage::{DamageEvent, DamageQueue, DamageSource};
pub use crate::entity::{
    AiBehavior, DecorationStyle, EnemyData, Entity, EntityId, EntityKind, EntityTag, PLAYER_ID,
    ShopItem, ShopOffer, Stats,
};
pub use crate::explosion::{Explosion, ExplosionOutcome, resolve_explosion};
pub use crate::feedback::{FeedbackEvent, FeedbackQueue, LogLevel, ParticleKind, TextStyle};
pub use crate::position::{Position, Velocity, snap_to_tile};
pub use crate::projectile::{Projectile, Trail};
pub use crate::status_effect::{StatusEffects, StatusKind};
pub use crate::tuning::CombatTuning;

/// Handles damage math between combatants
pub struct Combat;

/// Combat configuration constants
pub mod constants {
    pub const CRIT_MULTIPLIER: f32 = 1.5; // Critical damage multiplier
    pub const BASE_CRIT_CHANCE: f32 = 0.1; // Base critical chance
    pub const MIN_DAMAGE: i32 = 1; // Minimum damage dealt
}

impl Combat {
    /// Melee damage: attack minus half the defender's defense, never below 1
    pub fn melee_damage<T: Combatant + ?Sized, U: Combatant + ?Sized>(
        attacker: &T,
        defender: &U,
    ) -> i32 {
        Self::mitigate(attacker.attack_power(), defender.defense())
    }

    /// Raw damage reduced by half the defense, floored at `MIN_DAMAGE`
    pub fn mitigate(raw: i32, defense: i32) -> i32 {
        (raw - defense / 2).max(constants::MIN_DAMAGE)
    }

    /// Roll for a critical hit
    pub fn is_critical(rng: &mut impl Rng, chance: f32) -> bool {
        chance > 0.0 && rng.random::<f32>() < chance.min(1.0)
    }

    /// Apply the critical multiplier
    pub fn critical(amount: i32) -> i32 {
        (amount as f32 * constants::CRIT_MULTIPLIER).round() as i32
    }

    /// Roll the crit and return `(amount, is_crit)`
    pub fn roll(rng: &mut impl Rng, amount: i32, crit_chance: f32) -> (i32, bool) {
        if Self::is_critical(rng, crit_chance) {
            (Self::critical(amount), true)
        } else {
            (amount, false)
        }
    }
}
