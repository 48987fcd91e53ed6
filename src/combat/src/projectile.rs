//! Projectiles: interpolated from `start` to `target` by `progress`.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::entity::EntityId;
use crate::explosion::Explosion;
use crate::position::{Position, Velocity};

/// Positions kept for the render-side trail.
pub const TRAIL_LEN: usize = 5;

/// Bounded ring buffer of recent positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Trail {
    points: VecDeque<Position>,
}

impl Trail {
    pub fn push(&mut self, point: Position) {
        if self.points.len() == TRAIL_LEN {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<Position> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.points.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Projectile {
    pub id: u32,
    pub owner: Option<EntityId>,
    pub start: Position,
    pub target: Position,
    pub progress: f32,
    /// Tiles per reference frame.
    pub speed: f32,
    pub damage: i32,
    /// Additional targets the projectile may pass through.
    pub piercing: u32,
    pub hit_list: HashSet<EntityId>,
    pub trail: Trail,
    pub explode_on_hit: bool,
    pub explosion_radius: f32,
    pub explosion_damage: i32,
    pub is_enemy_owned: bool,
    /// Fraction of the distance to the nearest target the aim point moves each tick.
    pub homing: f32,
    pub crit_chance: f32,
    pub freezes: bool,
    pub burns: bool,
    pub knockback: f32,
}

impl Projectile {
    pub fn new(id: u32, start: Position, target: Position, speed: f32, damage: i32) -> Self {
        Self {
            id,
            owner: None,
            start,
            target,
            progress: 0.0,
            speed,
            damage,
            piercing: 0,
            hit_list: HashSet::new(),
            trail: Trail::default(),
            explode_on_hit: false,
            explosion_radius: 0.0,
            explosion_damage: 0,
            is_enemy_owned: false,
            homing: 0.0,
            crit_chance: 0.0,
            freezes: false,
            burns: false,
            knockback: 0.0,
        }
    }

    pub fn owned_by(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn enemy_owned(mut self) -> Self {
        self.is_enemy_owned = true;
        self
    }

    pub fn with_piercing(mut self, piercing: u32) -> Self {
        self.piercing = piercing;
        self
    }

    pub fn exploding(mut self, radius: f32, damage: i32) -> Self {
        self.explode_on_hit = true;
        self.explosion_radius = radius;
        self.explosion_damage = damage;
        self
    }

    pub fn with_homing(mut self, strength: f32) -> Self {
        self.homing = strength.clamp(0.0, 1.0);
        self
    }

    pub fn with_crit_chance(mut self, chance: f32) -> Self {
        self.crit_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_knockback(mut self, force: f32) -> Self {
        self.knockback = force;
        self
    }

    pub fn freezing(mut self) -> Self {
        self.freezes = true;
        self
    }

    pub fn burning(mut self) -> Self {
        self.burns = true;
        self
    }

    /// Current interpolated position.
    pub fn position(&self) -> Position {
        self.start.lerp(&self.target, self.progress.min(1.0))
    }

    /// Unit vector of travel.
    pub fn direction(&self) -> Velocity {
        (self.target - self.start).normalized()
    }

    /// Pull the aim point towards `point` by the homing strength.
    pub fn steer_towards(&mut self, point: Position) {
        if self.homing > 0.0 {
            self.target = self.target.lerp(&point, self.homing);
        }
    }

    /// Advance by `speed / distance(start, target)` scaled by the frame factor
    /// and record the new position in the trail.
    pub fn advance(&mut self, frame: f32) -> Position {
        let distance = self.start.distance_to(&self.target);
        if distance <= f32::EPSILON {
            self.progress = 1.0;
        } else {
            self.progress += self.speed * frame / distance;
        }
        let position = self.position();
        self.trail.push(position);
        position
    }

    pub fn is_spent(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn has_hit(&self, id: EntityId) -> bool {
        self.hit_list.contains(&id)
    }

    /// Record a hit on `id`. Returns `true` if the projectile survives the hit.
    pub fn register_hit(&mut self, id: EntityId) -> bool {
        self.hit_list.insert(id);
        if self.piercing == 0 {
            return false;
        }
        self.piercing -= 1;
        true
    }

    /// Blast produced when this projectile detonates at `at`, if it is flagged to.
    pub fn explosion_at(&self, at: Position) -> Option<Explosion> {
        self.explode_on_hit.then(|| Explosion {
            center: at,
            radius: self.explosion_radius,
            damage: self.explosion_damage,
            by_player: !self.is_enemy_owned,
        })
    }
}
