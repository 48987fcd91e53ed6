//! Flat entity model: shared fields in [`Entity`], kind-specific payloads in [`EntityKind`].
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants, EnumIter};

use crate::position::{Position, Velocity};
use crate::status_effect::StatusEffects;

pub type EntityId = u32;

/// Reserved id under which the hero is addressed by damage events.
pub const PLAYER_ID: EntityId = 0;

/// Combat statistics shared by every entity kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Stats {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Tiles moved per 16ms reference frame.
    pub speed: f32,
    pub xp_value: u32,
}

impl Stats {
    pub fn new(hp: i32, attack: i32, defense: i32, speed: f32, xp_value: u32) -> Self {
        Self {
            hp,
            max_hp: hp,
            attack,
            defense,
            speed,
            xp_value,
        }
    }

    /// Stats for props that never fight back.
    pub fn inert(hp: i32) -> Self {
        Self::new(hp, 0, 0, 0.0, 0)
    }
}

/// Enemy decision-making branch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize, Encode, Decode,
)]
pub enum AiBehavior {
    Chaser,
    Archer,
    Caster,
    Sniper,
    Tank,
    Static,
}

impl AiBehavior {
    pub fn is_ranged(self) -> bool {
        matches!(self, Self::Archer | Self::Caster | Self::Sniper)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct EnemyData {
    pub name: String,
    pub behavior: AiBehavior,
    /// Counts down to zero; the enemy may attack once it reaches zero.
    pub attack_cooldown_ms: f32,
    pub is_boss: bool,
}

/// Goods a merchant sells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum ShopItem {
    HealingDraught { heal: i32 },
    ManaTonic { mana: u32 },
    Whetstone { attack: i32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ShopOffer {
    pub item: ShopItem,
    pub price: u32,
    pub stock: u32,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize, Encode, Decode,
)]
pub enum DecorationStyle {
    Bones,
    Torch,
    Moss,
    Cobweb,
    Skull,
    Crystal,
}

/// Kind tag plus kind-specific payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode, EnumDiscriminants)]
#[strum_discriminants(name(EntityTag), derive(Display, EnumIter, Hash))]
pub enum EntityKind {
    Enemy(EnemyData),
    Merchant { stock: Vec<ShopOffer> },
    Chest { gold: u32, opened: bool },
    Gold { amount: u32 },
    Potion { heal: i32 },
    Stairs,
    Decoration(DecorationStyle),
    Rubble,
    Barrel,
    Shrine { used: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub stats: Stats,
    pub is_hostile: bool,
    pub status: StatusEffects,
    pub knockback: Velocity,
    pub is_dead: bool,
    pub is_hidden: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, position: Position, stats: Stats) -> Self {
        let is_hostile = matches!(kind, EntityKind::Enemy(_));
        let is_hidden = matches!(kind, EntityKind::Stairs);
        Self {
            id,
            kind,
            position,
            stats,
            is_hostile,
            status: StatusEffects::new(),
            knockback: Velocity::ZERO,
            is_dead: false,
            is_hidden,
        }
    }

    /// The floor exit; hidden until the last hostile falls.
    pub fn stairs(id: EntityId, position: Position) -> Self {
        Self::new(id, EntityKind::Stairs, position, Stats::inert(1))
    }

    pub fn barrel(id: EntityId, position: Position) -> Self {
        Self::new(id, EntityKind::Barrel, position, Stats::inert(1))
    }

    pub fn decoration(id: EntityId, position: Position, style: DecorationStyle) -> Self {
        Self::new(id, EntityKind::Decoration(style), position, Stats::inert(1))
    }

    pub fn tag(&self) -> EntityTag {
        EntityTag::from(&self.kind)
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            EntityKind::Enemy(data) => &data.name,
            EntityKind::Merchant { .. } => "Merchant",
            EntityKind::Chest { .. } => "Chest",
            EntityKind::Gold { .. } => "Gold",
            EntityKind::Potion { .. } => "Potion",
            EntityKind::Stairs => "Stairs",
            EntityKind::Decoration(_) => "Decoration",
            EntityKind::Rubble => "Rubble",
            EntityKind::Barrel => "Barrel",
            EntityKind::Shrine { .. } => "Shrine",
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    pub fn is_barrel(&self) -> bool {
        matches!(self.kind, EntityKind::Barrel)
    }

    pub fn is_stairs(&self) -> bool {
        matches!(self.kind, EntityKind::Stairs)
    }

    /// Living hostile enemy counted towards the floor's clear condition.
    pub fn is_live_hostile(&self) -> bool {
        !self.is_dead && self.is_hostile && self.is_enemy()
    }

    /// Valid target for player attacks and explosions.
    pub fn is_targetable(&self) -> bool {
        self.is_live_hostile() || (!self.is_dead && self.is_barrel())
    }

    /// Whether the entity occupies its tile for movement validation.
    pub fn is_blocking(&self) -> bool {
        !self.is_dead
            && matches!(
                self.kind,
                EntityKind::Enemy(_)
                    | EntityKind::Merchant { .. }
                    | EntityKind::Chest { .. }
                    | EntityKind::Barrel
                    | EntityKind::Shrine { .. }
            )
    }

    pub fn behavior(&self) -> Option<AiBehavior> {
        match &self.kind {
            EntityKind::Enemy(data) => Some(data.behavior),
            _ => None,
        }
    }

    pub fn enemy_data(&self) -> Option<&EnemyData> {
        match &self.kind {
            EntityKind::Enemy(data) => Some(data),
            _ => None,
        }
    }

    pub fn enemy_data_mut(&mut self) -> Option<&mut EnemyData> {
        match &mut self.kind {
            EntityKind::Enemy(data) => Some(data),
            _ => None,
        }
    }

    /// Set knockback velocity; barrels never slide. Returns whether it was applied.
    pub fn push(&mut self, velocity: Velocity) -> bool {
        if self.is_barrel() || self.is_dead {
            return false;
        }
        self.knockback = velocity;
        true
    }

    /// Destroyed barrels stay on the floor as inert, non-blocking rubble.
    pub fn crumble(&mut self) {
        self.kind = EntityKind::Rubble;
        self.is_hostile = false;
        self.stats.hp = 0;
        self.knockback = Velocity::ZERO;
        self.status.clear();
    }

    pub fn kill(&mut self) {
        self.is_dead = true;
        self.stats.hp = 0;
        self.knockback = Velocity::ZERO;
        self.status.clear();
    }
}
