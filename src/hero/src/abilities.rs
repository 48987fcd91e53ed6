//! Spells: definitions, cooldown tracking and the per-hero spellbook.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::class::Class;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize, Encode, Decode,
)]
pub enum SpellKind {
    Fireball,
    #[strum(serialize = "Frost Lance")]
    FrostLance,
    Mend,
}

/// What a spell does once its costs are paid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum SpellEffect {
    /// Exploding, burning bolt with light homing.
    DamageProjectile {
        damage: i32,
        speed: f32,
        explosion_radius: f32,
        explosion_damage: i32,
        homing: f32,
    },
    /// Piercing lance that freezes everything it passes through.
    PierceFreeze {
        damage: i32,
        speed: f32,
        piercing: u32,
    },
    Heal {
        amount: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Spell {
    pub kind: SpellKind,
    pub mana_cost: u32,
    pub cooldown_ms: f32,
    pub effect: SpellEffect,
}

impl SpellKind {
    pub fn spell(self) -> Spell {
        let (mana_cost, cooldown_ms, effect) = match self {
            SpellKind::Fireball => (
                15,
                1200.0,
                SpellEffect::DamageProjectile {
                    damage: 14,
                    speed: 0.35,
                    explosion_radius: 2.0,
                    explosion_damage: 10,
                    homing: 0.1,
                },
            ),
            SpellKind::FrostLance => (
                20,
                2000.0,
                SpellEffect::PierceFreeze {
                    damage: 8,
                    speed: 0.5,
                    piercing: 3,
                },
            ),
            SpellKind::Mend => (25, 6000.0, SpellEffect::Heal { amount: 20 }),
        };
        Spell {
            kind: self,
            mana_cost,
            cooldown_ms,
            effect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SpellSlot {
    pub spell: Spell,
    pub remaining_ms: f32,
}

impl SpellSlot {
    pub fn is_ready(&self) -> bool {
        self.remaining_ms <= 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Spellbook {
    slots: Vec<SpellSlot>,
}

impl Spellbook {
    pub fn new(spells: impl IntoIterator<Item = SpellKind>) -> Self {
        Self {
            slots: spells
                .into_iter()
                .map(|kind| SpellSlot {
                    spell: kind.spell(),
                    remaining_ms: 0.0,
                })
                .collect(),
        }
    }

    pub fn for_class(class: Class) -> Self {
        match class {
            Class::Mage => Self::new([SpellKind::Fireball, SpellKind::FrostLance, SpellKind::Mend]),
            _ => Self::new([SpellKind::Mend, SpellKind::Fireball]),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&SpellSlot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut SpellSlot> {
        self.slots.get_mut(index)
    }

    pub fn tick(&mut self, dt_ms: f32) {
        for slot in &mut self.slots {
            slot.remaining_ms = (slot.remaining_ms - dt_ms).max(0.0);
        }
    }
}
