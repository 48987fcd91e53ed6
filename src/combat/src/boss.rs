// src/combat/src/boss.rs

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::entity::{AiBehavior, EnemyData, Entity, EntityId, EntityKind, Stats};
use crate::position::Position;

/// Boss 类型，按 Boss 楼层轮换出现
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, Encode, Decode, Serialize, Deserialize,
)]
pub enum BossType {
    /// 巨型食人魔（近战暴力型）
    #[strum(serialize = "Giant Ogre")]
    GiantOgre,
    /// 暗影法师（远程魔法型）
    #[strum(serialize = "Shadow Mage")]
    ShadowMage,
    /// 毒液之王（追击型）
    #[strum(serialize = "Venom Lord")]
    VenomLord,
    /// 机械守卫（重装型）
    #[strum(serialize = "Mechanical Guardian")]
    MechanicalGuardian,
    /// 深渊领主（狙击型）
    #[strum(serialize = "Abyssal Lord")]
    AbyssalLord,
}

impl BossType {
    /// 根据第几次 Boss 战获取对应的 Boss 类型（循环）
    pub fn for_encounter(encounter: u32) -> Self {
        match encounter % 5 {
            0 => Self::GiantOgre,
            1 => Self::ShadowMage,
            2 => Self::VenomLord,
            3 => Self::MechanicalGuardian,
            _ => Self::AbyssalLord,
        }
    }

    pub fn behavior(self) -> AiBehavior {
        match self {
            Self::GiantOgre | Self::MechanicalGuardian => AiBehavior::Tank,
            Self::ShadowMage => AiBehavior::Caster,
            Self::VenomLord => AiBehavior::Chaser,
            Self::AbyssalLord => AiBehavior::Sniper,
        }
    }

    /// Boss 属性随楼层线性增长
    pub fn stats_for_floor(self, floor: u32) -> Stats {
        let (hp, attack, defense, speed) = match self {
            Self::GiantOgre => (120, 14, 6, 0.035),
            Self::ShadowMage => (90, 16, 3, 0.040),
            Self::VenomLord => (100, 12, 5, 0.050),
            Self::MechanicalGuardian => (160, 15, 12, 0.025),
            Self::AbyssalLord => (140, 20, 8, 0.035),
        };
        let f = floor as i32;
        Stats::new(hp + f * 12, attack + f / 2, defense + f / 4, speed, 50 + floor * 5)
    }

    pub fn spawn(self, id: EntityId, position: Position, floor: u32) -> Entity {
        let data = EnemyData {
            name: self.to_string(),
            behavior: self.behavior(),
            attack_cooldown_ms: 0.0,
            is_boss: true,
        };
        Entity::new(id, EntityKind::Enemy(data), position, self.stats_for_floor(floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boss_rotation() {
        assert_eq!(BossType::for_encounter(0), BossType::GiantOgre);
        assert_eq!(BossType::for_encounter(6), BossType::ShadowMage);
    }

    #[test]
    fn test_boss_spawn_is_flagged() {
        let boss = BossType::ShadowMage.spawn(9, Position::new(10.0, 10.0), 10);
        let data = boss.enemy_data().expect("boss is an enemy");
        assert!(data.is_boss);
        assert_eq!(data.name, "Shadow Mage");
        assert_eq!(boss.behavior(), Some(AiBehavior::Caster));
        assert!(boss.is_live_hostile());
    }
}
