// src/combat/src/enemy.rs

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::entity::{AiBehavior, EnemyData, Entity, EntityId, EntityKind, Stats};
use crate::position::Position;

/// 敌人种类，决定基础属性和AI行为
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Encode, Decode, Serialize, Deserialize,
)]
pub enum EnemyKind {
    Rat,
    Snake,
    Gnoll,
    Crab,
    Bat,
    Scorpion,
    Guard,
    Warlock,
    Golem,
    /// 固定炮台，不移动也不攻击
    Sentry,
    /// 远程狙击手
    Marksman,
}

impl Default for EnemyKind {
    fn default() -> Self {
        EnemyKind::Rat
    }
}

/// 单个敌人种类的基础模板
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTemplate {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: f32,
    pub xp_value: u32,
    pub behavior: AiBehavior,
}

impl EnemyKind {
    /// 基础属性表 (hp, attack, defense, speed, xp, behavior)
    pub fn template(self) -> EnemyTemplate {
        let (hp, attack, defense, speed, xp_value, behavior) = match self {
            EnemyKind::Rat => (10, 4, 1, 0.060, 2, AiBehavior::Chaser),
            EnemyKind::Snake => (12, 6, 2, 0.050, 4, AiBehavior::Chaser),
            EnemyKind::Gnoll => (18, 7, 3, 0.040, 6, AiBehavior::Archer),
            EnemyKind::Crab => (25, 5, 8, 0.030, 5, AiBehavior::Tank),
            EnemyKind::Bat => (8, 5, 0, 0.090, 3, AiBehavior::Chaser),
            EnemyKind::Scorpion => (20, 9, 4, 0.045, 8, AiBehavior::Archer),
            EnemyKind::Guard => (30, 10, 8, 0.035, 10, AiBehavior::Tank),
            EnemyKind::Warlock => (16, 12, 2, 0.040, 12, AiBehavior::Caster),
            EnemyKind::Golem => (50, 14, 12, 0.025, 15, AiBehavior::Tank),
            EnemyKind::Sentry => (20, 0, 6, 0.0, 4, AiBehavior::Static),
            EnemyKind::Marksman => (14, 13, 2, 0.035, 12, AiBehavior::Sniper),
        };
        EnemyTemplate {
            hp,
            attack,
            defense,
            speed,
            xp_value,
            behavior,
        }
    }

    /// 按楼层缩放后的属性
    pub fn stats_for_floor(self, floor: u32) -> Stats {
        let t = self.template();
        let depth = floor.saturating_sub(1);
        let hp = (t.hp as f32 * (1.0 + 0.15 * depth as f32)).round() as i32;
        let attack = t.attack + (depth / 2) as i32;
        let defense = t.defense + (depth / 3) as i32;
        let xp_value = t.xp_value + depth;
        // 静态敌人的速度强制为0
        let speed = if t.behavior == AiBehavior::Static {
            0.0
        } else {
            t.speed
        };
        Stats::new(hp, attack, defense, speed, xp_value)
    }

    /// 在指定位置生成该种类的敌人实体
    pub fn spawn(self, id: EntityId, position: Position, floor: u32) -> Entity {
        let data = EnemyData {
            name: self.to_string(),
            behavior: self.template().behavior,
            attack_cooldown_ms: 0.0,
            is_boss: false,
        };
        Entity::new(id, EntityKind::Enemy(data), position, self.stats_for_floor(floor))
    }
}
