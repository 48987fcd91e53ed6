// src/combat/src/combatant.rs

use crate::entity::Entity;

/// 表示可以参加战斗的活体
pub trait Combatant {
    /// 获取名称
    fn name(&self) -> &str;

    /// 获取当前生命值
    fn hp(&self) -> i32;

    /// 获取最大生命值
    fn max_hp(&self) -> i32;

    /// 获取攻击力
    fn attack_power(&self) -> i32;

    /// 获取防御力
    fn defense(&self) -> i32;

    /// 获取暴击率
    fn crit_chance(&self) -> f32 {
        0.0
    }

    /// 是否存活
    fn is_alive(&self) -> bool {
        self.hp() > 0
    }
}

// 为Entity实现Combatant
impl Combatant for Entity {
    fn name(&self) -> &str {
        Entity::name(self)
    }

    fn hp(&self) -> i32 {
        self.stats.hp
    }

    fn max_hp(&self) -> i32 {
        self.stats.max_hp
    }

    fn attack_power(&self) -> i32 {
        self.stats.attack
    }

    fn defense(&self) -> i32 {
        self.stats.defense
    }

    fn is_alive(&self) -> bool {
        !self.is_dead
    }
}
