// src/hero/src/core.rs
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use combat::{Combatant, Position, Velocity};
use error::GameError;
use items::{Weapon, WeaponKind};

use crate::abilities::{SpellEffect, Spellbook};
use crate::class::Class;

/// 每级所需经验的基数
const XP_PER_LEVEL: u32 = 20;
/// 法力每秒回复量
const MANA_REGEN_PER_SEC: f32 = 2.0;

/// 英雄核心数据结构
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Hero {
    // 基础属性
    pub class: Class,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub base_attack: i32,
    pub base_defense: i32,
    pub crit_chance: f32,

    // 法力
    pub mana: u32,
    pub max_mana: u32,
    mana_fraction: f32,

    // 成长系统
    pub experience: u32,
    pub level: u32,

    // 游戏进度
    pub gold: u32,
    pub position: Position,
    /// 单位向量，近战与远程都沿此方向
    pub facing: Velocity,
    pub alive: bool,

    // 装备与技能
    pub weapon: Weapon,
    pub attack_cooldown_ms: f32,
    pub spellbook: Spellbook,
}

impl Hero {
    pub fn new(class: Class, position: Position) -> Self {
        let max_hp = class.base_hp();
        let max_mana = class.base_mana();
        Self {
            class,
            name: "Adventurer".to_string(),
            hp: max_hp,
            max_hp,
            base_attack: class.base_attack(),
            base_defense: class.base_defense(),
            crit_chance: class.crit_chance(),
            mana: max_mana,
            max_mana,
            mana_fraction: 0.0,
            experience: 0,
            level: 1,
            gold: 0,
            position,
            facing: Position::new(1.0, 0.0),
            alive: true,
            weapon: class.starting_weapon().weapon(),
            attack_cooldown_ms: 0.0,
            spellbook: Spellbook::for_class(class),
        }
    }

    pub fn tile(&self) -> (i32, i32) {
        self.position.tile()
    }

    /// Turn towards `direction`; a zero vector keeps the current facing.
    pub fn face(&mut self, direction: Velocity) {
        if !direction.is_zero() {
            self.facing = direction.normalized();
        }
    }

    /// 受到伤害，返回剩余生命值
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        self.hp = (self.hp - amount.max(0)).max(0);
        if self.hp == 0 {
            self.alive = false;
        }
        self.hp
    }

    /// 治疗，返回实际恢复量
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.alive {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
        self.mana - before
    }

    pub fn experience_to_next(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// 获得经验，返回提升的等级数
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.experience_to_next() {
            self.experience -= self.experience_to_next();
            self.level += 1;
            self.max_hp += 5;
            self.hp = (self.hp + 5).min(self.max_hp);
            self.base_attack += 1;
            if self.level % 2 == 0 {
                self.base_defense += 1;
            }
            self.max_mana += 5;
            gained += 1;
        }
        if gained > 0 {
            tracing::debug!(level = self.level, "hero levelled up");
        }
        gained
    }

    pub fn equip(&mut self, kind: WeaponKind) {
        self.weapon = kind.weapon();
        self.attack_cooldown_ms = 0.0;
    }

    pub fn can_attack(&self) -> bool {
        self.alive && self.attack_cooldown_ms <= 0.0
    }

    /// Start the swing cooldown for whichever weapon was just used.
    pub fn start_attack_cooldown(&mut self, cooldown_ms: f32) {
        self.attack_cooldown_ms = cooldown_ms.max(0.0);
    }

    /// Cooldowns and mana regeneration for one tick.
    pub fn tick(&mut self, dt_ms: f32) {
        self.attack_cooldown_ms = (self.attack_cooldown_ms - dt_ms).max(0.0);
        self.spellbook.tick(dt_ms);
        if !self.alive || self.mana >= self.max_mana {
            self.mana_fraction = 0.0;
            return;
        }
        self.mana_fraction += MANA_REGEN_PER_SEC * dt_ms / 1000.0;
        let whole = self.mana_fraction.floor();
        if whole >= 1.0 {
            self.mana_fraction -= whole;
            self.restore_mana(whole as u32);
        }
    }

    /// Validate slot, mana and cooldown, then pay for the spell.
    /// Nothing is deducted unless every check passes.
    pub fn begin_cast(&mut self, index: usize) -> Result<SpellEffect, GameError> {
        if !self.alive {
            return Err(GameError::HeroDead);
        }
        let mana = self.mana;
        let slot = self
            .spellbook
            .slot_mut(index)
            .ok_or(GameError::UnknownSpell(index))?;
        if !slot.is_ready() {
            return Err(GameError::SpellOnCooldown {
                remaining_ms: slot.remaining_ms,
            });
        }
        if mana < slot.spell.mana_cost {
            return Err(GameError::InsufficientMana {
                needed: slot.spell.mana_cost,
                available: mana,
            });
        }
        slot.remaining_ms = slot.spell.cooldown_ms;
        let (cost, effect) = (slot.spell.mana_cost, slot.spell.effect);
        self.mana -= cost;
        Ok(effect)
    }

    pub fn spend_gold(&mut self, price: u32) -> Result<(), GameError> {
        if self.gold < price {
            return Err(GameError::NotEnoughGold {
                needed: price,
                available: self.gold,
            });
        }
        self.gold -= price;
        Ok(())
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::new(Class::default(), Position::ZERO)
    }
}

impl Combatant for Hero {
    fn name(&self) -> &str {
        &self.name
    }

    fn hp(&self) -> i32 {
        self.hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn attack_power(&self) -> i32 {
        self.base_attack + self.weapon.damage_bonus
    }

    fn defense(&self) -> i32 {
        self.base_defense
    }

    fn crit_chance(&self) -> f32 {
        (self.crit_chance + self.weapon.crit_chance).min(1.0)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_damage_and_death() {
        let mut hero = Hero::default();
        let hp = hero.hp;
        assert_eq!(hero.take_damage(5), hp - 5);
        assert!(hero.alive);
        assert_eq!(hero.take_damage(1000), 0);
        assert!(!hero.alive);
        assert_eq!(hero.heal(10), 0);
    }

    #[test]
    fn test_heal_is_capped() {
        let mut hero = Hero::default();
        hero.take_damage(3);
        assert_eq!(hero.heal(50), 3);
        assert_eq!(hero.hp, hero.max_hp);
    }

    #[test]
    fn test_level_up() {
        let mut hero = Hero::default();
        let attack = hero.base_attack;
        assert_eq!(hero.gain_xp(20), 1);
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 0);
        assert_eq!(hero.base_attack, attack + 1);
        // 40 for level 3, 60 for level 4
        assert_eq!(hero.gain_xp(100), 2);
        assert_eq!(hero.level, 4);
        assert_eq!(hero.experience, 0);
    }

    #[test]
    fn test_cast_is_atomic() {
        let mut hero = Hero::new(Class::Mage, Position::ZERO);
        hero.mana = 10;
        let err = hero.begin_cast(0).unwrap_err();
        assert!(matches!(err, GameError::InsufficientMana { needed: 15, available: 10 }));
        assert_eq!(hero.mana, 10);
        assert!(hero.spellbook.slot(0).is_some_and(|s| s.is_ready()));

        assert!(matches!(hero.begin_cast(9), Err(GameError::UnknownSpell(9))));
    }

    #[test]
    fn test_cast_pays_and_starts_cooldown() {
        let mut hero = Hero::new(Class::Mage, Position::ZERO);
        let mana = hero.mana;
        let effect = hero.begin_cast(0).unwrap();
        assert!(matches!(effect, SpellEffect::DamageProjectile { .. }));
        assert_eq!(hero.mana, mana - 15);
        assert!(matches!(
            hero.begin_cast(0),
            Err(GameError::SpellOnCooldown { .. })
        ));
        assert_eq!(hero.mana, mana - 15);
        hero.tick(5000.0);
        assert!(hero.begin_cast(0).is_ok());
    }

    #[test]
    fn test_dead_hero_pays_nothing() {
        let mut hero = Hero::new(Class::Mage, Position::ZERO);
        hero.take_damage(hero.max_hp);
        let mana = hero.mana;
        assert!(matches!(hero.begin_cast(0), Err(GameError::HeroDead)));
        assert_eq!(hero.mana, mana);
        assert!(hero.spellbook.slot(0).is_some_and(|s| s.is_ready()));
    }

    #[test]
    fn test_mana_regenerates_over_time() {
        let mut hero = Hero::default();
        hero.mana = 0;
        hero.tick(250.0);
        assert_eq!(hero.mana, 0);
        hero.tick(250.0);
        assert_eq!(hero.mana, 1);
        hero.tick(500.0);
        assert_eq!(hero.mana, 2);
    }

    #[test]
    fn test_face_ignores_zero() {
        let mut hero = Hero::default();
        hero.face(Position::new(0.0, -3.0));
        assert_eq!(hero.facing, Position::new(0.0, -1.0));
        hero.face(Position::ZERO);
        assert_eq!(hero.facing, Position::new(0.0, -1.0));
    }

    #[test]
    fn test_gold() {
        let mut hero = Hero::default();
        hero.gold = 5;
        assert!(hero.spend_gold(8).is_err());
        assert_eq!(hero.gold, 5);
        hero.spend_gold(5).unwrap();
        assert_eq!(hero.gold, 0);
    }
}
