// src/hero/src/class.rs

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use items::WeaponKind;

/// 英雄职业枚举
#[derive(
    Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize, EnumIter,
)]
pub enum Class {
    #[default]
    Warrior, // 战士（高生命值，中等攻击，擅长近战）

    Mage,     // 法师（低生命值，法力充沛）
    Rogue,    // 盗贼（中等生命值，高暴击率）
    Huntress, // 女猎手（远程攻击，中等属性）
}

impl Class {
    /// 获取职业的基础生命值
    pub fn base_hp(&self) -> i32 {
        match self {
            Class::Warrior => 40,
            Class::Mage => 26,
            Class::Rogue => 32,
            Class::Huntress => 30,
        }
    }

    pub fn base_attack(&self) -> i32 {
        match self {
            Class::Warrior => 8,
            Class::Mage => 5,
            Class::Rogue => 6,
            Class::Huntress => 6,
        }
    }

    pub fn base_defense(&self) -> i32 {
        match self {
            Class::Warrior => 4,
            Class::Mage => 1,
            Class::Rogue => 2,
            Class::Huntress => 2,
        }
    }

    pub fn base_mana(&self) -> u32 {
        match self {
            Class::Warrior => 30,
            Class::Mage => 80,
            Class::Rogue => 40,
            Class::Huntress => 45,
        }
    }

    /// 获取职业的暴击率
    pub fn crit_chance(&self) -> f32 {
        match self {
            Class::Warrior => 0.05,
            Class::Mage => 0.04,
            Class::Rogue => 0.15,
            Class::Huntress => 0.08,
        }
    }

    /// 获取职业的初始武器
    pub fn starting_weapon(&self) -> WeaponKind {
        match self {
            Class::Warrior => WeaponKind::Sword,
            Class::Mage => WeaponKind::Dagger,
            Class::Rogue => WeaponKind::Dagger,
            Class::Huntress => WeaponKind::Bow,
        }
    }
}

impl std::fmt::Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Class::Warrior => "Warrior",
                Class::Mage => "Mage",
                Class::Rogue => "Rogue",
                Class::Huntress => "Huntress",
            }
        )
    }
}
