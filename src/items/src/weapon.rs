//src/items/src/weapon.rs
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// 武器种类
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Encode, Decode, Serialize, Deserialize,
)]
pub enum WeaponKind {
    Sword,
    Spear,
    Axe,
    Dagger,
    Bow,
    Crossbow,
    Blunderbuss,
    Repeater,
}

/// 远程武器的射击方式
#[derive(Clone, Copy, Debug, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub enum FirePattern {
    /// 单发
    Single,
    /// 扇形散射：`count` 发，总张角 `spread_deg`
    Fan { count: u32, spread_deg: f32 },
    /// 连射：同一方向 `count` 发，速度依次递减以拉开间距
    Burst { count: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct RangedProfile {
    pub pattern: FirePattern,
    /// 每帧移动的格数
    pub projectile_speed: f32,
    pub piercing: u32,
    pub max_distance: f32,
}

/// 武器数据
#[derive(Clone, Debug, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage_bonus: i32,
    pub cooldown_ms: f32,
    pub crit_chance: f32,
    /// 近战触及距离（格）
    pub reach: f32,
    pub ranged: Option<RangedProfile>,
}

impl WeaponKind {
    pub fn weapon(self) -> Weapon {
        let (damage_bonus, cooldown_ms, crit_chance, reach, ranged) = match self {
            WeaponKind::Sword => (4, 400.0, 0.10, 1.5, None),
            WeaponKind::Spear => (3, 500.0, 0.08, 2.5, None),
            WeaponKind::Axe => (6, 650.0, 0.12, 1.5, None),
            WeaponKind::Dagger => (2, 250.0, 0.25, 1.2, None),
            WeaponKind::Bow => (
                3,
                550.0,
                0.15,
                0.0,
                Some(RangedProfile {
                    pattern: FirePattern::Single,
                    projectile_speed: 0.4,
                    piercing: 0,
                    max_distance: 12.0,
                }),
            ),
            WeaponKind::Crossbow => (
                5,
                900.0,
                0.20,
                0.0,
                Some(RangedProfile {
                    pattern: FirePattern::Single,
                    projectile_speed: 0.55,
                    piercing: 2,
                    max_distance: 14.0,
                }),
            ),
            WeaponKind::Blunderbuss => (
                2,
                1000.0,
                0.05,
                0.0,
                Some(RangedProfile {
                    pattern: FirePattern::Fan {
                        count: 5,
                        spread_deg: 40.0,
                    },
                    projectile_speed: 0.35,
                    piercing: 0,
                    max_distance: 7.0,
                }),
            ),
            WeaponKind::Repeater => (
                1,
                800.0,
                0.10,
                0.0,
                Some(RangedProfile {
                    pattern: FirePattern::Burst { count: 3 },
                    projectile_speed: 0.45,
                    piercing: 0,
                    max_distance: 11.0,
                }),
            ),
        };
        Weapon {
            kind: self,
            damage_bonus,
            cooldown_ms,
            crit_chance,
            reach,
            ranged,
        }
    }
}

impl Weapon {
    pub fn is_ranged(&self) -> bool {
        self.ranged.is_some()
    }

    /// 每次攻击发射的弹丸数量
    pub fn projectile_count(&self) -> u32 {
        match self.ranged.map(|r| r.pattern) {
            None => 0,
            Some(FirePattern::Single) => 1,
            Some(FirePattern::Fan { count, .. }) | Some(FirePattern::Burst { count }) => count,
        }
    }
}

impl Default for Weapon {
    fn default() -> Self {
        WeaponKind::Sword.weapon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_spear_outreaches_sword() {
        assert_eq!(WeaponKind::Spear.weapon().reach, 2.5);
        assert_eq!(WeaponKind::Sword.weapon().reach, 1.5);
    }

    #[test]
    fn test_melee_and_ranged_are_exclusive() {
        for kind in WeaponKind::iter() {
            let weapon = kind.weapon();
            if weapon.is_ranged() {
                assert_eq!(weapon.reach, 0.0, "{kind}");
                assert!(weapon.projectile_count() >= 1);
            } else {
                assert!(weapon.reach > 0.0, "{kind}");
                assert_eq!(weapon.projectile_count(), 0);
            }
        }
    }
}
