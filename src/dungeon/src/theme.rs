// src/dungeon/src/theme.rs
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use combat::DecorationStyle;
use combat::enemy::EnemyKind;

/// How a floor's walls were laid out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize, Encode, Decode,
)]
pub enum Layout {
    Rooms,
    Cave,
    BossArena,
}

/// 楼层主题，决定敌人名单和装饰
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize, Encode, Decode,
)]
pub enum Theme {
    Crypt,
    Catacombs,
    Caverns,
    Inferno,
    #[strum(serialize = "Boss Lair")]
    BossLair,
}

impl Theme {
    pub fn for_floor(floor: u32, layout: Layout) -> Self {
        match layout {
            Layout::BossArena => Theme::BossLair,
            Layout::Cave => Theme::Caverns,
            Layout::Rooms => match floor {
                0..=3 => Theme::Crypt,
                4..=7 => Theme::Catacombs,
                _ => Theme::Inferno,
            },
        }
    }

    /// 敌人名单，越靠后越强
    pub fn roster(self) -> &'static [EnemyKind] {
        match self {
            Theme::Crypt => &[EnemyKind::Rat, EnemyKind::Bat, EnemyKind::Gnoll, EnemyKind::Guard],
            Theme::Catacombs => &[
                EnemyKind::Snake,
                EnemyKind::Gnoll,
                EnemyKind::Guard,
                EnemyKind::Warlock,
                EnemyKind::Sentry,
            ],
            Theme::Caverns => &[
                EnemyKind::Bat,
                EnemyKind::Crab,
                EnemyKind::Scorpion,
                EnemyKind::Golem,
            ],
            Theme::Inferno => &[
                EnemyKind::Scorpion,
                EnemyKind::Warlock,
                EnemyKind::Golem,
                EnemyKind::Marksman,
            ],
            Theme::BossLair => &[EnemyKind::Guard, EnemyKind::Warlock],
        }
    }

    pub fn decorations(self) -> &'static [DecorationStyle] {
        match self {
            Theme::Crypt => &[DecorationStyle::Bones, DecorationStyle::Cobweb, DecorationStyle::Torch],
            Theme::Catacombs => &[DecorationStyle::Skull, DecorationStyle::Bones, DecorationStyle::Torch],
            Theme::Caverns => &[DecorationStyle::Moss, DecorationStyle::Crystal],
            Theme::Inferno => &[DecorationStyle::Skull, DecorationStyle::Torch],
            Theme::BossLair => &[DecorationStyle::Torch, DecorationStyle::Skull],
        }
    }
}
