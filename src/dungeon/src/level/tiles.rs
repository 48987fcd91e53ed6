// src/dungeon/src/level/tiles.rs
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::Display;

/// 地形类型
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, Encode, Decode, Serialize, Deserialize,
)]
pub enum TileKind {
    Floor,
    #[default]
    Wall,
}

/// 可见状态：一旦见过就不会回到 Hidden
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, Encode, Decode, Serialize, Deserialize,
)]
pub enum Visibility {
    #[default]
    Hidden,
    /// 曾经可见，现在处于记忆中
    Fog,
    Visible,
}

/// 表示游戏中的一个地图格子，坐标由所在网格的下标隐含
#[derive(Clone, Copy, Debug, Default, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub visibility: Visibility,
    /// 光照强度 [0, 1]，不可见时为 0
    pub light: f32,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn is_wall(&self) -> bool {
        self.kind == TileKind::Wall
    }

    pub fn is_floor(&self) -> bool {
        self.kind == TileKind::Floor
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// 是否已被探索过(用于记忆系统)
    pub fn is_explored(&self) -> bool {
        self.visibility != Visibility::Hidden
    }
}
