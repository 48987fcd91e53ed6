// src/dungeon/src/boss_room.rs

use crate::config::GenConfig;
use crate::level::{Grid, TileKind};

/// Pillars sit where both coordinates are multiples of this.
const PILLAR_SPACING: i32 = 4;
/// Chebyshev radius kept clear around spawn, boss and exit.
const CLEARANCE: i32 = 2;
const MIN_ARENA_W: i32 = 11;
const MIN_ARENA_H: i32 = 9;

/// Boss 房间布局
#[derive(Clone, Debug, PartialEq)]
pub struct Arena {
    pub grid: Grid,
    pub spawn: (i32, i32),
    pub boss: (i32, i32),
    pub exit: (i32, i32),
}

fn near(a: (i32, i32), b: (i32, i32)) -> bool {
    (a.0 - b.0).abs() <= CLEARANCE && (a.1 - b.1).abs() <= CLEARANCE
}

/// 生成 Boss 竞技场：玩家在西侧，Boss 居中，出口在东墙边
///
/// Boss 与出生点的距离不小于 `safe_radius`，竞技场不够宽时向东扩展。
pub fn build_arena(cfg: &GenConfig) -> Arena {
    let spawn_x = 2;
    let reach = cfg.safe_radius.max(0.0).ceil() as i32;
    // boss + clear gap + exit + border
    let w = cfg.arena_width.max(MIN_ARENA_W).max(spawn_x + reach + 4);
    let h = cfg.arena_height.max(MIN_ARENA_H);
    let mut grid = Grid::filled(w, h, TileKind::Floor);
    grid.seal_border();

    let spawn = (spawn_x, h / 2);
    let boss = ((w / 2).max(spawn_x + reach), h / 2);
    let exit = (w - 3, h / 2);

    // 掩体
    for y in 2..h - 2 {
        for x in 2..w - 2 {
            let p = (x, y);
            if x % PILLAR_SPACING == 0
                && y % PILLAR_SPACING == 0
                && !near(p, spawn)
                && !near(p, boss)
                && !near(p, exit)
            {
                grid.set(x, y, TileKind::Wall);
            }
        }
    }

    Arena {
        grid,
        spawn,
        boss,
        exit,
    }
}
