//src/dungeon/src/lib.rs
//! Floor construction: tile grid, layout modes, population and visibility.
use bincode::{Decode, Encode};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use combat::{Entity, Position};

pub mod boss_room;
pub mod cave;
pub mod config;
pub mod fov;
pub mod geometry;
pub mod level;
pub mod population;
pub mod rng;
pub mod theme;

pub use crate::config::{FovConfig, GenConfig};
pub use crate::fov::compute_fov;
pub use crate::geometry::{first_wall_along, has_line_of_sight, is_valid_move};
pub use crate::level::{Grid, Room, Tile, TileKind, Visibility};
pub use crate::rng::{DungeonRng, floor_seed};
pub use crate::theme::{Layout, Theme};

use crate::population::FloorPlan;

/// A freshly generated floor.
#[derive(Clone, Debug, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct GeneratedFloor {
    pub floor: u32,
    pub grid: Grid,
    pub spawn: Position,
    pub entities: Vec<Entity>,
    pub theme: Theme,
    pub layout: Layout,
}

/// Floor tile farthest from `from`, other than `from` itself.
fn farthest_tile(grid: &Grid, from: (i32, i32)) -> (i32, i32) {
    let origin = Position::from_tile(from.0, from.1);
    grid.floor_tiles()
        .into_iter()
        .filter(|&t| t != from)
        .max_by(|a, b| {
            let da = Position::from_tile(a.0, a.1).distance_to(&origin);
            let db = Position::from_tile(b.0, b.1).distance_to(&origin);
            da.total_cmp(&db)
        })
        .unwrap_or(from)
}

/// 生成指定楼层
///
/// Deterministic for a given RNG state. Never returns a floor without Floor
/// tiles: failed layouts are retried a bounded number of times and then the
/// best attempt, or a cave, is used instead.
pub fn generate(floor: u32, rng: &mut impl Rng, cfg: &GenConfig) -> GeneratedFloor {
    let mut rooms = Vec::new();
    let (layout, grid, spawn, exit, boss) = if cfg.is_boss_floor(floor) {
        let arena = boss_room::build_arena(cfg);
        (Layout::BossArena, arena.grid, arena.spawn, arena.exit, Some(arena.boss))
    } else {
        let room_layout = if rng.random_bool(cfg.cave_chance.clamp(0.0, 1.0)) {
            None
        } else {
            let built = level::rooms::build_room_layout(rng, cfg, floor);
            if built.is_none() {
                tracing::warn!(floor, "no room fit, falling back to a cave");
            }
            built
        };
        match room_layout {
            Some((grid, built)) => {
                let spawn = built[0].center();
                let exit = match built.last() {
                    Some(last) if built.len() > 1 => last.center(),
                    _ => farthest_tile(&grid, spawn),
                };
                rooms = built;
                (Layout::Rooms, grid, spawn, exit, None)
            }
            None => {
                let grid = cave::build_cave(rng, cfg);
                let centre = (grid.width() / 2, grid.height() / 2);
                let spawn = grid
                    .floor_tiles()
                    .choose(rng)
                    .copied()
                    .unwrap_or(centre);
                let exit = farthest_tile(&grid, spawn);
                (Layout::Cave, grid, spawn, exit, None)
            }
        }
    };

    let theme = Theme::for_floor(floor, layout);
    let plan = FloorPlan {
        grid: &grid,
        rooms: &rooms,
        layout,
        theme,
        floor,
        spawn,
        exit,
        boss,
    };
    let entities = population::populate(rng, cfg, &plan);

    tracing::info!(
        floor,
        %layout,
        %theme,
        rooms = rooms.len(),
        floor_tiles = grid.floor_count(),
        entities = entities.len(),
        "floor generated"
    );

    GeneratedFloor {
        floor,
        grid,
        spawn: Position::from_tile(spawn.0, spawn.1),
        entities,
        theme,
        layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_seed_same_floor() {
        let cfg = GenConfig::default();
        let a = generate(2, &mut DungeonRng::new(77), &cfg);
        let b = generate(2, &mut DungeonRng::new(77), &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn test_boss_floor_has_one_boss() {
        let cfg = GenConfig::default();
        let floor = generate(5, &mut DungeonRng::new(1), &cfg);
        assert_eq!(floor.layout, Layout::BossArena);
        assert_eq!(floor.theme, Theme::BossLair);
        let bosses = floor
            .entities
            .iter()
            .filter(|e| e.enemy_data().is_some_and(|d| d.is_boss))
            .count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn test_forced_cave() {
        let cfg = GenConfig {
            cave_chance: 1.0,
            ..GenConfig::default()
        };
        let floor = generate(1, &mut DungeonRng::new(4), &cfg);
        assert_eq!(floor.layout, Layout::Cave);
        let (sx, sy) = floor.spawn.tile();
        assert!(floor.grid.is_floor(sx, sy));
    }
}
