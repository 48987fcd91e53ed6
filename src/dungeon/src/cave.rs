// src/dungeon/src/cave.rs
//! Cellular-automaton caves: random fill, smoothing, then keep the largest
//! connected pocket.

use rand::Rng;

use crate::config::GenConfig;
use crate::level::{Grid, TileKind};

const CHAMBER_HALF_W: i32 = 3;
const CHAMBER_HALF_H: i32 = 2;

fn wall_neighbours(grid: &Grid, x: i32, y: i32) -> u32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx, dy) != (0, 0) && grid.is_wall(x + dx, y + dy) {
                count += 1;
            }
        }
    }
    count
}

/// One synchronous smoothing step: ≥5 wall neighbours → Wall, ≤3 → Floor,
/// exactly 4 → unchanged. Off-grid counts as Wall.
fn smooth(grid: &Grid) -> Grid {
    let mut next = grid.clone();
    for (x, y) in grid.coords() {
        if grid.is_border(x, y) {
            continue;
        }
        match wall_neighbours(grid, x, y) {
            n if n >= 5 => next.set(x, y, TileKind::Wall),
            n if n <= 3 => next.set(x, y, TileKind::Floor),
            _ => {}
        }
    }
    next
}

fn seed_noise(rng: &mut impl Rng, cfg: &GenConfig) -> Grid {
    let mut grid = Grid::filled(cfg.width, cfg.height, TileKind::Wall);
    let fill = cfg.cave_fill.clamp(0.0, 1.0);
    for (x, y) in grid.coords() {
        if !grid.is_border(x, y) && !rng.random_bool(fill) {
            grid.set(x, y, TileKind::Floor);
        }
    }
    grid
}

/// Small open room in the middle of the grid, the last-resort cave.
fn carve_chamber(grid: &mut Grid) {
    let (cx, cy) = (grid.width() / 2, grid.height() / 2);
    for y in cy - CHAMBER_HALF_H..=cy + CHAMBER_HALF_H {
        for x in cx - CHAMBER_HALF_W..=cx + CHAMBER_HALF_W {
            grid.set(x, y, TileKind::Floor);
        }
    }
    grid.seal_border();
}

/// Build a cave grid with a single connected Floor region.
///
/// Regenerates while the surviving region is smaller than `min_cave_tiles`,
/// keeps the best attempt once the budget runs out and falls back to a
/// central chamber if every attempt came up empty.
pub fn build_cave(rng: &mut impl Rng, cfg: &GenConfig) -> Grid {
    let mut best: Option<(Grid, usize)> = None;

    for attempt in 0..cfg.max_cave_attempts.max(1) {
        let mut grid = seed_noise(rng, cfg);
        for _ in 0..cfg.cave_iterations {
            grid = smooth(&grid);
        }
        let size = grid.keep_largest_region();
        if size >= cfg.min_cave_tiles {
            return grid;
        }
        tracing::debug!(attempt, size, "cave too small, regenerating");
        if best.as_ref().is_none_or(|(_, b)| size > *b) {
            best = Some((grid, size));
        }
    }

    tracing::warn!("cave attempts exhausted, keeping best cave");
    match best {
        Some((grid, size)) if size > 0 => grid,
        _ => {
            let mut grid = Grid::filled(cfg.width, cfg.height, TileKind::Wall);
            carve_chamber(&mut grid);
            grid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_smoothing_rules() {
        let mut grid = Grid::filled(5, 5, TileKind::Floor);
        grid.seal_border();
        // Centre of an open 3x3 pocket has no wall neighbours and stays open.
        let next = smooth(&grid);
        assert!(next.is_floor(2, 2));
        // Corner of the pocket touches five border walls.
        assert!(next.is_wall(1, 1));
    }

    #[test]
    fn test_cave_is_single_region() {
        let mut rng = Pcg32::seed_from_u64(5);
        let cfg = GenConfig::default();
        let grid = build_cave(&mut rng, &cfg);
        let regions = grid.regions();
        assert_eq!(regions.len(), 1);
        assert!(grid.floor_count() > 0);
    }

    #[test]
    fn test_solid_fill_falls_back_to_chamber() {
        let mut rng = Pcg32::seed_from_u64(5);
        let cfg = GenConfig {
            cave_fill: 1.0,
            max_cave_attempts: 2,
            ..GenConfig::default()
        };
        let grid = build_cave(&mut rng, &cfg);
        assert_eq!(grid.floor_count(), 35);
        assert!(grid.is_floor(grid.width() / 2, grid.height() / 2));
    }
}
