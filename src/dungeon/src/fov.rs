// src/dungeon/src/fov.rs
//! Ray-cast field of view with soft light falloff.
//!
//! Rays are sampled at a fixed step, so a ray grazing a wall corner can light
//! a tile just past it. That slack is accepted.

use std::f32::consts::TAU;

use combat::Position;

use crate::config::FovConfig;
use crate::level::{Grid, Visibility};

const FALLBACK_STEP: f32 = 0.25;

/// Recompute visibility and light for `viewer`, returning the updated grid.
///
/// Tiles lit this pass become Visible; previously Visible tiles that were
/// missed fall back to Fog; Hidden tiles stay Hidden until a ray reaches them.
pub fn compute_fov(grid: &Grid, viewer: Position, config: &FovConfig) -> Grid {
    let mut out = grid.clone();
    let mut lit: Vec<Option<f32>> = vec![None; grid.tiles().len()];
    let step = if config.ray_step > 0.0 {
        config.ray_step
    } else {
        FALLBACK_STEP
    };
    let radius = config.radius.max(0.0);

    for i in 0..config.ray_count {
        let angle = i as f32 * TAU / config.ray_count as f32;
        let dir = Position::new(angle.cos(), angle.sin());
        let mut distance = step;
        while distance <= radius {
            let (x, y) = (viewer + dir * distance).tile();
            let Some(index) = grid.index(x, y) else {
                break;
            };
            let light = ((1.0 - distance / radius) * config.boost).clamp(0.0, 1.0);
            let slot = &mut lit[index];
            *slot = Some(slot.map_or(light, |prev| prev.max(light)));
            if grid.is_wall(x, y) {
                break;
            }
            distance += step;
        }
    }

    for (x, y) in grid.coords() {
        let Some(index) = grid.index(x, y) else {
            continue;
        };
        let Some(tile) = out.get_mut(x, y) else {
            continue;
        };
        match lit[index] {
            Some(light) => {
                tile.visibility = Visibility::Visible;
                tile.light = light;
            }
            None => {
                if tile.visibility == Visibility::Visible {
                    tile.visibility = Visibility::Fog;
                }
                tile.light = 0.0;
            }
        }
    }

    let (vx, vy) = viewer.tile();
    if let Some(tile) = out.get_mut(vx, vy) {
        tile.visibility = Visibility::Visible;
        tile.light = 1.0;
    }
    out
}
