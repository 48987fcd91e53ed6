// src/dungeon/src/geometry.rs
//! Line of sight and movement validation over the tile grid.
//!
//! Invalid input (off-grid positions) degrades to "blocked" rather than failing.

use combat::{Entity, EntityId, PLAYER_ID, Position};

use crate::level::Grid;

/// Upper bound on DDA steps for a single sight line.
pub const MAX_SIGHT_STEPS: u32 = 60;
/// Distance from the target at which a sight line counts as arrived.
const ARRIVAL_RADIUS: f32 = 0.5;
/// Sample spacing used when probing for walls along a ray.
const PROBE_STEP: f32 = 0.25;

fn tile_is_wall(grid: &Grid, at: Position) -> bool {
    let (x, y) = at.tile();
    grid.is_wall(x, y)
}

/// Whether `mover` may step onto `target`.
///
/// Blocked by Wall/off-grid tiles, by live blocking entities other than the
/// mover, and by the player's tile unless the mover is the player.
pub fn is_valid_move(
    grid: &Grid,
    entities: &[Entity],
    target: Position,
    mover: EntityId,
    player_pos: Position,
) -> bool {
    let tile = target.tile();
    if grid.is_wall(tile.0, tile.1) {
        return false;
    }
    if mover != PLAYER_ID && player_pos.tile() == tile {
        return false;
    }
    !entities
        .iter()
        .any(|e| e.id != mover && e.is_blocking() && e.position.tile() == tile)
}

/// Grid DDA walk from `from` towards `to`.
///
/// Returns `false` as soon as a Wall tile is crossed before getting within half
/// a tile of `to`. Walks of more than [`MAX_SIGHT_STEPS`] stop early and count
/// as clear.
pub fn has_line_of_sight(grid: &Grid, from: Position, to: Position) -> bool {
    let (fx, fy) = from.tile();
    if !grid.in_bounds(fx, fy) {
        return false;
    }
    let delta = to - from;
    let steps = delta.x.abs().max(delta.y.abs()).ceil();
    if steps < 1.0 {
        return true;
    }
    let increment = delta * (1.0 / steps);
    let mut cursor = from;
    for _ in 0..(steps as u32).min(MAX_SIGHT_STEPS) {
        cursor = cursor + increment;
        if cursor.distance_to(&to) < ARRIVAL_RADIUS {
            return true;
        }
        if tile_is_wall(grid, cursor) {
            return false;
        }
    }
    true
}

/// Last open point along `direction` before the first wall, capped at `max_distance`.
///
/// Ranged weapons aim here so shots never target a point inside a wall.
pub fn first_wall_along(
    grid: &Grid,
    from: Position,
    direction: Position,
    max_distance: f32,
) -> Position {
    let dir = direction.normalized();
    if dir.is_zero() {
        return from;
    }
    let mut travelled = 0.0;
    let mut last_open = from;
    while travelled < max_distance {
        travelled = (travelled + PROBE_STEP).min(max_distance);
        let point = from + dir * travelled;
        if tile_is_wall(grid, point) {
            return last_open;
        }
        last_open = point;
    }
    last_open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::TileKind;
    use combat::Stats;

    fn open_room() -> Grid {
        let mut grid = Grid::filled(12, 8, TileKind::Floor);
        grid.seal_border();
        grid
    }

    #[test]
    fn test_los_blocked_by_wall_column() {
        let mut grid = open_room();
        for y in 0..8 {
            grid.set(5, y, TileKind::Wall);
        }
        let a = Position::new(2.0, 3.0);
        let b = Position::new(8.0, 3.0);
        assert!(!has_line_of_sight(&grid, a, b));
        assert!(has_line_of_sight(&grid, a, Position::new(4.0, 5.0)));
    }

    #[test]
    fn test_los_off_grid_origin() {
        let grid = open_room();
        assert!(!has_line_of_sight(
            &grid,
            Position::new(-3.0, 2.0),
            Position::new(3.0, 2.0)
        ));
        assert!(has_line_of_sight(
            &grid,
            Position::new(3.0, 2.0),
            Position::new(3.2, 2.1)
        ));
    }

    #[test]
    fn test_valid_move_rules() {
        let grid = open_room();
        let player = Position::new(3.0, 3.0);
        let mut blocker = Entity::barrel(7, Position::new(5.0, 3.0));
        let coin = Entity::new(
            8,
            combat::EntityKind::Gold { amount: 3 },
            Position::new(6.0, 3.0),
            Stats::inert(1),
        );
        let entities = vec![blocker.clone(), coin];

        assert!(!is_valid_move(&grid, &entities, Position::new(0.0, 3.0), 1, player));
        assert!(!is_valid_move(&grid, &entities, Position::new(3.2, 2.9), 1, player));
        assert!(is_valid_move(&grid, &entities, Position::new(3.2, 2.9), PLAYER_ID, player));
        assert!(!is_valid_move(&grid, &entities, Position::new(5.0, 3.0), 1, player));
        assert!(is_valid_move(&grid, &entities, Position::new(5.0, 3.0), 7, player));
        assert!(is_valid_move(&grid, &entities, Position::new(6.0, 3.0), 1, player));

        blocker.crumble();
        assert!(is_valid_move(&grid, &[blocker], Position::new(5.0, 3.0), 1, player));
    }

    #[test]
    fn test_probe_stops_before_wall() {
        let grid = open_room();
        let hit = first_wall_along(&grid, Position::new(3.0, 3.0), Position::new(1.0, 0.0), 50.0);
        assert!(hit.x < 10.5 && hit.x >= 10.0);
        let short = first_wall_along(&grid, Position::new(3.0, 3.0), Position::new(1.0, 0.0), 2.0);
        assert_eq!(short, Position::new(5.0, 3.0));
    }
}
