//! Per-tick simulation phases. Each phase reads and writes [`WorldState`]
//! directly and reports side effects through its feedback queue.

pub mod ai;
pub mod damage;
pub mod projectiles;
pub mod status;

use combat::{EntityId, Position, Velocity};
use dungeon::is_valid_move;

use crate::world::WorldState;

fn axis(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Destination for `mover` stepping `distance` along `direction`, trying the
/// direct vector, then the x-only and y-only components. `None` if all three
/// are blocked.
pub(crate) fn slide_target(
    state: &WorldState,
    mover: EntityId,
    from: Position,
    direction: Velocity,
    distance: f32,
) -> Option<Position> {
    let dir = direction.normalized();
    if dir.is_zero() || distance <= 0.0 {
        return None;
    }
    let candidates = [
        dir,
        Velocity::new(axis(dir.x), 0.0),
        Velocity::new(0.0, axis(dir.y)),
    ];
    candidates
        .into_iter()
        .filter(|c| !c.is_zero())
        .map(|c| from + c * distance)
        .find(|&target| {
            is_valid_move(&state.grid, &state.entities, target, mover, state.hero.position)
        })
}

/// Open 12x8 room with the hero standing at (1, 1).
#[cfg(test)]
pub(crate) fn test_arena(entities: Vec<combat::Entity>) -> WorldState {
    use crate::config::GameConfig;
    use dungeon::{GeneratedFloor, Grid, Layout, Theme, TileKind};
    use hero::{Class, Hero};

    let mut grid = Grid::filled(12, 8, TileKind::Floor);
    grid.seal_border();
    let spawn = Position::new(1.0, 1.0);
    let floor = GeneratedFloor {
        floor: 1,
        grid,
        spawn,
        entities,
        theme: Theme::Crypt,
        layout: Layout::Rooms,
    };
    let mut state = WorldState::from_floor(floor, Hero::new(Class::Warrior, spawn), GameConfig::default());
    state.drain_feedback();
    state
}
