// src/dungeon/src/level/rooms.rs
use rand::Rng;

use super::grid::Grid;
use super::tiles::TileKind;
use crate::config::GenConfig;

/// 生成期间使用的矩形房间，生成后丢弃
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn area(&self) -> i32 {
        self.w * self.h
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }

    /// Overlap test grown by `buffer` tiles on every side.
    pub fn intersects(&self, other: &Room, buffer: i32) -> bool {
        self.x - buffer < other.x + other.w
            && other.x - buffer < self.x + self.w
            && self.y - buffer < other.y + other.h
            && other.y - buffer < self.y + self.h
    }

    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let Room { x, y, w, h } = *self;
        (y..y + h).flat_map(move |ty| (x..x + w).map(move |tx| (tx, ty)))
    }

    pub fn carve(&self, grid: &mut Grid) {
        for (x, y) in self.tiles() {
            grid.set(x, y, TileKind::Floor);
        }
    }
}

/// Axis-aligned corridor: fully along x at `from.1`, then fully along y at `to.0`.
pub fn carve_elbow(grid: &mut Grid, from: (i32, i32), to: (i32, i32)) {
    let (x0, x1) = (from.0.min(to.0), from.0.max(to.0));
    for x in x0..=x1 {
        grid.set(x, from.1, TileKind::Floor);
    }
    let (y0, y1) = (from.1.min(to.1), from.1.max(to.1));
    for y in y0..=y1 {
        grid.set(to.0, y, TileKind::Floor);
    }
}

/// One pass of rectangle proposals. Rooms are chained in acceptance order.
fn propose_layout(rng: &mut impl Rng, cfg: &GenConfig, target: usize) -> (Grid, Vec<Room>) {
    let mut grid = Grid::filled(cfg.width, cfg.height, TileKind::Wall);
    let mut rooms: Vec<Room> = Vec::new();
    let min = cfg.room_min.max(1);
    let max = cfg.room_max.max(min);

    for _ in 0..cfg.room_attempts {
        if rooms.len() >= target {
            break;
        }
        let w = rng.random_range(min..=max);
        let h = rng.random_range(min..=max);
        // Leave the outer ring as wall.
        let (max_x, max_y) = (cfg.width - 1 - w, cfg.height - 1 - h);
        if max_x < 1 || max_y < 1 {
            continue;
        }
        let room = Room::new(
            rng.random_range(1..=max_x),
            rng.random_range(1..=max_y),
            w,
            h,
        );
        if rooms.iter().any(|other| room.intersects(other, 1)) {
            continue;
        }
        room.carve(&mut grid);
        if let Some(prev) = rooms.last() {
            carve_elbow(&mut grid, prev.center(), room.center());
        }
        rooms.push(room);
    }
    grid.seal_border();
    (grid, rooms)
}

/// Room-graph layout for `floor`.
///
/// Layouts with fewer than `min_rooms` rooms are thrown away and regenerated.
/// Once the attempt budget is spent the best layout seen is kept, or `None`
/// if not a single room fit.
pub fn build_room_layout(
    rng: &mut impl Rng,
    cfg: &GenConfig,
    floor: u32,
) -> Option<(Grid, Vec<Room>)> {
    let target = cfg.room_target_for(floor).max(1);
    let mut best: Option<(Grid, Vec<Room>)> = None;

    for attempt in 0..cfg.max_layout_attempts.max(1) {
        let (grid, rooms) = propose_layout(rng, cfg, target);
        if rooms.len() >= cfg.min_rooms {
            return Some((grid, rooms));
        }
        tracing::debug!(attempt, rooms = rooms.len(), "too few rooms, regenerating layout");
        if best.as_ref().is_none_or(|(_, b)| rooms.len() > b.len()) {
            best = Some((grid, rooms));
        }
    }

    tracing::warn!(floor, "room layout attempts exhausted, keeping best layout");
    best.filter(|(_, rooms)| !rooms.is_empty())
}
