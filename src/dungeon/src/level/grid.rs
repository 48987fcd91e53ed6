// src/dungeon/src/level/grid.rs
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::tiles::{Tile, TileKind};

/// Row-major tile grid, indexed `y * width + x`.
///
/// Anything outside the grid reads as Wall.
#[derive(Clone, Debug, PartialEq, Encode, Decode, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// 创建一个填满 `kind` 的网格
    pub fn filled(width: i32, height: i32, kind: TileKind) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            tiles: vec![Tile::new(kind); (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn is_border(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| (y * self.width + x) as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(move |i| &mut self.tiles[i])
    }

    pub fn kind_at(&self, x: i32, y: i32) -> TileKind {
        self.get(x, y).map_or(TileKind::Wall, |t| t.kind)
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.kind_at(x, y) == TileKind::Wall
    }

    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.kind_at(x, y) == TileKind::Floor
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, kind: TileKind) {
        if let Some(tile) = self.get_mut(x, y) {
            tile.kind = kind;
        }
    }

    /// Force every edge tile to Wall.
    pub fn seal_border(&mut self) {
        for x in 0..self.width {
            self.set(x, 0, TileKind::Wall);
            self.set(x, self.height - 1, TileKind::Wall);
        }
        for y in 0..self.height {
            self.set(0, y, TileKind::Wall);
            self.set(self.width - 1, y, TileKind::Wall);
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    pub fn floor_tiles(&self) -> Vec<(i32, i32)> {
        self.coords().filter(|&(x, y)| self.is_floor(x, y)).collect()
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_floor()).count()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// 4-connected flood fill over Floor tiles starting at `start`.
    pub fn flood_fill(&self, start: (i32, i32)) -> Vec<(i32, i32)> {
        let mut seen = vec![false; self.tiles.len()];
        let mut region = Vec::new();
        let Some(first) = self.index(start.0, start.1) else {
            return region;
        };
        if !self.tiles[first].is_floor() {
            return region;
        }
        seen[first] = true;
        let mut queue = VecDeque::from([start]);
        while let Some((x, y)) = queue.pop_front() {
            region.push((x, y));
            for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if let Some(i) = self.index(nx, ny) {
                    if !seen[i] && self.tiles[i].is_floor() {
                        seen[i] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        region
    }

    /// Every 4-connected Floor region, largest first.
    pub fn regions(&self) -> Vec<Vec<(i32, i32)>> {
        let mut assigned = vec![false; self.tiles.len()];
        let mut regions = Vec::new();
        for (x, y) in self.coords() {
            let Some(i) = self.index(x, y) else { continue };
            if assigned[i] || !self.tiles[i].is_floor() {
                continue;
            }
            let region = self.flood_fill((x, y));
            for &(rx, ry) in &region {
                if let Some(j) = self.index(rx, ry) {
                    assigned[j] = true;
                }
            }
            regions.push(region);
        }
        regions.sort_by(|a, b| b.len().cmp(&a.len()));
        regions
    }

    /// 只保留最大的连通区域，其余填为墙
    pub fn keep_largest_region(&mut self) -> usize {
        let mut regions = self.regions();
        if regions.is_empty() {
            return 0;
        }
        let largest = regions.swap_remove(0);
        for region in regions {
            for (x, y) in region {
                self.set(x, y, TileKind::Wall);
            }
        }
        largest.len()
    }

    /// ASCII rendering: `#` wall, `.` floor.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(if self.is_wall(x, y) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_as_wall() {
        let grid = Grid::filled(4, 3, TileKind::Floor);
        assert!(grid.is_wall(-1, 0));
        assert!(grid.is_wall(4, 0));
        assert!(grid.is_wall(0, 3));
        assert!(grid.is_floor(3, 2));
        assert!(grid.get(9, 9).is_none());
    }

    #[test]
    fn test_seal_border() {
        let mut grid = Grid::filled(5, 5, TileKind::Floor);
        grid.seal_border();
        assert_eq!(grid.floor_count(), 9);
        assert!(grid.is_wall(0, 2));
        assert!(grid.is_wall(4, 4));
    }

    #[test]
    fn test_keep_largest_region() {
        let mut grid = Grid::filled(7, 3, TileKind::Wall);
        grid.set(1, 1, TileKind::Floor);
        grid.set(3, 1, TileKind::Floor);
        grid.set(4, 1, TileKind::Floor);
        grid.set(5, 1, TileKind::Floor);
        assert_eq!(grid.regions().len(), 2);
        assert_eq!(grid.keep_largest_region(), 3);
        assert!(grid.is_wall(1, 1));
        assert_eq!(grid.flood_fill((3, 1)).len(), grid.floor_count());
    }
}
