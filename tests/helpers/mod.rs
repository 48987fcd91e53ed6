//! Builders for hand-made worlds used by the integration tests.
#![allow(dead_code)]

use pixel_crawler::GameConfig;
use pixel_crawler::WorldState;
use pixel_crawler::combat::{Entity, Position};
use pixel_crawler::dungeon::{GeneratedFloor, Grid, Layout, Theme, TileKind};
use pixel_crawler::hero::{Class, Hero};
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub fn rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Walled rectangle of open floor.
pub fn open_grid(width: i32, height: i32) -> Grid {
    let mut grid = Grid::filled(width, height, TileKind::Floor);
    grid.seal_border();
    grid
}

/// Builder for a world with a fixed layout and hand-placed entities.
pub struct TestWorldBuilder {
    grid: Grid,
    hero_at: Position,
    class: Class,
    entities: Vec<Entity>,
    config: GameConfig,
}

impl TestWorldBuilder {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: open_grid(width, height),
            hero_at: Position::new(1.0, 1.0),
            class: Class::Warrior,
            entities: Vec::new(),
            config: GameConfig::default(),
        }
    }

    pub fn with_wall(mut self, x: i32, y: i32) -> Self {
        self.grid.set(x, y, TileKind::Wall);
        self
    }

    pub fn with_hero(mut self, x: f32, y: f32) -> Self {
        self.hero_at = Position::new(x, y);
        self
    }

    pub fn with_class(mut self, class: Class) -> Self {
        self.class = class;
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_config(mut self, edit: impl FnOnce(&mut GameConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    pub fn build(self) -> WorldState {
        let floor = GeneratedFloor {
            floor: 1,
            grid: self.grid,
            spawn: self.hero_at,
            entities: self.entities,
            theme: Theme::Crypt,
            layout: Layout::Rooms,
        };
        let hero = Hero::new(self.class, self.hero_at);
        let mut state = WorldState::from_floor(floor, hero, self.config);
        state.drain_feedback();
        state
    }
}
