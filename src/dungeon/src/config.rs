//! Generation and visibility knobs. Every field has a default so partial
//! configuration files are accepted.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub width: i32,
    pub height: i32,

    pub room_min: i32,
    pub room_max: i32,
    /// Room target on floor 0; one more every second floor.
    pub base_room_count: usize,
    pub max_room_count: usize,
    pub min_rooms: usize,
    /// Rectangle proposals per layout.
    pub room_attempts: u32,
    pub max_layout_attempts: u32,

    /// Chance that a regular floor is a cave instead of rooms.
    pub cave_chance: f64,
    pub cave_fill: f64,
    pub cave_iterations: u32,
    pub min_cave_tiles: usize,
    pub max_cave_attempts: u32,

    /// Every n-th floor is a boss arena; 0 disables arenas.
    pub boss_every: u32,
    pub arena_width: i32,
    pub arena_height: i32,

    /// Enemies per floor tile on floor 0.
    pub enemy_density: f32,
    pub density_per_floor: f32,
    pub max_enemy_density: f32,
    pub decoration_density: f32,
    pub min_enemies: usize,
    /// No hostile may start within this distance of the spawn point.
    pub safe_radius: f32,

    pub gold_chance: f64,
    pub potion_chance: f64,
    pub barrel_chance: f64,
    pub chest_chance: f64,
    pub shrine_chance: f64,
    pub merchant_chance: f64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 40,
            room_min: 5,
            room_max: 11,
            base_room_count: 7,
            max_room_count: 14,
            min_rooms: 4,
            room_attempts: 200,
            max_layout_attempts: 10,
            cave_chance: 0.2,
            cave_fill: 0.45,
            cave_iterations: 4,
            min_cave_tiles: 350,
            max_cave_attempts: 8,
            boss_every: 5,
            arena_width: 29,
            arena_height: 19,
            enemy_density: 0.02,
            density_per_floor: 0.004,
            max_enemy_density: 0.05,
            decoration_density: 0.01,
            min_enemies: 2,
            safe_radius: 4.0,
            gold_chance: 0.4,
            potion_chance: 0.25,
            barrel_chance: 0.35,
            chest_chance: 0.15,
            shrine_chance: 0.2,
            merchant_chance: 0.3,
        }
    }
}

impl GenConfig {
    pub fn enemy_density_for(&self, floor: u32) -> f32 {
        (self.enemy_density + self.density_per_floor * floor as f32).min(self.max_enemy_density)
    }

    pub fn room_target_for(&self, floor: u32) -> usize {
        (self.base_room_count + floor as usize / 2).min(self.max_room_count)
    }

    pub fn is_boss_floor(&self, floor: u32) -> bool {
        self.boss_every > 0 && floor > 0 && floor % self.boss_every == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FovConfig {
    pub radius: f32,
    /// Multiplier on the linear falloff before clamping to [0, 1].
    pub boost: f32,
    pub ray_count: u32,
    pub ray_step: f32,
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            boost: 1.5,
            ray_count: 360,
            ray_step: 0.25,
        }
    }
}
