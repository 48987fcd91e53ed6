// src/dungeon/src/population.rs
//! Entity placement for a freshly carved floor.

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use rand::seq::IndexedRandom;

use combat::boss::BossType;
use combat::{Entity, EntityKind, Position, ShopItem, ShopOffer, Stats};

use crate::config::GenConfig;
use crate::level::{Grid, Room};
use crate::theme::{Layout, Theme};

/// Side of the square cells open layouts are split into for placement.
const CELL: i32 = 8;
/// Zone size at which per-zone loot chances apply in full.
const FULL_LOOT_ZONE: f32 = 40.0;
const TOP_UP_ATTEMPTS: u32 = 200;
const POTION_HEAL: i32 = 15;

/// Everything population needs to know about the carved floor.
pub struct FloorPlan<'a> {
    pub grid: &'a Grid,
    pub rooms: &'a [Room],
    pub layout: Layout,
    pub theme: Theme,
    pub floor: u32,
    pub spawn: (i32, i32),
    pub exit: (i32, i32),
    pub boss: Option<(i32, i32)>,
}

/// Floor tiles grouped for placement: one zone per room, or square cells of
/// open floor for caves and arenas. Zones touching the spawn tile are dropped.
fn zones(plan: &FloorPlan) -> Vec<Vec<(i32, i32)>> {
    if !plan.rooms.is_empty() {
        return plan
            .rooms
            .iter()
            .filter(|room| !room.contains(plan.spawn.0, plan.spawn.1))
            .map(|room| room.tiles().collect())
            .collect();
    }
    let mut cells: BTreeMap<(i32, i32), Vec<(i32, i32)>> = BTreeMap::new();
    for (x, y) in plan.grid.floor_tiles() {
        cells.entry((x / CELL, y / CELL)).or_default().push((x, y));
    }
    cells
        .into_values()
        .filter(|tiles| !tiles.contains(&plan.spawn))
        .collect()
}

fn at(tile: (i32, i32)) -> Position {
    Position::from_tile(tile.0, tile.1)
}

/// `expected` rounded stochastically so the fractional part still counts.
fn stochastic_count(rng: &mut impl Rng, expected: f32) -> usize {
    let whole = expected.max(0.0).floor();
    let extra = rng.random_bool(f64::from(expected - whole).clamp(0.0, 1.0));
    whole as usize + usize::from(extra)
}

fn merchant_stock(floor: u32) -> Vec<ShopOffer> {
    vec![
        ShopOffer {
            item: ShopItem::HealingDraught { heal: 20 },
            price: 15 + floor * 2,
            stock: 2,
        },
        ShopOffer {
            item: ShopItem::ManaTonic { mana: 30 },
            price: 12 + floor * 2,
            stock: 2,
        },
        ShopOffer {
            item: ShopItem::Whetstone { attack: 1 },
            price: 40 + floor * 5,
            stock: 1,
        },
    ]
}

struct Placer<'a, R: Rng> {
    rng: &'a mut R,
    cfg: &'a GenConfig,
    plan: &'a FloorPlan<'a>,
    entities: Vec<Entity>,
}

impl<R: Rng> Placer<'_, R> {
    fn push(&mut self, make: impl FnOnce(u32) -> Entity) {
        // Ids are provisional; the final pass renumbers.
        let entity = make(self.entities.len() as u32 + 1);
        self.entities.push(entity);
    }

    fn pick(&mut self, zone: &[(i32, i32)]) -> Option<(i32, i32)> {
        zone.choose(&mut *self.rng).copied()
    }

    fn roll(&mut self, chance: f64, zone_len: usize) -> bool {
        let scale = (zone_len as f32 / FULL_LOOT_ZONE).min(1.0) as f64;
        self.rng.random_bool((chance * scale).clamp(0.0, 1.0))
    }

    fn spawn_enemy(&mut self, tile: (i32, i32)) {
        let roster = self.plan.theme.roster();
        let unlocked = (2 + self.plan.floor as usize / 2).clamp(1, roster.len());
        let kind = roster[self.rng.random_range(0..unlocked)];
        let floor = self.plan.floor;
        self.push(|id| kind.spawn(id, at(tile), floor));
    }

    fn populate_zone(&mut self, zone: &[(i32, i32)]) {
        if self.plan.layout != Layout::BossArena {
            let density = self.cfg.enemy_density_for(self.plan.floor);
            let count = stochastic_count(&mut *self.rng, zone.len() as f32 * density);
            for _ in 0..count {
                if let Some(tile) = self.pick(zone) {
                    self.spawn_enemy(tile);
                }
            }
        }

        let count = stochastic_count(&mut *self.rng, zone.len() as f32 * self.cfg.decoration_density);
        let styles = self.plan.theme.decorations();
        for _ in 0..count {
            let (Some(tile), Some(&style)) = (self.pick(zone), styles.choose(&mut *self.rng)) else {
                continue;
            };
            self.push(|id| Entity::decoration(id, at(tile), style));
        }

        let floor = self.plan.floor;
        if self.roll(self.cfg.gold_chance, zone.len()) {
            if let Some(tile) = self.pick(zone) {
                let amount = self.rng.random_range(5..=15) + floor * 2;
                self.push(|id| Entity::new(id, EntityKind::Gold { amount }, at(tile), Stats::inert(1)));
            }
        }
        if self.roll(self.cfg.potion_chance, zone.len()) {
            if let Some(tile) = self.pick(zone) {
                self.push(|id| {
                    Entity::new(id, EntityKind::Potion { heal: POTION_HEAL }, at(tile), Stats::inert(1))
                });
            }
        }
        if self.roll(self.cfg.barrel_chance, zone.len()) {
            for _ in 0..self.rng.random_range(1..=2) {
                if let Some(tile) = self.pick(zone) {
                    self.push(|id| Entity::barrel(id, at(tile)));
                }
            }
        }
        if self.roll(self.cfg.chest_chance, zone.len()) {
            if let Some(tile) = self.pick(zone) {
                let gold = self.rng.random_range(20..=40) + floor * 5;
                self.push(|id| {
                    Entity::new(id, EntityKind::Chest { gold, opened: false }, at(tile), Stats::inert(1))
                });
            }
        }
    }

    fn place_specials(&mut self, zones: &[Vec<(i32, i32)>]) {
        if zones.is_empty() {
            return;
        }
        if self.rng.random_bool(self.cfg.shrine_chance.clamp(0.0, 1.0)) {
            let zone = &zones[self.rng.random_range(0..zones.len())];
            if let Some(tile) = self.pick(zone) {
                self.push(|id| {
                    Entity::new(id, EntityKind::Shrine { used: false }, at(tile), Stats::inert(1))
                });
            }
        }
        if self.plan.floor >= 2 && self.rng.random_bool(self.cfg.merchant_chance.clamp(0.0, 1.0)) {
            let zone = &zones[self.rng.random_range(0..zones.len())];
            if let Some(tile) = self.pick(zone) {
                let stock = merchant_stock(self.plan.floor);
                self.push(|id| Entity::new(id, EntityKind::Merchant { stock }, at(tile), Stats::inert(1)));
            }
        }
    }

    fn is_free(&self, tile: (i32, i32), occupied: &HashSet<(i32, i32)>) -> bool {
        tile != self.plan.spawn
            && !occupied.contains(&tile)
            && at(tile).distance_to(&at(self.plan.spawn)) >= self.cfg.safe_radius
    }

    /// Add enemies on free tiles until `min_enemies` hostiles exist.
    fn top_up_enemies(&mut self) {
        let hostiles = self.entities.iter().filter(|e| e.is_hostile).count();
        let missing = self.cfg.min_enemies.saturating_sub(hostiles);
        if missing == 0 {
            return;
        }
        let floor_tiles = self.plan.grid.floor_tiles();
        let mut occupied: HashSet<(i32, i32)> =
            self.entities.iter().map(|e| e.position.tile()).collect();

        let mut placed = 0;
        for _ in 0..TOP_UP_ATTEMPTS {
            if placed == missing {
                return;
            }
            let Some(&tile) = floor_tiles.choose(&mut *self.rng) else {
                return;
            };
            if self.is_free(tile, &occupied) {
                occupied.insert(tile);
                self.spawn_enemy(tile);
                placed += 1;
            }
        }

        // Random probing failed on a cramped floor: walk tiles farthest-first.
        let spawn = at(self.plan.spawn);
        let mut by_distance = floor_tiles;
        by_distance.sort_by(|a, b| at(*b).distance_to(&spawn).total_cmp(&at(*a).distance_to(&spawn)));
        for tile in by_distance {
            if placed == missing {
                break;
            }
            if self.is_free(tile, &occupied) {
                occupied.insert(tile);
                self.spawn_enemy(tile);
                placed += 1;
            }
        }
        if placed < missing {
            tracing::warn!(placed, missing, "floor too small for the minimum enemy count");
        }
    }
}

/// Place every entity for the floor described by `plan`.
///
/// Guarantees: exactly one hidden Stairs at `plan.exit`, no hostile within
/// `safe_radius` of spawn, at most one entity per tile, nothing on the spawn
/// tile, ids numbered from 1.
pub fn populate(rng: &mut impl Rng, cfg: &GenConfig, plan: &FloorPlan) -> Vec<Entity> {
    let zones = zones(plan);
    let mut placer = Placer {
        rng,
        cfg,
        plan,
        entities: Vec::new(),
    };

    // Stairs first so the per-tile dedupe below keeps it.
    placer.push(|id| Entity::stairs(id, at(plan.exit)));
    if let Some(boss_tile) = plan.boss {
        let boss = BossType::for_encounter(plan.floor / cfg.boss_every.max(1));
        placer.push(|id| boss.spawn(id, at(boss_tile), plan.floor));
    }
    for zone in &zones {
        placer.populate_zone(zone);
    }
    placer.place_specials(&zones);

    let spawn = at(plan.spawn);
    let before = placer.entities.len();
    placer
        .entities
        .retain(|e| !(e.is_hostile && e.position.distance_to(&spawn) < cfg.safe_radius));
    let removed = before - placer.entities.len();
    if removed > 0 {
        tracing::debug!(removed, "cleared hostiles from spawn area");
    }

    let mut seen = HashSet::new();
    placer
        .entities
        .retain(|e| e.position.tile() != plan.spawn && seen.insert(e.position.tile()));

    placer.top_up_enemies();

    let mut entities = placer.entities;
    for (i, entity) in entities.iter_mut().enumerate() {
        entity.id = i as u32 + 1;
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::TileKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn open_grid(w: i32, h: i32) -> Grid {
        let mut grid = Grid::filled(w, h, TileKind::Floor);
        grid.seal_border();
        grid
    }

    #[test]
    fn test_cramped_floor_still_gets_two_enemies() {
        let grid = open_grid(14, 5);
        let cfg = GenConfig {
            enemy_density: 0.0,
            density_per_floor: 0.0,
            ..GenConfig::default()
        };
        let plan = FloorPlan {
            grid: &grid,
            rooms: &[],
            layout: Layout::Cave,
            theme: Theme::Caverns,
            floor: 1,
            spawn: (1, 2),
            exit: (12, 2),
            boss: None,
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let entities = populate(&mut rng, &cfg, &plan);
        assert_eq!(entities.iter().filter(|e| e.is_enemy()).count(), 2);
        assert_eq!(entities.iter().filter(|e| e.is_stairs()).count(), 1);
        for e in entities.iter().filter(|e| e.is_enemy()) {
            assert!(e.position.distance_to(&at(plan.spawn)) >= cfg.safe_radius);
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        let grid = open_grid(40, 30);
        let plan = FloorPlan {
            grid: &grid,
            rooms: &[],
            layout: Layout::Cave,
            theme: Theme::Caverns,
            floor: 3,
            spawn: (2, 2),
            exit: (37, 27),
            boss: None,
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let entities = populate(&mut rng, &GenConfig::default(), &plan);
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        let expected: Vec<u32> = (1..=entities.len() as u32).collect();
        assert_eq!(ids, expected);
        assert!(entities[0].is_stairs() && entities[0].is_hidden);
    }
}
