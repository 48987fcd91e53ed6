//! The single owner of simulation state for one run.
use bincode::config::standard;
use rand::Rng;
use serde::{Deserialize, Serialize};

use combat::{
    DamageQueue, Entity, EntityId, EntityKind, Explosion, FeedbackEvent, FeedbackQueue, Position,
    Projectile,
};
use dungeon::{GeneratedFloor, Grid, Layout, Theme, compute_fov, generate};
use error::GameError;
use hero::{Class, Hero};

use crate::config::GameConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub floor: u32,
    pub theme: Theme,
    pub layout: Layout,
    pub grid: Grid,
    pub hero: Hero,
    pub entities: Vec<Entity>,
    pub projectiles: Vec<Projectile>,
    /// Resolved in FIFO order by the next damage pass.
    pub damage_queue: DamageQueue,
    /// Blasts waiting for the next explosion pass.
    pub pending_explosions: Vec<Explosion>,
    pub stairs_revealed: bool,
    pub elapsed_ms: f64,
    pub ticks: u64,
    pub config: GameConfig,
    next_projectile_id: u32,
    #[serde(skip)]
    pub feedback: FeedbackQueue,
}

impl WorldState {
    /// Generate `floor` and place a fresh hero of `class` on its spawn point.
    pub fn new(class: Class, config: GameConfig, floor: u32, rng: &mut impl Rng) -> Self {
        let generated = generate(floor, rng, &config.generation);
        let hero = Hero::new(class, generated.spawn);
        Self::from_floor(generated, hero, config)
    }

    pub fn from_floor(generated: GeneratedFloor, hero: Hero, config: GameConfig) -> Self {
        let mut state = Self {
            floor: generated.floor,
            theme: generated.theme,
            layout: generated.layout,
            grid: Grid::filled(1, 1, dungeon::TileKind::Wall),
            hero,
            entities: Vec::new(),
            projectiles: Vec::new(),
            damage_queue: DamageQueue::new(),
            pending_explosions: Vec::new(),
            stairs_revealed: false,
            elapsed_ms: 0.0,
            ticks: 0,
            config,
            next_projectile_id: 1,
            feedback: FeedbackQueue::new(),
        };
        state.load_floor(generated);
        state
    }

    fn load_floor(&mut self, generated: GeneratedFloor) {
        self.floor = generated.floor;
        self.theme = generated.theme;
        self.layout = generated.layout;
        self.grid = generated.grid;
        self.entities = generated.entities;
        self.projectiles.clear();
        self.damage_queue = DamageQueue::new();
        self.pending_explosions.clear();
        self.stairs_revealed = false;
        self.hero.position = generated.spawn;
        self.refresh_fov();
        self.feedback.log(
            format!("Floor {}: {} ({})", self.floor, self.theme, self.layout),
            combat::LogLevel::Info,
        );
    }

    pub fn player_pos(&self) -> Position {
        self.hero.position
    }

    pub fn entity_index(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Queue a projectile under a fresh id.
    pub fn spawn_projectile(&mut self, mut projectile: Projectile) -> u32 {
        projectile.id = self.next_projectile_id;
        self.next_projectile_id += 1;
        let id = projectile.id;
        self.projectiles.push(projectile);
        id
    }

    pub fn live_hostiles(&self) -> usize {
        self.entities.iter().filter(|e| e.is_live_hostile()).count()
    }

    pub fn stairs(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_stairs())
    }

    pub fn refresh_fov(&mut self) {
        self.grid = compute_fov(&self.grid, self.hero.position, &self.config.fov);
    }

    /// Standing on the exit once it has been revealed.
    pub fn on_exit(&self) -> bool {
        self.stairs().is_some_and(|stairs| {
            !stairs.is_hidden && stairs.position.tile() == self.hero.position.tile()
        })
    }

    /// Generate the next floor and carry the hero onto it.
    pub fn descend(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        if !self.on_exit() {
            return Err(GameError::NotOnExit);
        }
        let next = generate(self.floor + 1, rng, &self.config.generation);
        tracing::info!(floor = next.floor, "descending");
        self.load_floor(next);
        Ok(())
    }

    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        self.feedback.drain()
    }

    /// Encode the whole state. Pending feedback is not included.
    pub fn snapshot(&self) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serde::encode_to_vec(self, standard())?)
    }

    pub fn restore(bytes: &[u8]) -> Result<Self, GameError> {
        let (state, _) = bincode::serde::decode_from_slice(bytes, standard())?;
        Ok(state)
    }

    /// Text map: walls, floor, fog and the visible entities on top.
    pub fn ascii_map(&self) -> String {
        let mut rows: Vec<Vec<char>> = (0..self.grid.height())
            .map(|y| {
                (0..self.grid.width())
                    .map(|x| match self.grid.get(x, y) {
                        Some(t) if !t.is_explored() => ' ',
                        Some(t) if t.is_wall() => '#',
                        Some(t) if t.is_visible() => '.',
                        _ => ',',
                    })
                    .collect()
            })
            .collect();

        let mut put = |pos: Position, glyph: char| {
            let (x, y) = pos.tile();
            if let Some(cell) = rows.get_mut(y as usize).and_then(|r| r.get_mut(x as usize)) {
                *cell = glyph;
            }
        };
        for entity in &self.entities {
            if entity.is_hidden || entity.is_dead {
                continue;
            }
            let glyph = match &entity.kind {
                EntityKind::Enemy(data) if data.is_boss => 'B',
                EntityKind::Enemy(data) => data.name.chars().next().unwrap_or('e'),
                EntityKind::Merchant { .. } => 'M',
                EntityKind::Chest { opened: false, .. } => 'C',
                EntityKind::Chest { .. } => 'c',
                EntityKind::Gold { .. } => '$',
                EntityKind::Potion { .. } => '!',
                EntityKind::Stairs => '>',
                EntityKind::Decoration(_) => '"',
                EntityKind::Rubble => '%',
                EntityKind::Barrel => 'o',
                EntityKind::Shrine { .. } => '^',
            };
            put(entity.position, glyph);
        }
        for projectile in &self.projectiles {
            put(projectile.position(), '*');
        }
        put(self.hero.position, '@');

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
