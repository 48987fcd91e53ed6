//! Real-time roguelike simulation core: floor generation, field of view and a
//! per-tick combat loop over a single owned [`WorldState`].

pub mod actions;
pub mod config;
pub mod event_bus;
pub mod game_loop;
pub mod logging;
pub mod systems;
pub mod world;

pub use combat;
pub use dungeon;
pub use error;
pub use hero;
pub use items;

pub use crate::actions::{
    InteractOutcome, MoveOutcome, SpellOutcome, interact, move_player, purchase,
    resolve_melee_attack, resolve_spell_cast,
};
pub use crate::config::GameConfig;
pub use crate::event_bus::{DispatchReport, EventBus, FeedbackSink, Priority, RecordingSink, TracingSink};
pub use crate::game_loop::{TickReport, advance_tick, run_for};
pub use crate::world::WorldState;
