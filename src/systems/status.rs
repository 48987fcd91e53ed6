//! Phase 1: status timers, burn ticks and knockback.
use std::collections::HashSet;

use rand::Rng;

use combat::{DamageEvent, DamageSource, EntityId, ParticleKind, Position, StatusKind, Velocity};

use crate::world::WorldState;

/// Sample spacing used to sweep a knockback step for walls.
const SWEEP_STEP: f32 = 0.25;

/// Whether any tile on the segment `from..=to` is a wall, so fast knockback
/// cannot hop over a one-tile wall.
fn path_hits_wall(state: &WorldState, from: Position, to: Position) -> bool {
    let length = from.distance_to(&to);
    let samples = (length / SWEEP_STEP).ceil().max(1.0) as u32;
    (1..=samples).any(|i| {
        let (x, y) = from.lerp(&to, i as f32 / samples as f32).tile();
        state.grid.is_wall(x, y)
    })
}

/// Advance every living entity's statuses and knockback.
///
/// Returns the entities that forfeit their AI action this tick: frozen or
/// stunned ones, and anything still sliding from knockback.
pub fn run(state: &mut WorldState, dt_ms: f32, frame: f32, rng: &mut impl Rng) -> HashSet<EntityId> {
    let tuning = state.config.combat.clone();
    let mut busy = HashSet::new();

    for i in 0..state.entities.len() {
        if state.entities[i].is_dead {
            continue;
        }

        let expired = state.entities[i].status.tick(dt_ms);
        let entity = &state.entities[i];
        for kind in expired {
            tracing::trace!(entity = entity.id, %kind, "status expired");
        }

        if entity.status.has(StatusKind::Burn)
            && rng.random::<f32>() < (tuning.burn_tick_chance * frame).min(1.0)
        {
            let amount = rng.random_range(tuning.burn_damage_min..=tuning.burn_damage_max);
            state
                .damage_queue
                .push(DamageEvent::new(entity.id, amount, DamageSource::Burn));
            state.feedback.particles(entity.position, ParticleKind::Fire, 3);
        }

        if entity.status.is_incapacitated() {
            busy.insert(entity.id);
        }

        if !entity.knockback.is_zero() {
            busy.insert(entity.id);
            let target = entity.position + entity.knockback * frame;
            let blocked = path_hits_wall(state, entity.position, target);
            let entity = &mut state.entities[i];
            if blocked {
                entity.knockback = Velocity::ZERO;
                continue;
            }
            entity.position = target;
            entity.knockback = entity.knockback * tuning.knockback_drag.powf(frame);
            if entity.knockback.length() < tuning.knockback_snap {
                entity.knockback = Velocity::ZERO;
            }
        }
    }
    busy
}
