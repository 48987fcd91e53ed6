//! Phase 2: enemy behaviour.
//!
//! Melee brutes close in and swing on a cooldown. Ranged enemies keep their
//! distance, fire when they can see the player and back off when crowded.
use std::collections::HashSet;

use combat::{
    AiBehavior, Combat, Combatant, DamageEvent, DamageSource, EntityId, FeedbackEvent, PLAYER_ID,
    Position, Projectile,
};
use dungeon::{first_wall_along, has_line_of_sight};

use super::slide_target;
use crate::world::WorldState;

/// What one enemy decided to do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Idle,
    Move(Position),
    Melee,
    Fire,
}

fn cooldown_for(state: &WorldState, behavior: AiBehavior) -> f32 {
    let t = &state.config.combat;
    match behavior {
        AiBehavior::Tank => t.tank_cooldown_ms,
        AiBehavior::Archer => t.archer_cooldown_ms,
        AiBehavior::Caster => t.caster_cooldown_ms,
        AiBehavior::Sniper => t.sniper_cooldown_ms,
        AiBehavior::Chaser | AiBehavior::Static => t.melee_cooldown_ms,
    }
}

fn range_for(state: &WorldState, behavior: AiBehavior) -> f32 {
    if behavior == AiBehavior::Sniper {
        state.config.combat.sniper_range
    } else {
        state.config.combat.fire_range
    }
}

/// Pure decision for the enemy at `index`.
pub fn decide(state: &WorldState, index: usize, frame: f32) -> Intent {
    let entity = &state.entities[index];
    let (Some(behavior), Some(data)) = (entity.behavior(), entity.enemy_data()) else {
        return Intent::Idle;
    };
    if !state.hero.alive || behavior == AiBehavior::Static {
        return Intent::Idle;
    }

    let t = &state.config.combat;
    let player = state.hero.position;
    let distance = entity.position.distance_to(&player);
    let ready = data.attack_cooldown_ms <= 0.0;
    let step = entity.stats.speed * frame;
    let step_along = |direction: Position| {
        slide_target(state, entity.id, entity.position, direction, step)
            .map_or(Intent::Idle, Intent::Move)
    };

    if behavior.is_ranged() {
        if distance < t.kite_distance {
            return step_along(entity.position - player);
        }
        if distance <= range_for(state, behavior)
            && has_line_of_sight(&state.grid, entity.position, player)
        {
            return if ready { Intent::Fire } else { Intent::Idle };
        }
        if distance <= t.ranged_aggro_radius {
            return step_along(player - entity.position);
        }
        return Intent::Idle;
    }

    if distance <= t.melee_range {
        if ready { Intent::Melee } else { Intent::Idle }
    } else if distance <= t.aggro_radius {
        step_along(player - entity.position)
    } else {
        Intent::Idle
    }
}

fn melee(state: &mut WorldState, index: usize) {
    let entity = &state.entities[index];
    let damage = Combat::melee_damage(entity, &state.hero);
    let direction = (state.hero.position - entity.position).normalized();
    let id = entity.id;
    state
        .damage_queue
        .push(DamageEvent::new(PLAYER_ID, damage, DamageSource::Enemy(id)));
    state.feedback.push(FeedbackEvent::AttackAnimation {
        entity: id,
        direction,
    });
    state.feedback.shake(4.0, 150.0);
}

fn fire(state: &mut WorldState, index: usize, behavior: AiBehavior) {
    let t = &state.config.combat;
    let entity = &state.entities[index];
    let aim = (state.hero.position - entity.position).normalized();
    let start = entity.position + aim * t.muzzle_offset;
    let target = first_wall_along(&state.grid, start, aim, range_for(state, behavior) + 1.0);
    let speed = if behavior == AiBehavior::Sniper {
        t.sniper_projectile_speed
    } else {
        t.enemy_projectile_speed
    };
    let mut shot = Projectile::new(0, start, target, speed, entity.attack_power())
        .owned_by(entity.id)
        .enemy_owned();
    if behavior == AiBehavior::Caster {
        shot = shot.with_homing(t.caster_homing);
    }
    let id = entity.id;
    state.spawn_projectile(shot);
    state.feedback.push(FeedbackEvent::AttackAnimation {
        entity: id,
        direction: aim,
    });
}

/// Run every living enemy not listed in `busy`. Returns how many acted.
pub fn run(state: &mut WorldState, dt_ms: f32, frame: f32, busy: &HashSet<EntityId>) -> usize {
    let mut acted = 0;
    for i in 0..state.entities.len() {
        let entity = &mut state.entities[i];
        if !entity.is_live_hostile() {
            continue;
        }
        let Some(behavior) = entity.behavior() else {
            continue;
        };
        if let Some(data) = entity.enemy_data_mut() {
            data.attack_cooldown_ms = (data.attack_cooldown_ms - dt_ms).max(0.0);
        }
        if busy.contains(&entity.id) {
            continue;
        }

        let attacked = match decide(state, i, frame) {
            Intent::Idle => continue,
            Intent::Move(to) => {
                state.entities[i].position = to;
                false
            }
            Intent::Melee => {
                melee(state, i);
                true
            }
            Intent::Fire => {
                fire(state, i, behavior);
                true
            }
        };
        if attacked {
            let cooldown = cooldown_for(state, behavior);
            if let Some(data) = state.entities[i].enemy_data_mut() {
                data.attack_cooldown_ms = cooldown;
            }
        }
        acted += 1;
    }
    acted
}
