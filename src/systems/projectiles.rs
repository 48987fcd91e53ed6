//! Phase 3: projectile flight and hit detection.
use rand::Rng;

use combat::{
    Combat, Combatant, DamageEvent, DamageSource, PLAYER_ID, ParticleKind, Position, Projectile,
    StatusKind, TextStyle,
};

use crate::world::WorldState;

/// What happened to one projectile this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flight {
    Flying,
    Destroyed,
}

/// Aim point a homing shot should bend towards.
fn homing_target(state: &WorldState, projectile: &Projectile) -> Option<Position> {
    if projectile.is_enemy_owned {
        return state.hero.alive.then_some(state.hero.position);
    }
    let here = projectile.position();
    state
        .entities
        .iter()
        .filter(|e| e.is_targetable() && !projectile.has_hit(e.id))
        .min_by(|a, b| {
            a.position
                .distance_to(&here)
                .total_cmp(&b.position.distance_to(&here))
        })
        .map(|e| e.position)
}

fn detonate(state: &mut WorldState, projectile: &Projectile, at: Position) {
    if let Some(explosion) = projectile.explosion_at(at) {
        state.pending_explosions.push(explosion);
    }
}

fn hit_player(state: &mut WorldState, projectile: &Projectile, rng: &mut impl Rng) {
    let base = Combat::mitigate(projectile.damage, state.hero.defense());
    let (amount, crit) = Combat::roll(rng, base, projectile.crit_chance);
    let source = projectile.owner.map_or(DamageSource::Explosion { by_player: false }, DamageSource::Enemy);
    state
        .damage_queue
        .push(DamageEvent::new(PLAYER_ID, amount, source).critical(crit));
    state
        .feedback
        .particles(state.hero.position, ParticleKind::Blood, 6);
}

/// Hit every targetable entity in reach, nearest first, until the projectile
/// runs out of piercing.
fn hit_entities(
    state: &mut WorldState,
    projectile: &mut Projectile,
    at: Position,
    rng: &mut impl Rng,
) -> Flight {
    let t = state.config.combat.clone();
    let mut candidates: Vec<(usize, f32)> = state
        .entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_targetable() && !projectile.has_hit(e.id))
        .map(|(i, e)| (i, e.position.distance_to(&at)))
        .filter(|&(_, d)| d <= t.target_radius)
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

    for (index, _) in candidates {
        let target = &state.entities[index];
        let id = target.id;
        let base = Combat::mitigate(projectile.damage, target.defense());
        let (amount, crit) = Combat::roll(rng, base, projectile.crit_chance);
        state
            .damage_queue
            .push(DamageEvent::new(id, amount, DamageSource::Player).critical(crit));
        let style = if crit { TextStyle::Critical } else { TextStyle::Damage };
        state.feedback.text(target.position, amount.to_string(), style);

        let target = &mut state.entities[index];
        if !target.is_barrel() {
            if projectile.knockback > 0.0 {
                target.push(projectile.direction() * projectile.knockback);
            }
            if projectile.freezes {
                target.status.apply(StatusKind::Freeze, t.freeze_ms);
                state.feedback.particles(target.position, ParticleKind::Frost, 8);
            }
            if projectile.burns {
                target.status.apply(StatusKind::Burn, t.burn_ms);
            }
        }

        if !projectile.register_hit(id) {
            detonate(state, projectile, at);
            return Flight::Destroyed;
        }
    }
    Flight::Flying
}

fn fly(state: &mut WorldState, projectile: &mut Projectile, frame: f32, rng: &mut impl Rng) -> Flight {
    if projectile.homing > 0.0 {
        if let Some(aim) = homing_target(state, projectile) {
            projectile.steer_towards(aim);
        }
    }
    let at = projectile.advance(frame);

    let (tx, ty) = at.tile();
    if state.grid.is_wall(tx, ty) {
        state.feedback.particles(at, ParticleKind::Sparks, 4);
        detonate(state, projectile, at);
        return Flight::Destroyed;
    }

    if projectile.is_enemy_owned {
        if state.hero.alive
            && at.distance_to(&state.hero.position) <= state.config.combat.player_hitbox
        {
            hit_player(state, projectile, rng);
            return Flight::Destroyed;
        }
    } else if hit_entities(state, projectile, at, rng) == Flight::Destroyed {
        return Flight::Destroyed;
    }

    if projectile.is_spent() {
        detonate(state, projectile, at);
        return Flight::Destroyed;
    }
    Flight::Flying
}

/// Advance every projectile once. Returns the number still in flight.
pub fn run(state: &mut WorldState, frame: f32, rng: &mut impl Rng) -> usize {
    let in_flight = std::mem::take(&mut state.projectiles);
    let mut survivors = Vec::with_capacity(in_flight.len());
    for mut projectile in in_flight {
        if fly(state, &mut projectile, frame, rng) == Flight::Flying {
            survivors.push(projectile);
        }
    }
    // Shots fired during this phase were pushed onto the emptied list.
    survivors.append(&mut state.projectiles);
    state.projectiles = survivors;
    state.projectiles.len()
}
