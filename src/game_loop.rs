//! 实时游戏循环：每次调用推进一个模拟帧。
//!
//! Phases run in a fixed order against a single [`WorldState`]:
//!
//! 0. hero upkeep (weapon and spell cooldowns, mana regeneration)
//! 1. status effects and knockback
//! 2. enemy AI
//! 3. projectile flight
//! 4. explosions and damage, repeated for barrel chains
//!
//! Feedback produced along the way is returned in the [`TickReport`] for the
//! caller to hand to an [`EventBus`](crate::event_bus::EventBus).

use combat::FeedbackEvent;
use rand::Rng;
use tracing::trace;

use crate::systems::{ai, damage, projectiles, status};
use crate::world::WorldState;

/// Result of one [`advance_tick`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// `dt` after clamping.
    pub dt_ms: f32,
    pub feedback: Vec<FeedbackEvent>,
    pub enemies_acted: usize,
    pub damage_resolved: usize,
    pub kills: usize,
    pub explosions: usize,
    pub projectiles_live: usize,
    pub player_died: bool,
    pub stairs_revealed: bool,
}

/// Advance the simulation by `dt_ms` milliseconds.
///
/// `dt_ms` is clamped to `[0, max_dt_ms]` so a stalled caller cannot make
/// entities tunnel through walls on the next call.
pub fn advance_tick(state: &mut WorldState, dt_ms: f32, rng: &mut impl Rng) -> TickReport {
    let dt_ms = state.config.combat.clamp_dt(dt_ms);
    let frame = state.config.combat.frame_factor(dt_ms);

    // 0: 英雄冷却和法力恢复
    state.hero.tick(dt_ms);
    // 1
    let busy = status::run(state, dt_ms, frame, rng);
    // 2
    let enemies_acted = ai::run(state, dt_ms, frame, &busy);
    // 3
    let projectiles_live = projectiles::run(state, frame, rng);
    // 4
    let chain = damage::run(state);

    state.ticks += 1;
    state.elapsed_ms += f64::from(dt_ms);
    trace!(
        tick = state.ticks,
        dt_ms,
        enemies_acted,
        projectiles_live,
        damage = chain.damage_resolved,
        "tick"
    );

    TickReport {
        dt_ms,
        feedback: state.drain_feedback(),
        enemies_acted,
        damage_resolved: chain.damage_resolved,
        kills: chain.kills,
        explosions: chain.explosions,
        projectiles_live,
        player_died: chain.player_died,
        stairs_revealed: chain.stairs_revealed,
    }
}

/// Run `ticks` fixed steps, stopping early if the hero dies.
pub fn run_for(
    state: &mut WorldState,
    ticks: u32,
    dt_ms: f32,
    rng: &mut impl Rng,
) -> Vec<TickReport> {
    let mut reports = Vec::with_capacity(ticks as usize);
    for _ in 0..ticks {
        let report = advance_tick(state, dt_ms, rng);
        let died = report.player_died;
        reports.push(report);
        if died {
            break;
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_arena as arena;
    use combat::enemy::EnemyKind;
    use combat::{DamageEvent, DamageSource, Position};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_dt_is_clamped() {
        let mut state = arena(Vec::new());
        let mut rng = Pcg32::seed_from_u64(3);
        let report = advance_tick(&mut state, 5_000.0, &mut rng);
        assert_eq!(report.dt_ms, 100.0);
        assert_eq!(state.ticks, 1);
        assert_eq!(state.elapsed_ms, 100.0);
    }

    #[test]
    fn test_queued_damage_resolves_same_tick() {
        let rat = EnemyKind::Rat.spawn(1, Position::new(8.0, 5.0), 1);
        let mut state = arena(vec![rat]);
        state
            .damage_queue
            .push(DamageEvent::new(1, 100, DamageSource::Player));
        let mut rng = Pcg32::seed_from_u64(3);
        let report = advance_tick(&mut state, 16.0, &mut rng);
        assert_eq!(report.kills, 1);
        assert!(state.damage_queue.is_empty());
    }

    #[test]
    fn test_run_for_stops_on_death() {
        let mut state = arena(Vec::new());
        let hp = state.hero.hp;
        state
            .damage_queue
            .push(DamageEvent::new(combat::PLAYER_ID, hp, DamageSource::Enemy(4)));
        let mut rng = Pcg32::seed_from_u64(3);
        let reports = run_for(&mut state, 50, 16.0, &mut rng);
        assert_eq!(reports.len(), 1);
        assert!(reports[0].player_died);
    }
}
