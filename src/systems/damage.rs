//! Phase 4: explosions and the damage queue.
//!
//! Barrels destroyed by damage queue new explosions, which queue more damage.
//! The chain is resolved in passes until nothing is pending or the pass cap
//! is hit; anything left carries over to the next tick.
use combat::{
    DamageEvent, Explosion, FeedbackEvent, LogLevel, PLAYER_ID, ParticleKind, StatusKind,
    TextStyle, resolve_explosion,
};
use tracing::{debug, info};

use crate::world::WorldState;

/// Totals for one chain resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainReport {
    pub damage_resolved: usize,
    pub kills: usize,
    pub explosions: usize,
    pub player_died: bool,
    pub stairs_revealed: bool,
}

/// Turn every pending explosion into queued damage, knockback and stuns.
pub fn resolve_explosions(state: &mut WorldState) -> usize {
    let pending = std::mem::take(&mut state.pending_explosions);
    let count = pending.len();
    for explosion in pending {
        let outcome = resolve_explosion(
            &explosion,
            &state.entities,
            state.hero.position,
            &state.config.combat,
        );
        state.damage_queue.extend(outcome.damage);
        for (id, velocity) in outcome.knockback {
            if let Some(entity) = state.entity_mut(id) {
                entity.push(velocity);
            }
        }
        let stun_ms = state.config.combat.stun_ms;
        for id in outcome.stunned {
            if let Some(entity) = state.entity_mut(id) {
                entity.status.apply(StatusKind::Stun, stun_ms);
            }
        }
        state.feedback.extend(outcome.feedback);
    }
    count
}

fn damage_player(state: &mut WorldState, event: DamageEvent, report: &mut ChainReport) {
    if !state.hero.alive {
        return;
    }
    let remaining = state.hero.take_damage(event.amount);
    state.feedback.push(FeedbackEvent::PlayerDamaged {
        amount: event.amount,
        remaining_hp: remaining,
    });
    state
        .feedback
        .text(state.hero.position, format!("-{}", event.amount), TextStyle::Damage);
    if !state.hero.alive {
        info!(floor = state.floor, "hero died");
        state.feedback.push(FeedbackEvent::PlayerDied);
        state.feedback.log("You die...", LogLevel::Warning);
        report.player_died = true;
    }
}

fn damage_entity(state: &mut WorldState, event: DamageEvent, report: &mut ChainReport) {
    let Some(index) = state.entity_index(event.target_id) else {
        return;
    };
    let entity = &mut state.entities[index];
    // Already dead or already rubble: a stale event.
    if !entity.is_targetable() {
        return;
    }

    let style = if event.is_crit {
        TextStyle::Critical
    } else {
        TextStyle::Damage
    };
    entity.stats.hp = entity.stats.hp.saturating_sub(event.amount.max(0));
    if entity.stats.hp > 0 {
        let at = entity.position;
        state.feedback.text(at, event.amount.to_string(), style);
        state.feedback.particles(at, ParticleKind::Blood, 3);
        return;
    }

    let at = entity.position;
    if entity.is_barrel() {
        entity.crumble();
        debug!(id = event.target_id, "barrel destroyed");
        state
            .pending_explosions
            .push(Explosion::barrel(at, event.source.credits_player()));
        state.feedback.particles(at, ParticleKind::Smoke, 10);
        return;
    }

    entity.kill();
    report.kills += 1;
    let name = entity.name().to_string();
    let xp = entity.stats.xp_value;
    state.feedback.particles(at, ParticleKind::Blood, 12);
    state.feedback.log(format!("The {name} dies."), LogLevel::Combat);
    if event.source.credits_player() {
        let levels = state.hero.gain_xp(xp);
        state.feedback.text(at, format!("+{xp} xp"), TextStyle::Xp);
        if levels > 0 {
            let level = state.hero.level;
            info!(level, "hero levelled up");
            state.feedback.push(FeedbackEvent::LevelUp { level });
            state.feedback.particles(state.hero.position, ParticleKind::Magic, 20);
        }
    }
    debug!(id = event.target_id, %name, "enemy killed");
}

/// Apply every queued damage event in insertion order.
pub fn resolve_damage(state: &mut WorldState, report: &mut ChainReport) {
    let events = state.damage_queue.take();
    report.damage_resolved += events.len();
    for event in events {
        if event.target_id == PLAYER_ID {
            damage_player(state, event, report);
        } else {
            damage_entity(state, event, report);
        }
    }
}

/// Unhide the stairs once the last hostile is gone. Fires at most once per floor.
pub fn reveal_stairs(state: &mut WorldState) -> bool {
    if state.stairs_revealed || state.live_hostiles() > 0 {
        return false;
    }
    let Some(stairs) = state.entities.iter_mut().find(|e| e.is_stairs()) else {
        return false;
    };
    stairs.is_hidden = false;
    let (id, at) = (stairs.id, stairs.position);
    state.stairs_revealed = true;

    info!(floor = state.floor, x = at.x, y = at.y, "stairs revealed");
    state.feedback.push(FeedbackEvent::StairsRevealed { at });
    state.feedback.particles(at, ParticleKind::Confetti, 40);
    state.feedback.shake(6.0, 300.0);
    state.feedback.push(FeedbackEvent::SpeechBubble {
        entity: id,
        text: "The way down opens!".to_string(),
    });
    state
        .feedback
        .log("The floor is clear. The stairs are revealed.", LogLevel::Info);
    true
}

/// Explosions, then damage, repeated while barrels keep going off.
pub fn run(state: &mut WorldState) -> ChainReport {
    let mut report = ChainReport::default();
    let max_passes = state.config.combat.max_chain_passes.max(1);
    for pass in 0..max_passes {
        report.explosions += resolve_explosions(state);
        resolve_damage(state, &mut report);
        if state.pending_explosions.is_empty() && state.damage_queue.is_empty() {
            break;
        }
        if pass + 1 == max_passes {
            debug!(
                explosions = state.pending_explosions.len(),
                "chain pass cap reached, carrying over"
            );
        }
    }
    report.stairs_revealed = reveal_stairs(state);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_arena as arena;
    use combat::enemy::EnemyKind;
    use combat::{DamageSource, Entity, EntityKind, Position};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kill_awards_xp_once() {
        let rat = EnemyKind::Rat.spawn(1, Position::new(5.0, 4.0), 1);
        let mut state = arena(vec![rat]);
        state.damage_queue.push(DamageEvent::new(1, 50, DamageSource::Player));
        state.damage_queue.push(DamageEvent::new(1, 50, DamageSource::Player));
        let report = run(&mut state);
        assert_eq!(report.kills, 1);
        assert_eq!(report.damage_resolved, 2);
        assert_eq!(state.hero.experience, 2);
        assert!(state.entity(1).unwrap().is_dead);
    }

    #[test]
    fn test_enemy_kills_grant_nothing() {
        let rat = EnemyKind::Rat.spawn(1, Position::new(5.0, 4.0), 1);
        let mut state = arena(vec![rat]);
        state.damage_queue.push(DamageEvent::new(1, 50, DamageSource::Enemy(7)));
        run(&mut state);
        assert_eq!(state.hero.experience, 0);
    }

    #[test]
    fn test_barrel_becomes_rubble_and_explodes_once() {
        let barrel = Entity::barrel(1, Position::new(6.0, 4.0));
        let rat = EnemyKind::Rat.spawn(2, Position::new(7.0, 4.0), 1);
        let mut state = arena(vec![barrel, rat]);
        state.damage_queue.push(DamageEvent::new(1, 5, DamageSource::Player));
        state.damage_queue.push(DamageEvent::new(1, 5, DamageSource::Player));
        let report = run(&mut state);

        assert_eq!(report.explosions, 1);
        let rubble = state.entity(1).unwrap();
        assert_eq!(rubble.kind, EntityKind::Rubble);
        assert!(!rubble.is_blocking());
        assert!(state.entity(2).unwrap().stats.hp < state.entity(2).unwrap().stats.max_hp);
    }

    #[test]
    fn test_barrel_chain_reaction() {
        let barrels = (0..3)
            .map(|i| Entity::barrel(i + 1, Position::new(3.0 + i as f32 * 2.0, 5.0)))
            .collect();
        let mut state = arena(barrels);
        state.damage_queue.push(DamageEvent::new(1, 1, DamageSource::Player));
        let report = run(&mut state);
        assert_eq!(report.explosions, 3);
        assert!(
            state
                .entities
                .iter()
                .all(|e| matches!(e.kind, EntityKind::Rubble))
        );
    }

    #[test]
    fn test_stairs_revealed_exactly_once() {
        let rat = EnemyKind::Rat.spawn(1, Position::new(5.0, 4.0), 1);
        let stairs = Entity::stairs(2, Position::new(9.0, 6.0));
        let mut state = arena(vec![rat, stairs]);

        assert!(!run(&mut state).stairs_revealed);
        state.damage_queue.push(DamageEvent::new(1, 99, DamageSource::Player));
        assert!(run(&mut state).stairs_revealed);
        assert!(!state.stairs().unwrap().is_hidden);
        assert!(!run(&mut state).stairs_revealed);

        let reveals = state
            .drain_feedback()
            .into_iter()
            .filter(|e| matches!(e, FeedbackEvent::StairsRevealed { .. }))
            .count();
        assert_eq!(reveals, 1);
    }

    #[test]
    fn test_player_death_reported() {
        let mut state = arena(Vec::new());
        let hp = state.hero.hp;
        state
            .damage_queue
            .push(DamageEvent::new(PLAYER_ID, hp + 5, DamageSource::Enemy(3)));
        let report = run(&mut state);
        assert!(report.player_died);
        assert!(!state.hero.alive);
        assert!(state.drain_feedback().contains(&FeedbackEvent::PlayerDied));
    }
}
