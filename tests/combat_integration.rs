//! End-to-end combat behaviour through the public tick loop.
mod helpers;

use helpers::{TestWorldBuilder, rng};
use pixel_crawler::combat::enemy::EnemyKind;
use pixel_crawler::combat::{
    DamageEvent, DamageSource, Entity, EntityKind, FeedbackEvent, PLAYER_ID, Position, Projectile,
    Velocity,
};
use pixel_crawler::dungeon::{TileKind, is_valid_move};
use pixel_crawler::systems::{projectiles, status};
use pixel_crawler::items::WeaponKind;
use pixel_crawler::{WorldState, advance_tick, resolve_melee_attack};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Tough dummies in a row along y = 5.
fn dummies(count: u32) -> WorldState {
    let mut builder = TestWorldBuilder::new(30, 10);
    for i in 0..count {
        let mut dummy = EnemyKind::Golem.spawn(i + 1, Position::new(6.0 + 2.0 * i as f32, 5.0), 1);
        dummy.stats.speed = 0.0;
        builder = builder.with_entity(dummy);
    }
    builder.build()
}

#[test]
fn piercing_projectile_hits_n_plus_one_targets_once_each() {
    for piercing in 0..3u32 {
        let mut state = dummies(5);
        state.spawn_projectile(
            Projectile::new(0, Position::new(3.0, 5.0), Position::new(27.0, 5.0), 0.5, 20)
                .with_piercing(piercing),
        );
        let mut rng = rng(11);
        for _ in 0..60 {
            projectiles::run(&mut state, 1.0, &mut rng);
        }
        let targets: Vec<_> = state.damage_queue.iter().map(|e| e.target_id).collect();
        let expected: Vec<_> = (1..=piercing + 1).collect();
        assert_eq!(targets, expected, "piercing {piercing}");
        assert!(state.projectiles.is_empty());
    }
}

#[test]
fn damage_to_dead_target_is_a_no_op() {
    let mut state = dummies(1);
    let mut rng = rng(2);
    for _ in 0..3 {
        state
            .damage_queue
            .push(DamageEvent::new(1, 500, DamageSource::Player));
    }
    let report = advance_tick(&mut state, 16.0, &mut rng);
    assert_eq!(report.kills, 1);
    let golem = state.entity(1).expect("dead entities stay in the list");
    assert!(golem.is_dead);
    assert_eq!(golem.stats.hp, 0);
    let xp_after_kill = (state.hero.level, state.hero.experience);

    state
        .damage_queue
        .push(DamageEvent::new(1, 500, DamageSource::Player));
    let report = advance_tick(&mut state, 16.0, &mut rng);
    assert_eq!(report.kills, 0);
    assert_eq!((state.hero.level, state.hero.experience), xp_after_kill);
}

#[test]
fn stale_ids_are_ignored() {
    let mut state = dummies(1);
    state
        .damage_queue
        .push(DamageEvent::new(999, 5, DamageSource::Player));
    let report = advance_tick(&mut state, 16.0, &mut rng(0));
    assert_eq!(report.damage_resolved, 1);
    assert_eq!(report.kills, 0);
}

#[test]
fn barrel_leaves_walkable_rubble_and_one_explosion() {
    let mut barrel = Entity::barrel(1, Position::new(10.0, 5.0));
    barrel.stats.hp = 1;
    let mut state = TestWorldBuilder::new(20, 10).with_entity(barrel).build();
    state
        .damage_queue
        .push(DamageEvent::new(1, 999_999, DamageSource::Player));
    state
        .damage_queue
        .push(DamageEvent::new(1, 999_999, DamageSource::Player));
    let report = advance_tick(&mut state, 16.0, &mut rng(4));
    assert_eq!(report.explosions, 1);
    assert_eq!(report.kills, 0);

    let rubble = state.entity(1).expect("rubble stays");
    assert_eq!(rubble.kind, EntityKind::Rubble);
    assert!(!rubble.is_dead);
    assert!(!rubble.is_hostile);
    assert!(is_valid_move(
        &state.grid,
        &state.entities,
        Position::new(10.0, 5.0),
        PLAYER_ID,
        state.hero.position,
    ));

    let later = advance_tick(&mut state, 16.0, &mut rng(4));
    assert_eq!(later.explosions, 0);
}

#[test]
fn stairs_are_revealed_exactly_once() {
    let mut state = TestWorldBuilder::new(20, 10)
        .with_entity(EnemyKind::Rat.spawn(1, Position::new(15.0, 7.0), 1))
        .with_entity(EnemyKind::Bat.spawn(2, Position::new(16.0, 2.0), 1))
        .with_entity(Entity::stairs(3, Position::new(17.0, 5.0)))
        .build();
    let mut rng = rng(8);

    state
        .damage_queue
        .push(DamageEvent::new(1, 100, DamageSource::Player));
    assert!(!advance_tick(&mut state, 16.0, &mut rng).stairs_revealed);
    assert!(state.stairs().is_some_and(|s| s.is_hidden));

    state
        .damage_queue
        .push(DamageEvent::new(2, 100, DamageSource::Player));
    let report = advance_tick(&mut state, 16.0, &mut rng);
    assert!(report.stairs_revealed);
    assert!(
        report
            .feedback
            .iter()
            .any(|e| matches!(e, FeedbackEvent::StairsRevealed { .. }))
    );

    for _ in 0..5 {
        let report = advance_tick(&mut state, 16.0, &mut rng);
        assert!(!report.stairs_revealed);
    }
}

#[test]
fn one_cleave_killing_the_last_two_reveals_stairs_once() {
    let mut state = TestWorldBuilder::new(20, 10)
        .with_hero(5.0, 5.0)
        .with_entity(EnemyKind::Rat.spawn(1, Position::new(6.0, 5.0), 1))
        .with_entity(EnemyKind::Rat.spawn(2, Position::new(6.0, 5.5), 1))
        .with_entity(Entity::stairs(3, Position::new(17.0, 5.0)))
        .build();
    for id in 1..=2 {
        if let Some(rat) = state.entity_mut(id) {
            rat.stats.hp = 1;
        }
    }
    state.hero.facing = Velocity::new(1.0, 0.0);
    let weapon = WeaponKind::Axe.weapon();
    let mut rng = rng(13);

    let events = resolve_melee_attack(&mut state, &weapon, &mut rng);
    assert_eq!(events.len(), 2);
    let report = advance_tick(&mut state, 16.0, &mut rng);
    assert_eq!(report.kills, 2);
    assert!(report.stairs_revealed);
    let reveals = report
        .feedback
        .iter()
        .filter(|e| matches!(e, FeedbackEvent::StairsRevealed { .. }))
        .count();
    assert_eq!(reveals, 1);
    assert!(state.stairs().is_some_and(|s| !s.is_hidden));

    let later = advance_tick(&mut state, 16.0, &mut rng);
    assert!(!later.stairs_revealed);
}

#[test]
fn archer_backs_off_instead_of_firing() {
    let mut state = TestWorldBuilder::new(20, 10)
        .with_hero(8.0, 5.0)
        .with_entity(EnemyKind::Gnoll.spawn(1, Position::new(10.0, 5.0), 1))
        .build();
    let mut rng = rng(5);
    for _ in 0..10 {
        advance_tick(&mut state, 16.0, &mut rng);
    }
    let gnoll = state.entity(1).expect("alive");
    assert!(gnoll.position.distance_to(&state.hero.position) > 2.0);
    assert!(state.projectiles.is_empty());
    assert_eq!(state.hero.hp, state.hero.max_hp);
}

#[test]
fn explosion_hurts_player_and_enemies() {
    let mut state = TestWorldBuilder::new(20, 10)
        .with_hero(5.0, 5.0)
        .with_entity(Entity::barrel(1, Position::new(6.0, 5.0)))
        .with_entity(EnemyKind::Rat.spawn(2, Position::new(7.0, 5.0), 1))
        .build();
    state
        .damage_queue
        .push(DamageEvent::new(1, 1, DamageSource::Player));
    let report = advance_tick(&mut state, 16.0, &mut rng(3));
    assert!(state.hero.hp < state.hero.max_hp);
    assert_eq!(report.kills, 1, "barrel blast credited to the player kills the rat");
    assert!(
        report
            .feedback
            .iter()
            .any(|e| matches!(e, FeedbackEvent::PlayerDamaged { .. }))
    );
}

proptest! {
    #[test]
    fn knockback_decays_and_never_enters_walls(
        vx in -3.0f32..3.0,
        vy in -3.0f32..3.0,
        wall_x in 5i32..9,
    ) {
        let mut golem = EnemyKind::Golem.spawn(1, Position::new(4.0, 4.0), 1);
        golem.stats.speed = 0.0;
        let mut builder = TestWorldBuilder::new(14, 9).with_entity(golem);
        for y in 1..8 {
            builder = builder.with_wall(wall_x + 2, y);
        }
        let mut state = builder.build();
        let velocity = Velocity::new(vx, vy);
        prop_assume!(!velocity.is_zero());
        if let Some(e) = state.entity_mut(1) {
            e.knockback = velocity;
        }

        let ticks = state.config.combat.knockback_ticks(velocity.length());
        let mut rng = rng(1);
        for _ in 0..=ticks {
            status::run(&mut state, 16.0, 1.0, &mut rng);
            let e = state.entity(1).expect("present");
            let (x, y) = e.position.tile();
            prop_assert!(state.grid.kind_at(x, y) == TileKind::Floor, "slid into wall at {:?}", (x, y));
            prop_assert!(x < wall_x + 2, "crossed the wall column to {:?}", (x, y));
        }
        prop_assert!(state.entity(1).expect("present").knockback.is_zero());
    }
}
