//! Player-initiated actions: attacks, spells, movement and interaction.
//!
//! Attacks and spells never apply damage directly. They queue events or
//! spawn projectiles that the next [`advance_tick`](crate::game_loop::advance_tick)
//! resolves.
use rand::Rng;
use tracing::debug;

use combat::{
    Combat, Combatant, DamageEvent, DamageSource, EntityId, EntityKind, FeedbackEvent, LogLevel,
    PLAYER_ID, ParticleKind, Projectile, ShopItem, TextStyle, Velocity,
};
use dungeon::first_wall_along;
use error::GameError;
use hero::SpellEffect;
use items::{FirePattern, Weapon};

use crate::systems::slide_target;
use crate::world::WorldState;

/// `cos` of the half-angle of the melee swing arc.
const MELEE_ARC_COS: f32 = 0.3;
/// How far spells fly when nothing stops them.
const SPELL_RANGE: f32 = 12.0;
/// Reach for chests and shrines.
pub const INTERACT_RANGE: f32 = 1.5;
/// Speed lost by each later shot of a burst.
const BURST_SPEED_STEP: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpellOutcome {
    Projectile { id: u32 },
    Healed { amount: i32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub gold: u32,
    pub healed: i32,
    pub reached_exit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    Nothing,
    OpenedChest { gold: u32 },
    UsedShrine { healed: i32, mana: u32 },
}

/// Swing or fire `weapon` along the hero's facing.
///
/// Melee weapons hit every target in reach inside the swing arc and return the
/// queued events. Ranged weapons spawn projectiles and return nothing. Both
/// do nothing while the weapon is cooling down.
pub fn resolve_melee_attack(
    state: &mut WorldState,
    weapon: &Weapon,
    rng: &mut impl Rng,
) -> Vec<DamageEvent> {
    if !state.hero.can_attack() {
        return Vec::new();
    }
    state.hero.start_attack_cooldown(weapon.cooldown_ms);
    let attack = state.hero.base_attack + weapon.damage_bonus;
    let crit_chance = state.hero.crit_chance + weapon.crit_chance;
    state.feedback.push(FeedbackEvent::AttackAnimation {
        entity: PLAYER_ID,
        direction: state.hero.facing,
    });

    if weapon.is_ranged() {
        fire_volley(state, weapon, attack, crit_chance);
        return Vec::new();
    }

    let origin = state.hero.position;
    let facing = state.hero.facing;
    let knockback = state.config.combat.projectile_knockback;
    let mut events = Vec::new();
    for target in state.entities.iter_mut().filter(|e| e.is_targetable()) {
        let offset = target.position - origin;
        let distance = offset.length();
        if distance > weapon.reach {
            continue;
        }
        if distance > f32::EPSILON && facing.dot(&offset.normalized()) < MELEE_ARC_COS {
            continue;
        }
        let base = Combat::mitigate(attack, target.defense());
        let (amount, crit) = Combat::roll(rng, base, crit_chance);
        events.push(DamageEvent::new(target.id, amount, DamageSource::Player).critical(crit));
        if !target.is_barrel() {
            let away = if offset.is_zero() { facing } else { offset.normalized() };
            target.push(away * knockback);
        }
        let style = if crit { TextStyle::Critical } else { TextStyle::Damage };
        state.feedback.text(target.position, amount.to_string(), style);
    }
    debug!(hits = events.len(), weapon = %weapon.kind, "melee swing");
    state.damage_queue.extend(events.iter().copied());
    events
}

fn fire_volley(state: &mut WorldState, weapon: &Weapon, attack: i32, crit_chance: f32) {
    let Some(profile) = weapon.ranged else {
        return;
    };
    let origin = state.hero.position;
    let facing = state.hero.facing;
    let knockback = state.config.combat.projectile_knockback;

    let shots: Vec<(Velocity, f32)> = match profile.pattern {
        FirePattern::Single => vec![(facing, profile.projectile_speed)],
        FirePattern::Fan { count, spread_deg } => {
            let count = count.max(1);
            let spread = spread_deg.to_radians();
            (0..count)
                .map(|i| {
                    let angle = if count == 1 {
                        0.0
                    } else {
                        -spread / 2.0 + spread * i as f32 / (count - 1) as f32
                    };
                    (facing.rotated(angle), profile.projectile_speed)
                })
                .collect()
        }
        FirePattern::Burst { count } => (0..count.max(1))
            .map(|i| {
                let slow = (1.0 - BURST_SPEED_STEP * i as f32).max(0.1);
                (facing, profile.projectile_speed * slow)
            })
            .collect(),
    };

    for (direction, speed) in shots {
        let target = first_wall_along(&state.grid, origin, direction, profile.max_distance);
        let shot = Projectile::new(0, origin, target, speed, attack)
            .owned_by(PLAYER_ID)
            .with_piercing(profile.piercing)
            .with_crit_chance(crit_chance)
            .with_knockback(knockback);
        state.spawn_projectile(shot);
    }
}

/// Cast the spell in slot `spell_index`.
///
/// Slot, mana and cooldown are all checked before anything happens; on
/// failure the hero is left untouched.
pub fn resolve_spell_cast(
    state: &mut WorldState,
    spell_index: usize,
) -> Result<SpellOutcome, GameError> {
    let effect = state.hero.begin_cast(spell_index)?;
    let origin = state.hero.position;
    let facing = state.hero.facing;
    let crit_chance = state.hero.crit_chance;
    let target = first_wall_along(&state.grid, origin, facing, SPELL_RANGE);

    let outcome = match effect {
        SpellEffect::DamageProjectile {
            damage,
            speed,
            explosion_radius,
            explosion_damage,
            homing,
        } => {
            let bolt = Projectile::new(0, origin, target, speed, damage)
                .owned_by(PLAYER_ID)
                .exploding(explosion_radius, explosion_damage)
                .burning()
                .with_homing(homing)
                .with_crit_chance(crit_chance);
            state.feedback.particles(origin, ParticleKind::Fire, 6);
            SpellOutcome::Projectile {
                id: state.spawn_projectile(bolt),
            }
        }
        SpellEffect::PierceFreeze {
            damage,
            speed,
            piercing,
        } => {
            let lance = Projectile::new(0, origin, target, speed, damage)
                .owned_by(PLAYER_ID)
                .with_piercing(piercing)
                .freezing()
                .with_crit_chance(crit_chance);
            state.feedback.particles(origin, ParticleKind::Frost, 6);
            SpellOutcome::Projectile {
                id: state.spawn_projectile(lance),
            }
        }
        SpellEffect::Heal { amount } => {
            let healed = state.hero.heal(amount);
            state.feedback.particles(origin, ParticleKind::Heal, 12);
            state
                .feedback
                .text(origin, format!("+{healed}"), TextStyle::Heal);
            SpellOutcome::Healed { amount: healed }
        }
    };
    debug!(slot = spell_index, ?outcome, "spell cast");
    Ok(outcome)
}

/// Move the hero by `(dx, dy)` tiles, sliding along walls.
///
/// Gold and potions on the destination tile are collected and the view is
/// recomputed.
pub fn move_player(state: &mut WorldState, dx: f32, dy: f32) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    if !state.hero.alive {
        return outcome;
    }
    let direction = Velocity::new(dx, dy);
    state.hero.face(direction);
    let Some(to) = slide_target(
        state,
        PLAYER_ID,
        state.hero.position,
        direction,
        direction.length(),
    ) else {
        return outcome;
    };
    state.hero.position = to;
    outcome.moved = true;

    let tile = to.tile();
    let mut picked = Vec::new();
    for entity in state.entities.iter().filter(|e| e.position.tile() == tile && !e.is_dead) {
        match entity.kind {
            EntityKind::Gold { amount } => picked.push((entity.id, amount, 0)),
            EntityKind::Potion { heal } => picked.push((entity.id, 0, heal)),
            _ => {}
        }
    }
    for &(_, gold, heal) in &picked {
        if gold > 0 {
            state.hero.gold += gold;
            outcome.gold += gold;
            state.feedback.particles(to, ParticleKind::Gold, 8);
            state.feedback.text(to, format!("+{gold}g"), TextStyle::Gold);
        }
        if heal > 0 {
            let healed = state.hero.heal(heal);
            outcome.healed += healed;
            state.feedback.particles(to, ParticleKind::Heal, 8);
            state.feedback.log(format!("You drink a potion (+{healed} hp)."), LogLevel::Loot);
        }
    }
    let taken: Vec<EntityId> = picked.iter().map(|&(id, _, _)| id).collect();
    state.entities.retain(|e| !taken.contains(&e.id));

    state.refresh_fov();
    outcome.reached_exit = state.on_exit();
    outcome
}

/// Use the nearest unopened chest or unused shrine within reach.
pub fn interact(state: &mut WorldState) -> InteractOutcome {
    let here = state.hero.position;
    let nearest = state
        .entities
        .iter_mut()
        .filter(|e| {
            matches!(
                e.kind,
                EntityKind::Chest { opened: false, .. } | EntityKind::Shrine { used: false }
            ) && e.position.distance_to(&here) <= INTERACT_RANGE
        })
        .min_by(|a, b| {
            a.position
                .distance_to(&here)
                .total_cmp(&b.position.distance_to(&here))
        });
    let Some(entity) = nearest else {
        return InteractOutcome::Nothing;
    };

    let at = entity.position;
    match &mut entity.kind {
        EntityKind::Chest { gold, opened } => {
            *opened = true;
            let gold = *gold;
            state.hero.gold += gold;
            state.feedback.particles(at, ParticleKind::Gold, 15);
            state.feedback.log(format!("The chest holds {gold} gold."), LogLevel::Loot);
            InteractOutcome::OpenedChest { gold }
        }
        EntityKind::Shrine { used } => {
            *used = true;
            let healed = state.hero.heal(state.hero.max_hp);
            let mana = state.hero.restore_mana(state.hero.max_mana);
            state.feedback.particles(at, ParticleKind::Magic, 20);
            state
                .feedback
                .log("The shrine restores your strength.", LogLevel::Info);
            InteractOutcome::UsedShrine { healed, mana }
        }
        _ => InteractOutcome::Nothing,
    }
}

/// Buy offer `offer_index` from merchant `merchant_id`.
pub fn purchase(
    state: &mut WorldState,
    merchant_id: EntityId,
    offer_index: usize,
) -> Result<ShopItem, GameError> {
    let merchant = state
        .entity(merchant_id)
        .filter(|e| !e.is_dead)
        .ok_or(GameError::UnknownEntity(merchant_id))?;
    let EntityKind::Merchant { stock } = &merchant.kind else {
        return Err(GameError::UnknownEntity(merchant_id));
    };
    let offer = stock
        .get(offer_index)
        .filter(|o| o.stock > 0)
        .ok_or(GameError::OutOfStock(offer_index))?;
    let (item, price) = (offer.item.clone(), offer.price);

    state.hero.spend_gold(price)?;
    if let Some(EntityKind::Merchant { stock }) = state.entity_mut(merchant_id).map(|e| &mut e.kind) {
        if let Some(offer) = stock.get_mut(offer_index) {
            offer.stock -= 1;
        }
    }

    match &item {
        ShopItem::HealingDraught { heal } => {
            state.hero.heal(*heal);
        }
        ShopItem::ManaTonic { mana } => {
            state.hero.restore_mana(*mana);
        }
        ShopItem::Whetstone { attack } => state.hero.base_attack += attack,
    }
    state
        .feedback
        .log(format!("Bought {item:?} for {price} gold."), LogLevel::Loot);
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_arena as arena;
    use combat::enemy::EnemyKind;
    use combat::{Entity, Position, ShopOffer, Stats};
    use items::WeaponKind;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_melee_hits_in_arc_only() {
        let front = EnemyKind::Rat.spawn(1, Position::new(2.0, 1.0), 1);
        let behind = EnemyKind::Rat.spawn(2, Position::new(1.0, 2.0), 1);
        let mut state = arena(vec![front, behind]);
        state.hero.position = Position::new(1.0, 1.0);
        state.hero.facing = Velocity::new(1.0, 0.0);
        state.hero.crit_chance = 0.0;
        let mut weapon = WeaponKind::Sword.weapon();
        weapon.crit_chance = 0.0;
        let mut rng = Pcg32::seed_from_u64(5);

        let events = resolve_melee_attack(&mut state, &weapon, &mut rng);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target_id, 1);
        assert_eq!(state.damage_queue.len(), 1);

        // cooling down
        assert!(resolve_melee_attack(&mut state, &weapon, &mut rng).is_empty());
    }

    #[test]
    fn test_fan_spawns_projectiles() {
        let mut state = arena(Vec::new());
        let weapon = WeaponKind::Blunderbuss.weapon();
        let mut rng = Pcg32::seed_from_u64(5);
        let events = resolve_melee_attack(&mut state, &weapon, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.projectiles.len(), 5);
        assert!(state.projectiles.iter().all(|p| !p.is_enemy_owned));
    }

    #[test]
    fn test_spell_errors_leave_hero_untouched() {
        let mut state = arena(Vec::new());
        state.hero.mana = 0;
        let before = state.hero.clone();
        assert!(matches!(
            resolve_spell_cast(&mut state, 0),
            Err(GameError::InsufficientMana { .. })
        ));
        assert!(matches!(
            resolve_spell_cast(&mut state, 9),
            Err(GameError::UnknownSpell(9))
        ));
        assert_eq!(state.hero, before);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_dead_hero_cannot_cast() {
        let mut state = arena(Vec::new());
        state.hero.take_damage(state.hero.max_hp);
        let before = state.hero.clone();
        assert!(matches!(
            resolve_spell_cast(&mut state, 0),
            Err(GameError::HeroDead)
        ));
        assert_eq!(state.hero, before);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_swing_starts_the_weapon_cooldown() {
        let mut state = arena(Vec::new());
        let weapon = WeaponKind::Axe.weapon();
        let mut rng = Pcg32::seed_from_u64(3);
        resolve_melee_attack(&mut state, &weapon, &mut rng);
        assert_eq!(state.hero.attack_cooldown_ms, weapon.cooldown_ms);
        assert!(!state.hero.can_attack());
    }

    #[test]
    fn test_move_collects_gold() {
        let gold = Entity::new(
            1,
            EntityKind::Gold { amount: 7 },
            Position::new(2.0, 1.0),
            Stats::inert(1),
        );
        let mut state = arena(vec![gold]);
        let outcome = move_player(&mut state, 1.0, 0.0);
        assert!(outcome.moved);
        assert_eq!(outcome.gold, 7);
        assert_eq!(state.hero.gold, 7);
        assert!(state.entities.is_empty());
    }

    #[test]
    fn test_move_into_wall_is_refused() {
        let mut state = arena(Vec::new());
        let outcome = move_player(&mut state, -1.0, -1.0);
        assert!(!outcome.moved);
        assert_eq!(state.hero.position, Position::new(1.0, 1.0));
    }

    #[test]
    fn test_shrine_is_single_use() {
        let shrine = Entity::new(
            1,
            EntityKind::Shrine { used: false },
            Position::new(2.0, 1.0),
            Stats::inert(1),
        );
        let mut state = arena(vec![shrine]);
        state.hero.hp = 1;
        assert!(matches!(interact(&mut state), InteractOutcome::UsedShrine { .. }));
        assert_eq!(state.hero.hp, state.hero.max_hp);
        assert_eq!(interact(&mut state), InteractOutcome::Nothing);
    }

    #[test]
    fn test_purchase_checks_gold_and_stock() {
        let merchant = Entity::new(
            1,
            EntityKind::Merchant {
                stock: vec![ShopOffer {
                    item: ShopItem::Whetstone { attack: 1 },
                    price: 10,
                    stock: 1,
                }],
            },
            Position::new(3.0, 1.0),
            Stats::inert(1),
        );
        let mut state = arena(vec![merchant]);
        assert!(matches!(
            purchase(&mut state, 1, 0),
            Err(GameError::NotEnoughGold { .. })
        ));
        state.hero.gold = 25;
        let attack = state.hero.base_attack;
        assert_eq!(purchase(&mut state, 1, 0).unwrap(), ShopItem::Whetstone { attack: 1 });
        assert_eq!(state.hero.base_attack, attack + 1);
        assert_eq!(state.hero.gold, 15);
        assert!(matches!(purchase(&mut state, 1, 0), Err(GameError::OutOfStock(0))));
        assert!(matches!(purchase(&mut state, 42, 0), Err(GameError::UnknownEntity(42))));
    }
}
