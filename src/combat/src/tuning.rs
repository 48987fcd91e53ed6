//! Combat tuning knobs. Values are illustrative, not balance contracts.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Reference frame length that per-frame speeds are expressed in.
    pub frame_ms: f32,
    /// Upper bound on a single tick's `dt`.
    pub max_dt_ms: f32,

    pub melee_range: f32,
    pub aggro_radius: f32,
    pub ranged_aggro_radius: f32,
    pub kite_distance: f32,
    pub fire_range: f32,
    pub sniper_range: f32,

    pub melee_cooldown_ms: f32,
    pub tank_cooldown_ms: f32,
    pub archer_cooldown_ms: f32,
    pub caster_cooldown_ms: f32,
    pub sniper_cooldown_ms: f32,

    pub enemy_projectile_speed: f32,
    pub sniper_projectile_speed: f32,
    pub caster_homing: f32,
    /// Distance along the aim at which enemy shots spawn.
    pub muzzle_offset: f32,

    pub player_hitbox: f32,
    pub target_radius: f32,
    pub projectile_knockback: f32,

    pub knockback_drag: f32,
    pub knockback_snap: f32,

    pub explosion_knockback: f32,
    pub explosion_player_factor: f32,

    pub burn_tick_chance: f32,
    pub burn_damage_min: i32,
    pub burn_damage_max: i32,
    pub freeze_ms: f32,
    pub stun_ms: f32,
    pub burn_ms: f32,

    /// Barrel chain reactions resolved within one tick before carrying over.
    pub max_chain_passes: usize,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            frame_ms: 16.0,
            max_dt_ms: 100.0,
            melee_range: 1.2,
            aggro_radius: 8.0,
            ranged_aggro_radius: 10.0,
            kite_distance: 3.0,
            fire_range: 7.0,
            sniper_range: 11.0,
            melee_cooldown_ms: 900.0,
            tank_cooldown_ms: 1400.0,
            archer_cooldown_ms: 1800.0,
            caster_cooldown_ms: 2200.0,
            sniper_cooldown_ms: 3000.0,
            enemy_projectile_speed: 0.25,
            sniper_projectile_speed: 0.45,
            caster_homing: 0.08,
            muzzle_offset: 0.6,
            player_hitbox: 0.45,
            target_radius: 0.8,
            projectile_knockback: 0.3,
            knockback_drag: 0.8,
            knockback_snap: 0.01,
            explosion_knockback: 0.6,
            explosion_player_factor: 0.5,
            burn_tick_chance: 0.08,
            burn_damage_min: 1,
            burn_damage_max: 3,
            freeze_ms: 2000.0,
            stun_ms: 800.0,
            burn_ms: 3000.0,
            max_chain_passes: 8,
        }
    }
}

impl CombatTuning {
    /// Scale applied to per-frame speeds for a tick of `dt_ms`.
    pub fn frame_factor(&self, dt_ms: f32) -> f32 {
        dt_ms / self.frame_ms
    }

    pub fn clamp_dt(&self, dt_ms: f32) -> f32 {
        dt_ms.clamp(0.0, self.max_dt_ms)
    }

    /// Number of ticks knockback needs to decay from `speed` below the snap threshold.
    pub fn knockback_ticks(&self, speed: f32) -> u32 {
        let mut v = speed.abs();
        if self.knockback_drag >= 1.0 && v >= self.knockback_snap {
            return u32::MAX;
        }
        let mut ticks = 0;
        while v >= self.knockback_snap {
            v *= self.knockback_drag;
            ticks += 1;
        }
        ticks
    }
}
