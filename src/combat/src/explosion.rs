//! Area blasts from barrels and exploding projectiles.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::damage::{DamageEvent, DamageSource};
use crate::entity::{Entity, EntityId, PLAYER_ID};
use crate::feedback::{FeedbackEvent, ParticleKind};
use crate::position::{Position, Velocity};
use crate::tuning::CombatTuning;

/// Blast radius and damage used when a barrel goes up.
pub const BARREL_BLAST_RADIUS: f32 = 2.5;
pub const BARREL_BLAST_DAMAGE: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Explosion {
    pub center: Position,
    pub radius: f32,
    pub damage: i32,
    pub by_player: bool,
}

impl Explosion {
    pub fn barrel(center: Position, by_player: bool) -> Self {
        Self {
            center,
            radius: BARREL_BLAST_RADIUS,
            damage: BARREL_BLAST_DAMAGE,
            by_player,
        }
    }

    /// 1 at the centre, 0 at the rim, `None` outside.
    fn falloff(&self, at: &Position) -> Option<f32> {
        if self.radius <= 0.0 {
            return None;
        }
        let d = self.center.distance_to(at);
        (d <= self.radius).then(|| 1.0 - d / self.radius)
    }
}

/// Everything a blast does, for the caller to apply.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExplosionOutcome {
    pub damage: Vec<DamageEvent>,
    pub knockback: Vec<(EntityId, Velocity)>,
    pub stunned: Vec<EntityId>,
    pub feedback: Vec<FeedbackEvent>,
}

/// Falloff damage to hostiles and barrels, reduced damage to the player,
/// knockback away from the centre and a stun on every enemy caught.
pub fn resolve_explosion(
    explosion: &Explosion,
    entities: &[Entity],
    player_pos: Position,
    tuning: &CombatTuning,
) -> ExplosionOutcome {
    let mut outcome = ExplosionOutcome::default();
    let source = DamageSource::Explosion {
        by_player: explosion.by_player,
    };

    for entity in entities.iter().filter(|e| e.is_targetable()) {
        let Some(falloff) = explosion.falloff(&entity.position) else {
            continue;
        };
        let amount = ((explosion.damage as f32 * falloff).round() as i32).max(1);
        outcome
            .damage
            .push(DamageEvent::new(entity.id, amount, source));

        if entity.is_barrel() {
            continue;
        }
        let mut away = (entity.position - explosion.center).normalized();
        if away.is_zero() {
            away = Velocity::new(1.0, 0.0);
        }
        outcome
            .knockback
            .push((entity.id, away * (tuning.explosion_knockback * falloff)));
        outcome.stunned.push(entity.id);
    }

    if let Some(falloff) = explosion.falloff(&player_pos) {
        let amount = ((explosion.damage as f32 * falloff * tuning.explosion_player_factor).round()
            as i32)
            .max(1);
        outcome
            .damage
            .push(DamageEvent::new(PLAYER_ID, amount, source));
    }

    outcome.feedback.push(FeedbackEvent::SpawnParticles {
        at: explosion.center,
        kind: ParticleKind::Explosion,
        count: 30,
    });
    outcome.feedback.push(FeedbackEvent::Flash {
        at: explosion.center,
        radius: explosion.radius,
    });
    outcome.feedback.push(FeedbackEvent::ScreenShake {
        intensity: 12.0,
        duration_ms: 350.0,
    });
    outcome
}
