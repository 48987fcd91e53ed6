//! Timed status effects (freeze, stun, burn) carried by entities.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Status effect kinds an entity can be under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize, Encode, Decode,
)]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// Blocks all voluntary movement and attacks.
    Freeze,
    /// Short incapacitation, applied by explosions.
    Stun,
    /// Stochastic damage over time.
    Burn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining_ms: f32,
}

/// Manages active status effects for an entity.
///
/// Effects do not stack: re-applying a kind keeps the longer remaining duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, replacing a shorter one of the same kind
    pub fn apply(&mut self, kind: StatusKind, duration_ms: f32) {
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => existing.remaining_ms = existing.remaining_ms.max(duration_ms),
            None => self.effects.push(StatusEffect {
                kind,
                remaining_ms: duration_ms,
            }),
        }
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Frozen or stunned entities take no voluntary action.
    pub fn is_incapacitated(&self) -> bool {
        self.has(StatusKind::Freeze) || self.has(StatusKind::Stun)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Count down every effect by `dt_ms`, returning the kinds that expired.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.remaining_ms -= dt_ms;
            if effect.remaining_ms <= 0.0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_effects() {
        let mut effects = StatusEffects::new();
        effects.apply(StatusKind::Burn, 3000.0);
        assert!(effects.has(StatusKind::Burn));
        assert!(!effects.is_incapacitated());

        effects.remove(StatusKind::Burn);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_reapply_keeps_longer_duration() {
        let mut effects = StatusEffects::new();
        effects.apply(StatusKind::Freeze, 2000.0);
        effects.apply(StatusKind::Freeze, 500.0);
        assert_eq!(effects.iter().count(), 1);
        assert_eq!(effects.iter().next().map(|e| e.remaining_ms), Some(2000.0));
    }

    #[test]
    fn test_tick_expires_effects() {
        let mut effects = StatusEffects::new();
        effects.apply(StatusKind::Stun, 100.0);
        effects.apply(StatusKind::Burn, 1000.0);
        assert!(effects.is_incapacitated());

        let expired = effects.tick(150.0);
        assert_eq!(expired, vec![StatusKind::Stun]);
        assert!(!effects.is_incapacitated());
        assert!(effects.has(StatusKind::Burn));
    }
}
