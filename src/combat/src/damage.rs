//! Deferred damage: every source enqueues, one pass per tick resolves.
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Who dealt the damage; decides XP credit on a kill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum DamageSource {
    Player,
    Enemy(EntityId),
    Explosion { by_player: bool },
    Burn,
}

impl DamageSource {
    pub fn credits_player(self) -> bool {
        match self {
            DamageSource::Player | DamageSource::Burn => true,
            DamageSource::Explosion { by_player } => by_player,
            DamageSource::Enemy(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DamageEvent {
    pub target_id: EntityId,
    pub amount: i32,
    pub is_crit: bool,
    pub source: DamageSource,
}

impl DamageEvent {
    pub fn new(target_id: EntityId, amount: i32, source: DamageSource) -> Self {
        Self {
            target_id,
            amount,
            is_crit: false,
            source,
        }
    }

    pub fn critical(mut self, is_crit: bool) -> Self {
        self.is_crit = is_crit;
        self
    }
}

/// FIFO of pending damage; resolution order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct DamageQueue {
    events: Vec<DamageEvent>,
}

impl DamageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DamageEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = DamageEvent>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DamageEvent> {
        self.events.iter()
    }

    pub fn take(&mut self) -> Vec<DamageEvent> {
        std::mem::take(&mut self.events)
    }
}
