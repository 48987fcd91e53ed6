//! Deferred feedback produced by the simulation phases.
//!
//! Phases never call into rendering, audio or the message log directly. They
//! push [`FeedbackEvent`]s into a [`FeedbackQueue`] that the caller drains once
//! the tick has finished, so no collection is mutated while it is iterated.
use strum::Display;

use crate::entity::EntityId;
use crate::position::{Position, Velocity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParticleKind {
    Blood,
    Sparks,
    Fire,
    Frost,
    Smoke,
    Explosion,
    Gold,
    Heal,
    Magic,
    Confetti,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TextStyle {
    Damage,
    Critical,
    Heal,
    Gold,
    Xp,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LogLevel {
    Info,
    Combat,
    Loot,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    SpawnParticles {
        at: Position,
        kind: ParticleKind,
        count: u32,
    },
    FloatingText {
        at: Position,
        text: String,
        style: TextStyle,
    },
    ScreenShake {
        intensity: f32,
        duration_ms: f32,
    },
    Flash {
        at: Position,
        radius: f32,
    },
    LogLine {
        message: String,
        level: LogLevel,
    },
    AttackAnimation {
        entity: EntityId,
        direction: Velocity,
    },
    PlayerDamaged {
        amount: i32,
        remaining_hp: i32,
    },
    PlayerDied,
    SpeechBubble {
        entity: EntityId,
        text: String,
    },
    StairsRevealed {
        at: Position,
    },
    LevelUp {
        level: u32,
    },
}

/// Side-effect accumulator handed to every phase.
#[derive(Debug, Clone, Default)]
pub struct FeedbackQueue {
    events: Vec<FeedbackEvent>,
}

impl FeedbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = FeedbackEvent>) {
        self.events.extend(events);
    }

    pub fn particles(&mut self, at: Position, kind: ParticleKind, count: u32) {
        self.push(FeedbackEvent::SpawnParticles { at, kind, count });
    }

    pub fn text(&mut self, at: Position, text: impl Into<String>, style: TextStyle) {
        self.push(FeedbackEvent::FloatingText {
            at,
            text: text.into(),
            style,
        });
    }

    pub fn shake(&mut self, intensity: f32, duration_ms: f32) {
        self.push(FeedbackEvent::ScreenShake {
            intensity,
            duration_ms,
        });
    }

    pub fn log(&mut self, message: impl Into<String>, level: LogLevel) {
        self.push(FeedbackEvent::LogLine {
            message: message.into(),
            level,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedbackEvent> {
        self.events.iter()
    }

    /// Hand every accumulated event to the caller, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }
}
