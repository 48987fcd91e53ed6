// src/hero/src/lib.rs
//! The player character: stats, equipment, mana, spells and progression.

pub mod abilities;
pub mod class;
mod core;

pub use self::{
    abilities::{Spell, SpellEffect, SpellKind, SpellSlot, Spellbook},
    class::Class,
    core::Hero,
};
