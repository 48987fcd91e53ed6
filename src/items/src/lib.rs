//src/items/src/lib.rs
//! Equipment the hero can wield.

pub mod weapon;

pub use crate::weapon::{FirePattern, RangedProfile, Weapon, WeaponKind};
