// src/dungeon/src/level.rs
//! Tile storage and the room rectangles used while laying out a floor.

pub mod grid;
pub mod rooms;
pub mod tiles;

pub use grid::Grid;
pub use rooms::Room;
pub use tiles::{Tile, TileKind, Visibility};
