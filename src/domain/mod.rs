//! Leaf data: coordinates, tiles, entities, items.

pub mod entity;
pub mod item;
pub mod position;
pub mod tile;
