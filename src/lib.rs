//! Delve: a small turn-based dungeon crawl built around one world coordinator.
//!
//! `sim::world::World` owns every entity and is the only place game actions
//! happen. The terminal binary in `main.rs` is one client of it.

pub mod config;
pub mod domain;
pub mod sim;
pub mod ui;
