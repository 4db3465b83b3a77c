//! Simulation: the world coordinator and the collaborators it drives.

pub mod audio;
pub mod combat;
pub mod error;
pub mod event;
pub mod level;
pub mod map;
pub mod observer;
pub mod slot;
pub mod world;
