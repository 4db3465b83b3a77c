//! Terminal front end: keys in, frames and sound out.

pub mod input;
pub mod renderer;
pub mod sound;
