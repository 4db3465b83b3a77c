//! Errors surfaced by the world coordinator.
//! Rejected actions are not errors; they come back as `false`.

use thiserror::Error;

use crate::domain::entity::EntityId;
use super::map::MapError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("world not initialized; bind it with players, enemies, items and a map first")]
    Uninitialized,

    #[error("a world needs at least one player")]
    NoPlayers,

    #[error("enemy {0} is not in the world")]
    UnknownEnemy(EntityId),

    #[error("no entity ids left for new loot")]
    IdsExhausted,

    #[error("map rejected the change: {0}")]
    Map(#[from] MapError),
}
