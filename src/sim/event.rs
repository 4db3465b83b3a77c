//! Action tags and outcomes reported by the world.
//! Controllers and observers read these to narrate what just happened.

use crate::domain::entity::EntityId;

/// Classification of the most recent successful mutation.
/// Item use shares `Pickup` with picking items up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Combat,
    Pickup,
    Move,
}

/// What an `attack` call ended in. Exactly one per call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttackOutcome {
    /// Both sides still standing.
    Exchanged,
    /// Enemy died; `loot` is the treasure left in its place.
    EnemyDefeated { loot: EntityId },
    /// Player died. Enemy death handling was skipped even if it also died.
    PlayerDefeated,
}
