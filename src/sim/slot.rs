//! One world per running game, bound on first use.
//!
//! The application owns a `WorldSlot` and passes it (or the world borrowed
//! from it) to whoever needs it. The first `bind` builds the world; every
//! later `bind` returns that same world and never runs its initializer.
//! Reading an unbound slot is `WorldError::Uninitialized`.

use super::error::WorldError;
use super::map::{GridMap, WorldMap};
use super::world::World;

pub struct WorldSlot<M: WorldMap = GridMap> {
    world: Option<World<M>>,
}

impl<M: WorldMap> Default for WorldSlot<M> {
    fn default() -> Self {
        WorldSlot { world: None }
    }
}

impl<M: WorldMap> WorldSlot<M> {
    pub fn new() -> Self {
        WorldSlot::default()
    }

    /// Build the world with `init` if the slot is empty, then return it.
    pub fn bind<F>(&mut self, init: F) -> Result<&mut World<M>, WorldError>
    where
        F: FnOnce() -> Result<World<M>, WorldError>,
    {
        let world = match self.world.take() {
            Some(existing) => existing,
            None => {
                tracing::debug!("binding world");
                init()?
            }
        };
        Ok(self.world.insert(world))
    }

    pub fn get(&self) -> Result<&World<M>, WorldError> {
        self.world.as_ref().ok_or(WorldError::Uninitialized)
    }

    pub fn get_mut(&mut self) -> Result<&mut World<M>, WorldError> {
        self.world.as_mut().ok_or(WorldError::Uninitialized)
    }

    pub fn is_bound(&self) -> bool {
        self.world.is_some()
    }

    /// Tear down: hand the world back and leave the slot unbound.
    pub fn take(&mut self) -> Option<World<M>> {
        self.world.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{EntityId, Player, PlayerClass};
    use crate::domain::position::Position;

    fn make(name: &str) -> Result<World, WorldError> {
        let p = Player::new(EntityId(0), name, PlayerClass::Mage, Position::new(0, 0));
        World::new(vec![p], vec![], vec![], GridMap::open(3, 3))
    }

    #[test]
    fn get_before_bind_fails() {
        let mut slot: WorldSlot = WorldSlot::new();
        assert_eq!(slot.get().err(), Some(WorldError::Uninitialized));
        assert_eq!(slot.get_mut().err(), Some(WorldError::Uninitialized));
        assert!(!slot.is_bound());
    }

    #[test]
    fn second_bind_ignores_new_arguments() {
        let mut slot = WorldSlot::new();
        slot.bind(|| make("first")).unwrap();
        let mut ran = false;
        let world = slot
            .bind(|| {
                ran = true;
                make("second")
            })
            .unwrap();
        assert_eq!(world.active_player().name, "first");
        assert!(!ran);
        assert_eq!(slot.get().unwrap().active_player().name, "first");
    }

    #[test]
    fn failed_bind_leaves_slot_empty() {
        let mut slot: WorldSlot = WorldSlot::new();
        let err = slot
            .bind(|| World::new(vec![], vec![], vec![], GridMap::open(1, 1)))
            .err();
        assert_eq!(err, Some(WorldError::NoPlayers));
        assert!(!slot.is_bound());
    }

    #[test]
    fn take_unbinds() {
        let mut slot = WorldSlot::new();
        slot.bind(|| make("solo")).unwrap();
        assert!(slot.take().is_some());
        assert_eq!(slot.get().err(), Some(WorldError::Uninitialized));
    }
}
