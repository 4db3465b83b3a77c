//! Items: potions the player carries, treasure the player cashes in.
//! The category is data on the item, not a type hierarchy.

use super::entity::{EntityId, Placeable};
use super::position::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PotionKind {
    Healing,
    Power,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Potion(PotionKind),
    Treasure { value: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameItem {
    pub id: EntityId,
    pub kind: ItemKind,
    pub position: Position,
    pub visible: bool,
}

impl GameItem {
    pub fn new(id: EntityId, kind: ItemKind, position: Position) -> Self {
        GameItem { id, kind, position, visible: false }
    }

    pub fn healing_potion(id: EntityId, position: Position) -> Self {
        GameItem::new(id, ItemKind::Potion(PotionKind::Healing), position)
    }

    pub fn power_potion(id: EntityId, position: Position) -> Self {
        GameItem::new(id, ItemKind::Potion(PotionKind::Power), position)
    }

    pub fn treasure(id: EntityId, value: u32, position: Position) -> Self {
        GameItem::new(id, ItemKind::Treasure { value }, position)
    }

    /// Builder-style visibility toggle, used for loot.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn is_potion(&self) -> bool {
        matches!(self.kind, ItemKind::Potion(_))
    }

    pub fn is_healing_potion(&self) -> bool {
        matches!(self.kind, ItemKind::Potion(PotionKind::Healing))
    }

    pub fn is_power_potion(&self) -> bool {
        matches!(self.kind, ItemKind::Potion(PotionKind::Power))
    }

    pub fn treasure_value(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Treasure { value } => Some(value),
            ItemKind::Potion(_) => None,
        }
    }

    /// Single character used on the map and in diagnostics.
    pub fn display_symbol(&self) -> char {
        match self.kind {
            ItemKind::Potion(PotionKind::Healing) => '!',
            ItemKind::Potion(PotionKind::Power)   => '+',
            ItemKind::Treasure { .. }             => '$',
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            ItemKind::Potion(PotionKind::Healing) => "healing potion",
            ItemKind::Potion(PotionKind::Power)   => "power potion",
            ItemKind::Treasure { .. }             => "treasure",
        }
    }
}

impl Placeable for GameItem {
    fn id(&self) -> EntityId { self.id }
    fn position(&self) -> Position { self.position }
    fn set_position(&mut self, position: Position) { self.position = position; }
    fn glyph(&self) -> char { self.display_symbol() }
    fn blocks_movement(&self) -> bool { false }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_exclusive() {
        let heal = GameItem::healing_potion(EntityId(1), Position::new(0, 0));
        let power = GameItem::power_potion(EntityId(2), Position::new(0, 0));
        let gold = GameItem::treasure(EntityId(3), 40, Position::new(0, 0));

        assert!(heal.is_potion() && heal.is_healing_potion() && !heal.is_power_potion());
        assert!(power.is_potion() && power.is_power_potion() && !power.is_healing_potion());
        assert!(!gold.is_potion());
        assert_eq!(gold.treasure_value(), Some(40));
        assert_eq!(heal.treasure_value(), None);
    }

    #[test]
    fn items_never_block() {
        let gold = GameItem::treasure(EntityId(3), 5, Position::new(2, 2)).with_visible(true);
        assert!(!gold.blocks_movement());
        assert!(gold.visible);
        assert_eq!(gold.glyph(), '$');
    }
}
