//! Entities: Player, Enemy, and the capability traits the map and combat use.
//! Stats are fixed per class / kind; the tables live here so the rest of the
//! crate only sees the capability methods.

use std::fmt;

use super::item::{GameItem, ItemKind, PotionKind};
use super::position::Position;

/// Identity of anything placed in the world.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh ids. The world keeps one so loot never collides with
/// entities created by the level loader. `next == None` means every `u32`
/// id has been handed out.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        IdAllocator::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next: Some(0) }
    }

    /// Start allocating after the highest id already in use.
    pub fn after<'a>(ids: impl IntoIterator<Item = &'a EntityId>) -> Self {
        let next = match ids.into_iter().map(|id| id.0).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(0),
        };
        IdAllocator { next }
    }

    /// `None` once the id space is used up.
    pub fn allocate(&mut self) -> Option<EntityId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(EntityId(id))
    }
}

// ── Capabilities ──

/// Anything that occupies a map cell.
pub trait Placeable {
    fn id(&self) -> EntityId;
    fn position(&self) -> Position;
    /// Only the map moves entities; everyone else reads.
    fn set_position(&mut self, position: Position);
    fn glyph(&self) -> char;
    /// Actors block the cell they stand on, items do not.
    fn blocks_movement(&self) -> bool;
}

/// Anything that takes part in combat.
pub trait Fightable {
    fn health(&self) -> u32;
    fn attack_power(&self) -> u32;
    fn defense(&self) -> u32;
    /// Apply damage, returning the amount actually removed.
    fn take_damage(&mut self, amount: u32) -> u32;
    fn label(&self) -> String;

    fn is_dead(&self) -> bool {
        self.health() == 0
    }
}

// ── Player ──

pub const HEALING_POTION_AMOUNT: u32 = 15;
/// Number of attacks a power potion doubles.
pub const POWER_BOOST_ATTACKS: u32 = 3;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PlayerClass {
    Warrior,
    Mage,
    Archer,
    /// Classes without a dedicated attack sound.
    Rogue,
}

impl PlayerClass {
    /// `(max_health, attack, defense)`
    fn base_stats(&self) -> (u32, u32, u32) {
        match self {
            PlayerClass::Warrior => (30, 6, 3),
            PlayerClass::Mage    => (20, 8, 1),
            PlayerClass::Archer  => (24, 7, 2),
            PlayerClass::Rogue   => (22, 6, 2),
        }
    }

    pub fn from_name(s: &str) -> Option<PlayerClass> {
        match s.to_lowercase().as_str() {
            "warrior" => Some(PlayerClass::Warrior),
            "mage"    => Some(PlayerClass::Mage),
            "archer"  => Some(PlayerClass::Archer),
            "rogue"   => Some(PlayerClass::Rogue),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub class: PlayerClass,
    pub position: Position,
    health: u32,
    max_health: u32,
    attack: u32,
    defense: u32,
    inventory: Vec<GameItem>,
    treasure_points: u32,
    power_boost: u32,
}

impl Player {
    pub fn new(id: EntityId, name: impl Into<String>, class: PlayerClass, position: Position) -> Self {
        let (max_health, attack, defense) = class.base_stats();
        Player {
            id,
            name: name.into(),
            class,
            position,
            health: max_health,
            max_health,
            attack,
            defense,
            inventory: Vec::new(),
            treasure_points: 0,
            power_boost: 0,
        }
    }

    pub fn max_health(&self) -> u32 { self.max_health }
    pub fn inventory(&self) -> &[GameItem] { &self.inventory }
    pub fn treasure_points(&self) -> u32 { self.treasure_points }
    pub fn power_boost_remaining(&self) -> u32 { self.power_boost }

    pub fn add_to_inventory(&mut self, item: GameItem) {
        self.inventory.push(item);
    }

    pub fn update_treasure_points(&mut self, value: u32) {
        self.treasure_points = self.treasure_points.saturating_add(value);
    }

    /// Count of carried potions of `kind`.
    pub fn potion_count(&self, kind: PotionKind) -> usize {
        self.inventory.iter().filter(|i| i.kind == ItemKind::Potion(kind)).count()
    }

    /// Drink a healing potion. Refused at full health or with none carried.
    pub fn use_potion(&mut self) -> bool {
        if self.health >= self.max_health {
            return false;
        }
        if !self.take_potion(PotionKind::Healing) {
            return false;
        }
        self.health = (self.health + HEALING_POTION_AMOUNT).min(self.max_health);
        true
    }

    /// Drink a power potion. Refused while a boost is already running.
    pub fn use_power_potion(&mut self) -> bool {
        if self.power_boost > 0 {
            return false;
        }
        if !self.take_potion(PotionKind::Power) {
            return false;
        }
        self.power_boost = POWER_BOOST_ATTACKS;
        true
    }

    /// Spend one boosted attack, if any.
    pub fn consume_boost(&mut self) {
        self.power_boost = self.power_boost.saturating_sub(1);
    }

    fn take_potion(&mut self, kind: PotionKind) -> bool {
        let wanted = ItemKind::Potion(kind);
        match self.inventory.iter().position(|i| i.kind == wanted) {
            Some(idx) => {
                self.inventory.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl Placeable for Player {
    fn id(&self) -> EntityId { self.id }
    fn position(&self) -> Position { self.position }
    fn set_position(&mut self, position: Position) { self.position = position; }
    fn glyph(&self) -> char { '@' }
    fn blocks_movement(&self) -> bool { true }
}

impl Fightable for Player {
    fn health(&self) -> u32 { self.health }
    fn attack_power(&self) -> u32 {
        if self.power_boost > 0 { self.attack * 2 } else { self.attack }
    }
    fn defense(&self) -> u32 { self.defense }
    fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }
    fn label(&self) -> String { self.name.clone() }
}

// ── Enemy ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
    /// No retaliation sound.
    Skeleton,
}

impl EnemyKind {
    /// `(max_health, attack, defense, bounty)`
    fn base_stats(self) -> (u32, u32, u32, u32) {
        match self {
            EnemyKind::Goblin   => (10, 3, 1, 10),
            EnemyKind::Orc      => (18, 5, 2, 25),
            EnemyKind::Dragon   => (40, 9, 4, 100),
            EnemyKind::Skeleton => (12, 4, 1, 15),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Goblin   => "Goblin",
            EnemyKind::Orc      => "Orc",
            EnemyKind::Dragon   => "Dragon",
            EnemyKind::Skeleton => "Skeleton",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            EnemyKind::Goblin   => 'g',
            EnemyKind::Orc      => 'o',
            EnemyKind::Dragon   => 'D',
            EnemyKind::Skeleton => 's',
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub position: Position,
    health: u32,
    max_health: u32,
    attack: u32,
    defense: u32,
    bounty: u32,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, position: Position) -> Self {
        let (max_health, attack, defense, bounty) = kind.base_stats();
        Enemy { id, kind, position, health: max_health, max_health, attack, defense, bounty }
    }

    /// Override the kind's default health (tests, scripted encounters).
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self.max_health = self.max_health.max(health);
        self
    }

    pub fn max_health(&self) -> u32 { self.max_health }

    /// Text used in death narration.
    pub fn description(&self) -> String {
        format!("{} at {}", self.kind.name(), self.position)
    }

    /// The loot this enemy leaves behind: one visible treasure worth its bounty.
    pub fn defeat(&self, loot_id: EntityId) -> GameItem {
        GameItem::treasure(loot_id, self.bounty, self.position).with_visible(true)
    }
}

impl Placeable for Enemy {
    fn id(&self) -> EntityId { self.id }
    fn position(&self) -> Position { self.position }
    fn set_position(&mut self, position: Position) { self.position = position; }
    fn glyph(&self) -> char { self.kind.glyph() }
    fn blocks_movement(&self) -> bool { true }
}

impl Fightable for Enemy {
    fn health(&self) -> u32 { self.health }
    fn attack_power(&self) -> u32 { self.attack }
    fn defense(&self) -> u32 { self.defense }
    fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.health);
        self.health -= dealt;
        dealt
    }
    fn label(&self) -> String { self.kind.name().to_string() }
}
