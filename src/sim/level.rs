//! Level loader: turns a text level into the world's initial collections.
//!
//! ## Level format (`.txt`):
//!   Line 1: `# Level Name`
//!   Optional directives, one per line:
//!     `@name <player name>`
//!     `@class warrior|mage|archer|rogue`
//!   Remaining lines: map rows (all rows padded to the widest row with walls)
//!
//! ## Tile legend:
//!   '#' = Wall                 '.' or ' ' = Floor
//!   'P' = Player spawn         '!' = Healing potion
//!   'g' = Goblin               '+' = Power potion
//!   'o' = Orc                  '$' = Treasure
//!   'D' = Dragon               's' = Skeleton

use std::path::Path;

use thiserror::Error;

use crate::domain::entity::{Enemy, EnemyKind, IdAllocator, Player, PlayerClass};
use crate::domain::item::GameItem;
use crate::domain::position::Position;
use crate::domain::tile::Tile;
use super::error::WorldError;
use super::map::GridMap;
use super::world::World;

/// Treasure value for `$` cells.
pub const FLOOR_TREASURE_VALUE: u32 = 20;

const BUILTIN_LEVEL: &str = "\
# The Goblin Warrens
@name Ayla
@class warrior
##############
#P...#...g..$#
#.!..#.###...#
#....+.#o....#
###.####..!..#
#......#.###.#
#.g.$......D.#
##############
";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level has no map rows")]
    Empty,
    #[error("level has no player spawn")]
    MissingPlayer,
    #[error("unknown player class '{0}'")]
    UnknownClass(String),
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    #[error("too many entities for the id space")]
    TooManyEntities,
    #[error("could not read level: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a world is built from.
pub struct LevelSetup {
    pub name: String,
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub items: Vec<GameItem>,
    pub map: GridMap,
}

impl LevelSetup {
    pub fn into_world(self) -> Result<World<GridMap>, WorldError> {
        World::new(self.players, self.enemies, self.items, self.map)
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

pub fn builtin_level() -> Result<LevelSetup, LevelError> {
    parse_level(BUILTIN_LEVEL)
}

pub fn load_level_file(path: &Path) -> Result<LevelSetup, LevelError> {
    let text = std::fs::read_to_string(path)?;
    tracing::info!("loading level from {}", path.display());
    parse_level(&text)
}

pub fn parse_level(text: &str) -> Result<LevelSetup, LevelError> {
    let mut name = String::from("Untitled");
    let mut player_name = String::from("Hero");
    let mut class = PlayerClass::Warrior;
    let mut rows: Vec<&str> = Vec::new();

    for line in text.lines() {
        if rows.is_empty() {
            if let Some(title) = line.strip_prefix("# ") {
                name = title.trim().to_string();
                continue;
            }
            if let Some(directive) = line.strip_prefix('@') {
                let (key, value) = directive.split_once(' ').unwrap_or((directive, ""));
                let value = value.trim();
                match key {
                    "name" => player_name = value.to_string(),
                    "class" => {
                        class = PlayerClass::from_name(value)
                            .ok_or_else(|| LevelError::UnknownClass(value.to_string()))?;
                    }
                    other => return Err(LevelError::UnknownDirective(other.to_string())),
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
        }
        rows.push(line.trim_end());
    }
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(LevelError::Empty);
    }

    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut tiles = vec![vec![Tile::Wall; width]; rows.len()];
    let mut ids = IdAllocator::new();
    let mut players = Vec::new();
    let mut enemies = Vec::new();
    let mut items = Vec::new();

    for (r, row) in rows.iter().enumerate() {
        for (c, ch) in row.chars().enumerate() {
            let pos = Position::new(r as i32, c as i32);
            tiles[r][c] = if ch == '#' { Tile::Wall } else { Tile::Floor };
            if !matches!(ch, 'P' | 'g' | 'o' | 'D' | 's' | '!' | '+' | '$') {
                continue;
            }
            let id = ids.allocate().ok_or(LevelError::TooManyEntities)?;
            match ch {
                'P' => players.push(Player::new(id, player_name.clone(), class.clone(), pos)),
                'g' => enemies.push(Enemy::new(id, EnemyKind::Goblin, pos)),
                'o' => enemies.push(Enemy::new(id, EnemyKind::Orc, pos)),
                'D' => enemies.push(Enemy::new(id, EnemyKind::Dragon, pos)),
                's' => enemies.push(Enemy::new(id, EnemyKind::Skeleton, pos)),
                '!' => items.push(GameItem::healing_potion(id, pos)),
                '+' => items.push(GameItem::power_potion(id, pos)),
                _ => items.push(GameItem::treasure(id, FLOOR_TREASURE_VALUE, pos)),
            }
        }
    }

    if players.is_empty() {
        return Err(LevelError::MissingPlayer);
    }

    tracing::debug!(
        "parsed level '{}': {}x{}, {} enemies, {} items",
        name, width, rows.len(), enemies.len(), items.len(),
    );

    Ok(LevelSetup { name, players, enemies, items, map: GridMap::new(tiles) })
}
