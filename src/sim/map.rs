//! The map: grid occupancy and visibility.
//!
//! `WorldMap` is the contract the world coordinator drives. `GridMap` is the
//! stock implementation: a rectangle of tiles, a per-cell occupant list, and a
//! fog layer lifted by `reveal_nearby`.
//!
//! Occupancy rules:
//!   - walls and out-of-bounds cells hold nothing
//!   - at most one movement-blocking occupant (player / enemy) per cell
//!   - any number of non-blocking occupants (items) may share a cell

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::domain::entity::{EntityId, Placeable};
use crate::domain::position::{Direction, Position};
use crate::domain::tile::Tile;

pub const DEFAULT_REVEAL_RADIUS: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("position {0} is outside the map")]
    OutOfBounds(Position),
    #[error("position {0} is blocked")]
    Blocked(Position),
}

/// Map operations the world coordinator depends on.
pub trait WorldMap: fmt::Display {
    /// Place `entity` at `position`, updating the entity's own position.
    fn add_entity(&mut self, position: Position, entity: &mut dyn Placeable) -> Result<(), MapError>;

    /// Remove `entity` from wherever it is. Returns false if it was not on the map.
    fn remove_entity(&mut self, entity: &dyn Placeable) -> bool;

    /// Move `entity` one step. Returns false (and changes nothing) if refused.
    fn move_entity(&mut self, entity: &mut dyn Placeable, direction: Direction) -> bool;

    /// Lift the fog around `position`.
    fn reveal_nearby(&mut self, position: Position);

    fn occupants_at(&self, position: Position) -> Vec<EntityId>;

    fn is_revealed(&self, position: Position) -> bool;
}

#[derive(Clone, Copy, Debug)]
struct Occupant {
    id: EntityId,
    glyph: char,
    blocks: bool,
}

#[derive(Clone, Debug)]
pub struct GridMap {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
    revealed: Vec<Vec<bool>>,
    occupants: BTreeMap<Position, Vec<Occupant>>,
    reveal_radius: i32,
}

// ── Construction ──

impl GridMap {
    /// Build from a row-major tile grid. Rows shorter than the first are
    /// padded with walls.
    pub fn new(mut tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, Vec::len);
        for row in &mut tiles {
            row.resize(width, Tile::Wall);
        }
        GridMap {
            tiles,
            width,
            height,
            revealed: vec![vec![false; width]; height],
            occupants: BTreeMap::new(),
            reveal_radius: DEFAULT_REVEAL_RADIUS,
        }
    }

    /// An all-floor map of the given size.
    pub fn open(width: usize, height: usize) -> Self {
        GridMap::new(vec![vec![Tile::Floor; width]; height])
    }

    pub fn with_reveal_radius(mut self, radius: i32) -> Self {
        self.reveal_radius = radius.max(0);
        self
    }

    /// Convenience for tests and scripted maps: apply `tile` at `pos`.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        if let Some((r, c)) = self.index(pos) {
            self.tiles[r][c] = tile;
        }
    }
}

// ── Queries ──

impl GridMap {
    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Out of bounds reads as wall.
    pub fn tile_at(&self, pos: Position) -> Tile {
        match self.index(pos) {
            Some((r, c)) => self.tiles[r][c],
            None => Tile::Wall,
        }
    }

    fn index(&self, pos: Position) -> Option<(usize, usize)> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        (r < self.height && c < self.width).then_some((r, c))
    }

    fn is_blocked(&self, pos: Position) -> bool {
        self.occupants
            .get(&pos)
            .is_some_and(|cell| cell.iter().any(|o| o.blocks))
    }

    /// Check that `entity` could stand at `pos`.
    fn check_enterable(&self, pos: Position, blocks: bool) -> Result<(), MapError> {
        if !self.contains(pos) {
            return Err(MapError::OutOfBounds(pos));
        }
        if !self.tile_at(pos).is_passable() || (blocks && self.is_blocked(pos)) {
            return Err(MapError::Blocked(pos));
        }
        Ok(())
    }

    /// Remove the occupant record for `id`, trying `hint` first.
    fn take_occupant(&mut self, id: EntityId, hint: Position) -> Option<Occupant> {
        let at = if self.occupants.get(&hint).is_some_and(|c| c.iter().any(|o| o.id == id)) {
            hint
        } else {
            *self
                .occupants
                .iter()
                .find(|(_, cell)| cell.iter().any(|o| o.id == id))?
                .0
        };
        let cell = self.occupants.get_mut(&at)?;
        let idx = cell.iter().position(|o| o.id == id)?;
        let occupant = cell.remove(idx);
        if cell.is_empty() {
            self.occupants.remove(&at);
        }
        Some(occupant)
    }
}

// ── WorldMap ──

impl WorldMap for GridMap {
    fn add_entity(&mut self, position: Position, entity: &mut dyn Placeable) -> Result<(), MapError> {
        let blocks = entity.blocks_movement();
        let previous = self.take_occupant(entity.id(), entity.position());
        if let Err(e) = self.check_enterable(position, blocks) {
            // Leave the entity where it was.
            if let Some(o) = previous {
                self.occupants.entry(entity.position()).or_default().push(o);
            }
            return Err(e);
        }
        entity.set_position(position);
        self.occupants.entry(position).or_default().push(Occupant {
            id: entity.id(),
            glyph: entity.glyph(),
            blocks,
        });
        Ok(())
    }

    fn remove_entity(&mut self, entity: &dyn Placeable) -> bool {
        self.take_occupant(entity.id(), entity.position()).is_some()
    }

    fn move_entity(&mut self, entity: &mut dyn Placeable, direction: Direction) -> bool {
        let from = entity.position();
        let to = from.step(direction);
        if self.check_enterable(to, entity.blocks_movement()).is_err() {
            return false;
        }
        let Some(occupant) = self.take_occupant(entity.id(), from) else {
            return false;
        };
        self.occupants.entry(to).or_default().push(occupant);
        entity.set_position(to);
        true
    }

    fn reveal_nearby(&mut self, position: Position) {
        let r = self.reveal_radius;
        for row in (position.row - r)..=(position.row + r) {
            for col in (position.col - r)..=(position.col + r) {
                if let Some((ri, ci)) = self.index(Position::new(row, col)) {
                    self.revealed[ri][ci] = true;
                }
            }
        }
    }

    fn occupants_at(&self, position: Position) -> Vec<EntityId> {
        self.occupants
            .get(&position)
            .map(|cell| cell.iter().map(|o| o.id).collect())
            .unwrap_or_default()
    }

    fn is_revealed(&self, position: Position) -> bool {
        self.index(position).is_some_and(|(r, c)| self.revealed[r][c])
    }
}

impl fmt::Display for GridMap {
    /// Fogged cells render blank; a blocking occupant wins over items.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.height {
            let line: String = (0..self.width)
                .map(|c| {
                    let pos = Position::new(r as i32, c as i32);
                    if !self.revealed[r][c] {
                        return ' ';
                    }
                    match self.occupants.get(&pos) {
                        Some(cell) if !cell.is_empty() => cell
                            .iter()
                            .find(|o| o.blocks)
                            .unwrap_or(&cell[cell.len() - 1])
                            .glyph,
                        _ => self.tiles[r][c].glyph(),
                    }
                })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
