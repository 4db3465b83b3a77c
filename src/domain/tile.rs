//! Tile types for the grid map.
//! Properties are queried via methods so tile semantics stay centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

impl Tile {
    /// Can an entity occupy this cell?
    pub fn is_passable(self) -> bool {
        matches!(self, Tile::Floor)
    }

    pub fn glyph(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall  => '#',
        }
    }
}
