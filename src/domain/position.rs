//! Grid coordinates and the four movement directions.
//!
//! Rows grow downward, columns grow rightward. `(0, 0)` is the top-left cell.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// The neighbouring cell one step in `dir`. Saturates at the `i32` edges.
    pub fn step(self, dir: Direction) -> Position {
        let (dr, dc) = dir.delta();
        Position::new(self.row.saturating_add(dr), self.col.saturating_add(dc))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// `(row, col)` offset for one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (-1, 0),
            Direction::Down  => (1, 0),
            Direction::Left  => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction of a single orthogonal step from `from` to `to`.
    /// Diagonals, the same cell, and anything further than one step yield `None`.
    pub fn between(from: Position, to: Position) -> Option<Direction> {
        let dr = to.row.checked_sub(from.row)?;
        let dc = to.col.checked_sub(from.col)?;
        match (dr, dc) {
            (1, 0)  => Some(Direction::Down),
            (-1, 0) => Some(Direction::Up),
            (0, 1)  => Some(Direction::Right),
            (0, -1) => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up    => "up",
            Direction::Down  => "down",
            Direction::Left  => "left",
            Direction::Right => "right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_orthogonal_neighbours() {
        let from = Position::new(3, 3);
        assert_eq!(Direction::between(from, Position::new(4, 3)), Some(Direction::Down));
        assert_eq!(Direction::between(from, Position::new(2, 3)), Some(Direction::Up));
        assert_eq!(Direction::between(from, Position::new(3, 4)), Some(Direction::Right));
        assert_eq!(Direction::between(from, Position::new(3, 2)), Some(Direction::Left));
    }

    #[test]
    fn between_rejects_everything_else() {
        let from = Position::new(3, 3);
        assert_eq!(Direction::between(from, from), None);
        assert_eq!(Direction::between(from, Position::new(4, 4)), None);
        assert_eq!(Direction::between(from, Position::new(2, 2)), None);
        assert_eq!(Direction::between(from, Position::new(5, 3)), None);
        assert_eq!(Direction::between(from, Position::new(3, 0)), None);
    }

    #[test]
    fn between_far_corners_is_none() {
        let from = Position::new(1, 1);
        assert_eq!(Direction::between(from, Position::new(i32::MIN, 0)), None);
        assert_eq!(Direction::between(Position::new(i32::MAX, 0), Position::new(i32::MIN, 0)), None);
        assert_eq!(Direction::between(Position::new(0, i32::MIN), Position::new(0, i32::MAX)), None);
    }

    #[test]
    fn step_saturates_at_the_edge() {
        let edge = Position::new(i32::MIN, i32::MAX);
        assert_eq!(edge.step(Direction::Up), edge);
        assert_eq!(edge.step(Direction::Right), edge);
    }

    #[test]
    fn step_matches_between() {
        let from = Position::new(1, 1);
        for dir in Direction::ALL {
            assert_eq!(Direction::between(from, from.step(dir)), Some(dir));
        }
    }
}
