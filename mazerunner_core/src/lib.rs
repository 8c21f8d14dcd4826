use serde::{Deserialize, Serialize};

pub mod command;
pub mod inventory;
pub mod item;
pub mod level;
pub mod loader;
pub mod map;
pub mod model;
pub mod player;
pub mod rules;
pub mod save;
pub mod shop;
pub mod tile;

pub use item::Item;
pub use tile::Tile;

/// Represents a cell coordinate as `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Applies a signed `(row, col)` delta.
    ///
    /// Returns `None` if the result would be negative; upper bounds are the
    /// caller's concern since they depend on the maze.
    pub fn offset(self, (d_row, d_col): (isize, isize)) -> Option<Position> {
        Some(Position {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

/// The four directions the player can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the `(row, col)` delta for this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Maps the classic `w`/`a`/`s`/`d` movement keys to a direction.
    pub fn from_key(key: char) -> Option<Direction> {
        match key {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_refuses_negative_coordinates() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.offset(Direction::Up.delta()), None);
        assert_eq!(origin.offset(Direction::Left.delta()), None);
        assert_eq!(
            origin.offset(Direction::Down.delta()),
            Some(Position::new(1, 0))
        );
    }

    #[test]
    fn movement_keys() {
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('d'), Some(Direction::Right));
        assert_eq!(Direction::from_key('x'), None);
    }
}
