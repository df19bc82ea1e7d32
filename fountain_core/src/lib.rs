use serde::{Deserialize, Serialize};

pub mod actor;
pub mod command;
pub mod console;
pub mod game;
pub mod layout;
pub mod map;
pub mod sense;

/// Represents a room coordinate in the cavern.
///
/// Coordinates are signed so that a step off the edge of the map is still a
/// representable position; whether it is on the map is a [`map::Grid`] concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub column: i32,
}

impl Position {
    pub const fn new(row: i32, column: i32) -> Self {
        Position { row, column }
    }

    /// Returns the position one step away in the given direction.
    pub fn offset(self, direction: Direction) -> Position {
        let (d_row, d_column) = direction.offset();
        Position {
            row: self.row + d_row,
            column: self.column + d_column,
        }
    }
}

/// The four directions a player can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The `(row, column)` step for this direction.
    ///
    /// North/South walk along the column axis and East/West along the row axis.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}
