use serde::{Deserialize, Serialize};

use crate::Position;

/// Represents errors that can occur within the grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Position (Row: {row}, Column: {column}) is out of bounds for a {rows}x{columns} map")]
    OutOfBounds {
        row: i32,
        column: i32,
        rows: usize,
        columns: usize,
    },
    #[error("A map needs at least one row and one column, got {rows}x{columns}")]
    EmptyDimensions { rows: usize, columns: usize },
    #[error("A {rows}x{columns} map is too large")]
    TooLarge { rows: usize, columns: usize },
    #[error("The off-grid sentinel cannot be stored in a room")]
    SentinelKind,
}

/// Classification of a single room in the cavern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    #[default]
    Normal,
    Entrance,
    Fountain,
    Pit,
    /// Returned for queries outside the map; never stored.
    OffGrid,
}

/// A fixed-size 2D grid structure.
///
/// Stores elements of type `T` in a flat vector in row-major order and is
/// addressed by [`Position`]. Positions with a negative or too-large
/// component are simply off the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a new grid with the specified dimensions, filled with default values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyDimensions`] if either dimension is zero, or
    /// [`GridError::TooLarge`] if a coordinate would not fit in an `i32` or
    /// `rows * columns` overflows `usize`.
    pub fn try_new(rows: usize, columns: usize) -> Result<Self, GridError>
    where
        T: Default + Clone,
    {
        if rows == 0 || columns == 0 {
            return Err(GridError::EmptyDimensions { rows, columns });
        }
        let too_large = GridError::TooLarge { rows, columns };
        if i32::try_from(rows).is_err() || i32::try_from(columns).is_err() {
            return Err(too_large);
        }
        let size = rows.checked_mul(columns).ok_or(too_large)?;
        Ok(Grid {
            rows,
            columns,
            cells: vec![T::default(); size],
        })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Converts a position to a flat vector index.
    ///
    /// Returns `None` if the position is out of bounds.
    #[inline]
    fn position_to_index(&self, position: Position) -> Option<usize> {
        let row = usize::try_from(position.row).ok()?;
        let column = usize::try_from(position.column).ok()?;
        if row < self.rows && column < self.columns {
            Some(row * self.columns + column)
        } else {
            None
        }
    }

    /// Converts a flat vector index back to a position.
    #[inline]
    fn index_to_position(&self, index: usize) -> Position {
        Position {
            row: (index / self.columns) as i32,
            column: (index % self.columns) as i32,
        }
    }

    /// Checks if the given position is within the grid boundaries.
    #[inline]
    pub fn is_in_bounds(&self, position: Position) -> bool {
        self.position_to_index(position).is_some()
    }

    /// Gets an immutable reference to the cell at the given position.
    ///
    /// Returns `None` if the position is out of bounds.
    pub fn get(&self, position: Position) -> Option<&T> {
        let index = self.position_to_index(position)?;
        self.cells.get(index)
    }

    /// Sets the value of the cell at the given position.
    ///
    /// Returns `Ok(())` on success, or `Err(GridError::OutOfBounds)` if the
    /// position is off the grid.
    pub fn set(&mut self, position: Position, value: T) -> Result<(), GridError> {
        let index = self
            .position_to_index(position)
            .ok_or(GridError::OutOfBounds {
                row: position.row,
                column: position.column,
                rows: self.rows,
                columns: self.columns,
            })?;
        self.cells[index] = value;
        Ok(())
    }

    /// Returns an iterator that yields `(Position, &T)` for each cell.
    pub fn enumerate(&self) -> impl Iterator<Item = (Position, &T)> {
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (self.index_to_position(index), cell))
    }
}

impl Grid<RoomKind> {
    /// Returns the kind of room at `position`, or [`RoomKind::OffGrid`] when
    /// the position is outside the map.
    pub fn room_kind_at(&self, position: Position) -> RoomKind {
        self.get(position).copied().unwrap_or(RoomKind::OffGrid)
    }

    /// Stores `kind` at `position`.
    ///
    /// Only valid for positions on the map, and never for the off-grid sentinel.
    pub fn set_room_kind(&mut self, position: Position, kind: RoomKind) -> Result<(), GridError> {
        if kind == RoomKind::OffGrid {
            return Err(GridError::SentinelKind);
        }
        self.set(position, kind)
    }

    /// Finds the first room of the given kind in row-major order.
    pub fn find(&self, kind: RoomKind) -> Option<Position> {
        self.enumerate()
            .find_map(|(position, room)| (*room == kind).then_some(position))
    }
}

/// The eight positions around `center` (including diagonals).
///
/// Some of them may be off the grid.
pub fn neighbors8(center: Position) -> impl Iterator<Item = Position> {
    (-1..=1)
        .flat_map(|d_row| (-1..=1).map(move |d_column| (d_row, d_column)))
        .filter(|&offset| offset != (0, 0))
        .map(move |(d_row, d_column)| Position {
            row: center.row + d_row,
            column: center.column + d_column,
        })
}
