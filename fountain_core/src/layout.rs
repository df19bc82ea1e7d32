use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    Position,
    map::{Grid, GridError, RoomKind},
};

/// Problems with a map layout, found while loading or applying it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Map is empty")]
    Empty,
    #[error("Map has zero width")]
    ZeroWidth,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown map code '{code}' at (Row: {row}, Column: {column})")]
    UnknownCode {
        code: String,
        row: usize,
        column: usize,
    },
    #[error("Map needs exactly one {kind:?} room, found {found}")]
    RoomCount { kind: RoomKind, found: usize },
    #[error("Unknown map size '{0}', expected small, medium or large")]
    UnknownSize(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// The three built-in cavern sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapSize {
    Small,
    Medium,
    Large,
}

impl MapSize {
    /// `(rows, columns)` of the map.
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            MapSize::Small => (4, 4),
            MapSize::Medium => (6, 6),
            MapSize::Large => (8, 8),
        }
    }
}

impl fmt::Display for MapSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapSize::Small => "small",
            MapSize::Medium => "medium",
            MapSize::Large => "large",
        };
        f.write_str(name)
    }
}

impl FromStr for MapSize {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Ok(MapSize::Small),
            "medium" | "m" => Ok(MapSize::Medium),
            "large" | "l" => Ok(MapSize::Large),
            _ => Err(LayoutError::UnknownSize(s.to_string())),
        }
    }
}

/// A hand-authored cavern: its size and the special rooms in it.
///
/// Every room not listed is [`RoomKind::Normal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: usize,
    pub columns: usize,
    pub placements: Vec<(Position, RoomKind)>,
}

impl Layout {
    /// The fixed layout for one of the built-in sizes.
    pub fn builtin(size: MapSize) -> Layout {
        let (rows, columns) = size.dimensions();
        let (fountain, pits): (Position, &[Position]) = match size {
            MapSize::Small => (Position::new(3, 2), &[Position::new(1, 3)]),
            MapSize::Medium => (
                Position::new(4, 3),
                &[Position::new(2, 2), Position::new(3, 5)],
            ),
            MapSize::Large => (
                Position::new(6, 5),
                &[
                    Position::new(2, 3),
                    Position::new(4, 1),
                    Position::new(5, 6),
                    Position::new(7, 2),
                ],
            ),
        };

        let mut placements = vec![
            (Position::new(0, 0), RoomKind::Entrance),
            (fountain, RoomKind::Fountain),
        ];
        placements.extend(pits.iter().map(|&pit| (pit, RoomKind::Pit)));
        Layout {
            rows,
            columns,
            placements,
        }
    }

    /// Parses a text map.
    ///
    /// Each line is a row and each whitespace-separated code a column:
    /// `..` normal, `EN` entrance, `FO` fountain, `PI` pit.
    pub fn parse(map_string: &str) -> Result<Layout, LayoutError> {
        let lines: Vec<&str> = map_string
            .trim()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return Err(LayoutError::Empty);
        }

        let rows = lines.len();
        let mut columns = 0;
        let mut placements = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if row == 0 {
                columns = tokens.len();
                if columns == 0 {
                    return Err(LayoutError::ZeroWidth);
                }
            } else if tokens.len() != columns {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: columns,
                    found: tokens.len(),
                });
            }

            for (column, token) in tokens.iter().enumerate() {
                let kind = match *token {
                    ".." => continue,
                    "EN" => RoomKind::Entrance,
                    "FO" => RoomKind::Fountain,
                    "PI" => RoomKind::Pit,
                    unknown => {
                        return Err(LayoutError::UnknownCode {
                            code: unknown.to_string(),
                            row,
                            column,
                        });
                    }
                };
                placements.push((Position::new(row as i32, column as i32), kind));
            }
        }

        Ok(Layout {
            rows,
            columns,
            placements,
        })
    }

    /// Builds the map and returns it with the entrance position.
    ///
    /// Pit placements are skipped unless `with_pits` is set. The finished
    /// map must hold exactly one entrance and one fountain.
    pub fn build(&self, with_pits: bool) -> Result<(Grid<RoomKind>, Position), LayoutError> {
        let mut map = Grid::try_new(self.rows, self.columns)?;
        for &(position, kind) in &self.placements {
            if kind == RoomKind::Pit && !with_pits {
                warn!("Ignoring pit at {:?}: pits are disabled", position);
                continue;
            }
            map.set_room_kind(position, kind)?;
        }

        let count = |kind| map.enumerate().filter(|(_, room)| **room == kind).count();
        for kind in [RoomKind::Entrance, RoomKind::Fountain] {
            let found = count(kind);
            if found != 1 {
                return Err(LayoutError::RoomCount { kind, found });
            }
        }

        let entrance = map
            .find(RoomKind::Entrance)
            .ok_or(LayoutError::RoomCount {
                kind: RoomKind::Entrance,
                found: 0,
            })?;
        Ok((map, entrance))
    }
}
