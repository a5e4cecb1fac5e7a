//! Core data types for the Dot-Connect engine.
//!
//! Boards are stored row-major: `cells[row * cols + col]` maps to the JS
//! equivalent `board[row][col]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A grid position. Serialized as a `[row, col]` pair, the shape solver
/// output arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True iff the two coordinates share one axis and differ by exactly one
    /// on the other.
    #[inline(always)]
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        (self.row == other.row && self.col.abs_diff(other.col) == 1)
            || (self.col == other.col && self.row.abs_diff(other.row) == 1)
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Coordinate> for (usize, usize) {
    fn from(c: Coordinate) -> Self {
        (c.row, c.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Classification of a single board position.
///
/// Serialized as the integer code used by board files: 0 = open,
/// 1 = blocked, 2 = start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    Open,
    Blocked,
    Start,
}

impl Cell {
    /// Map a board-file integer to a cell, `None` for anything outside 0..=2.
    pub fn from_code(code: i64) -> Option<Cell> {
        match code {
            0 => Some(Cell::Open),
            1 => Some(Cell::Blocked),
            2 => Some(Cell::Start),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Cell::Open => 0,
            Cell::Blocked => 1,
            Cell::Start => 2,
        }
    }

    /// Open and start cells must both be visited.
    #[inline(always)]
    pub fn is_required(self) -> bool {
        !matches!(self, Cell::Blocked)
    }
}

impl TryFrom<u8> for Cell {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Cell::from_code(code as i64).ok_or_else(|| format!("invalid cell code {code}"))
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.code()
    }
}

/// Difficulty tier. Each tier fixes the board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Beginner, Level::Easy, Level::Medium, Level::Hard];

    /// Board dimensions as (rows, cols).
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Level::Beginner => (5, 5),
            Level::Easy => (8, 6),
            Level::Medium => (10, 6),
            Level::Hard => (12, 8),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Level::ALL
            .into_iter()
            .find(|level| level.name() == lower)
            .ok_or_else(|| EngineError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_is_orthogonal_only() {
        let c = Coordinate::new(2, 2);
        assert!(c.is_adjacent(Coordinate::new(1, 2)));
        assert!(c.is_adjacent(Coordinate::new(3, 2)));
        assert!(c.is_adjacent(Coordinate::new(2, 1)));
        assert!(c.is_adjacent(Coordinate::new(2, 3)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coordinate::new(3, 3)));
        assert!(!c.is_adjacent(Coordinate::new(2, 4)));
    }

    #[test]
    fn test_coordinate_serializes_as_pair() {
        let json = serde_json::to_string(&Coordinate::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Vec<Coordinate> = serde_json::from_str("[[0,0],[0,1]]").unwrap();
        assert_eq!(back, vec![Coordinate::new(0, 0), Coordinate::new(0, 1)]);
    }

    #[test]
    fn test_cell_codes() {
        assert_eq!(Cell::from_code(0), Some(Cell::Open));
        assert_eq!(Cell::from_code(1), Some(Cell::Blocked));
        assert_eq!(Cell::from_code(2), Some(Cell::Start));
        assert_eq!(Cell::from_code(3), None);
        assert_eq!(Cell::from_code(-1), None);
        assert!(serde_json::from_str::<Cell>("7").is_err());
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("Hard".parse::<Level>().unwrap(), Level::Hard);
        assert_eq!(" beginner ".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!(
            "expert".parse::<Level>(),
            Err(EngineError::UnknownLevel("expert".into()))
        );
        assert_eq!(Level::Medium.dimensions(), (10, 6));
    }
}
