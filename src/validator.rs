//! Move Validator: a pure predicate over (path, candidate, board).
//!
//! Identical inputs always give identical answers, which replay relies on.

use std::fmt;

use crate::board::Board;
use crate::path::Path;
use crate::types::{Cell, Coordinate};

/// Why a candidate cell cannot extend the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Blocked or off the board.
    Blocked,
    /// Does not touch the path's terminal cell.
    NotAdjacent,
    /// Already on the path.
    Revisit,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::Blocked => "cell is blocked",
            Rejection::NotAdjacent => "cell is not adjacent to the last dot",
            Rejection::Revisit => "cell is already on the path",
        })
    }
}

/// Rules in order: blocked cells never; an empty path takes anything else;
/// otherwise the candidate must touch the terminal cell and be new.
pub fn check_extend(path: &Path, candidate: Coordinate, board: &Board) -> Result<(), Rejection> {
    if board.classify(candidate) == Cell::Blocked {
        return Err(Rejection::Blocked);
    }
    let Some(last) = path.last() else {
        return Ok(());
    };
    if !last.is_adjacent(candidate) {
        return Err(Rejection::NotAdjacent);
    }
    if path.contains(candidate) {
        return Err(Rejection::Revisit);
    }
    Ok(())
}

#[inline]
pub fn can_extend(path: &Path, candidate: Coordinate, board: &Board) -> bool {
    check_extend(path, candidate, board).is_ok()
}
