//! Error type shared by every fallible engine operation.
//!
//! Illegal moves are not errors: the controller rejects them silently.

use thiserror::Error;

use crate::types::{Coordinate, Level};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Zero or several start cells.
    #[error("board has {found} start cells, expected exactly one")]
    NoStartFound { found: usize },

    /// A segment was requested for two cells that do not touch.
    #[error("{a} and {b} are not adjacent")]
    NotAdjacent { a: Coordinate, b: Coordinate },

    #[error("board has no cells")]
    EmptyBoard,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell ({row}, {col}) holds {value}, expected 0, 1 or 2")]
    InvalidCell { row: usize, col: usize, value: i64 },

    #[error("board is {rows}x{cols}, level {level} needs {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        level: Level,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("unknown level {0:?}")]
    UnknownLevel(String),

    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("open cell {0} has no open neighbour")]
    IsolatedCell(Coordinate),

    #[error("board has more than one dead end")]
    TooManyDeadEnds,

    #[error("search gave up after {0} expansions")]
    SearchExhausted(u64),

    #[error("board has no solution")]
    Unsolvable,
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
