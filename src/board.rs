//! Grid Model: cell classification, start resolution and the required-visit
//! count, plus board-file parsing and random board generation.
//!
//! A `Board` is immutable once built. The key generation entry point is
//! `generate_solvable_board()`, which runs the whole retry loop inside WASM.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{EngineError, Result};
use crate::rng::BoardRng;
use crate::types::{Cell, Coordinate, Level};

/// Share of cells turned into blocked cells by random generation, in percent.
const BLOCKED_PERCENT: usize = 15;

/// Orthogonal directions in search order: up, down, left, right.
pub const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    required: usize,
}

/// On-disk board file: `{"board": [[2, 0], [0, 1]]}`.
#[derive(Debug, Deserialize)]
struct BoardFile {
    board: Vec<Vec<i64>>,
}

impl Board {
    /// Build a board from its integer matrix form.
    ///
    /// The matrix must be non-empty and rectangular with codes 0/1/2. The
    /// number of start cells is not checked here; `find_start` reports it.
    #[instrument(skip(matrix), fields(rows = matrix.len()))]
    pub fn from_matrix<R: AsRef<[i64]>>(matrix: &[R]) -> Result<Self> {
        let cols = matrix.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if matrix.is_empty() || cols == 0 {
            return Err(EngineError::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(matrix.len() * cols);
        for (row, values) in matrix.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != cols {
                return Err(EngineError::RaggedRow {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let cell = Cell::from_code(value)
                    .ok_or(EngineError::InvalidCell { row, col, value })?;
                cells.push(cell);
            }
        }

        Ok(Self::from_cells(matrix.len(), cols, cells))
    }

    /// Parse a board file (`{"board": [[...]]}`).
    pub fn from_json(text: &str) -> Result<Self> {
        let file: BoardFile = serde_json::from_str(text)?;
        Self::from_matrix(&file.board)
    }

    fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        let required = cells.iter().filter(|c| c.is_required()).count();
        Self {
            rows,
            cols,
            cells,
            required,
        }
    }

    /// Check the board against a difficulty tier: exact dimensions and a
    /// single start cell.
    pub fn validate_for_level(&self, level: Level) -> Result<()> {
        let (expected_rows, expected_cols) = level.dimensions();
        if self.rows != expected_rows || self.cols != expected_cols {
            return Err(EngineError::DimensionMismatch {
                level,
                rows: self.rows,
                cols: self.cols,
                expected_rows,
                expected_cols,
            });
        }
        self.find_start().map(|_| ())
    }

    #[inline(always)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn contains(&self, c: Coordinate) -> bool {
        c.row < self.rows && c.col < self.cols
    }

    /// Classification of `c`. Positions off the board count as blocked.
    #[inline(always)]
    pub fn classify(&self, c: Coordinate) -> Cell {
        if self.contains(c) {
            self.cells[c.row * self.cols + c.col]
        } else {
            Cell::Blocked
        }
    }

    /// The unique start cell.
    pub fn find_start(&self) -> Result<Coordinate> {
        let mut starts = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Start)
            .map(|(i, _)| Coordinate::new(i / self.cols, i % self.cols));

        match (starts.next(), starts.next()) {
            (Some(start), None) => Ok(start),
            (None, _) => Err(EngineError::NoStartFound { found: 0 }),
            (Some(_), Some(_)) => Err(EngineError::NoStartFound {
                found: 2 + starts.count(),
            }),
        }
    }

    /// Number of open cells plus the start cell.
    #[inline(always)]
    pub fn required_visit_count(&self) -> usize {
        self.required
    }

    /// In-bounds, non-blocked orthogonal neighbours of `c`, in
    /// up/down/left/right order.
    pub fn neighbors(&self, c: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let row = c.row.checked_add_signed(dr)?;
            let col = c.col.checked_add_signed(dc)?;
            let n = Coordinate::new(row, col);
            self.classify(n).is_required().then_some(n)
        })
    }

    /// Every position on the board, row by row.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coordinate::new(row, col)))
    }

    /// Integer matrix form, as handed to a solver or written to a board file.
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }
}

/// Build a random board for `level`: one start cell, then 15% of the cells
/// blocked.
pub fn generate_random_board(level: Level, rng: &mut BoardRng) -> Board {
    let (rows, cols) = level.dimensions();
    let mut cells = vec![Cell::Open; rows * cols];

    let start = rng.pick_cell(rows, cols);
    cells[start.row * cols + start.col] = Cell::Start;

    let blocked = rows * cols * BLOCKED_PERCENT / 100;
    let mut placed = 0;
    while placed < blocked {
        let c = rng.pick_cell(rows, cols);
        let slot = &mut cells[c.row * cols + c.col];
        if *slot == Cell::Open {
            *slot = Cell::Blocked;
            placed += 1;
        }
    }

    Board::from_cells(rows, cols, cells)
}

/// Result of a board generation run.
#[derive(Debug)]
pub struct BoardResult {
    pub board: Board,
    /// How many random layouts were tried.
    pub attempts: u32,
    /// True if the predicate accepted the board within `max_attempts`.
    pub success: bool,
}

/// Generate boards until `is_solvable_fn` accepts one.
///
/// The predicate is injected so this module stays decoupled from the solver.
/// When `max_attempts` runs out the last board is returned with
/// `success == false`.
#[instrument(skip(is_solvable_fn))]
pub fn generate_solvable_board<F>(level: Level, max_attempts: u32, is_solvable_fn: F) -> BoardResult
where
    F: Fn(&Board) -> bool,
{
    generate_solvable_board_with(level, max_attempts, &mut BoardRng::new(), is_solvable_fn)
}

/// `generate_solvable_board` with a caller-supplied random source.
pub fn generate_solvable_board_with<F>(
    level: Level,
    max_attempts: u32,
    rng: &mut BoardRng,
    is_solvable_fn: F,
) -> BoardResult
where
    F: Fn(&Board) -> bool,
{
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let board = generate_random_board(level, rng);

        if is_solvable_fn(&board) {
            debug!(attempts, "generated solvable board");
            return BoardResult {
                board,
                attempts,
                success: true,
            };
        }

        if attempts >= max_attempts.max(1) {
            debug!(attempts, "gave up generating a solvable board");
            return BoardResult {
                board,
                attempts,
                success: false,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[i64]]) -> Board {
        Board::from_matrix(rows).unwrap()
    }

    #[test]
    fn test_classify_and_required_count() {
        let b = board(&[&[2, 0, 1], &[0, 0, 1]]);
        assert_eq!(b.classify(Coordinate::new(0, 0)), Cell::Start);
        assert_eq!(b.classify(Coordinate::new(0, 1)), Cell::Open);
        assert_eq!(b.classify(Coordinate::new(1, 2)), Cell::Blocked);
        assert_eq!(b.required_visit_count(), 4);
        assert_eq!(b.find_start().unwrap(), Coordinate::new(0, 0));
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let b = board(&[&[2, 0]]);
        assert_eq!(b.classify(Coordinate::new(0, 2)), Cell::Blocked);
        assert_eq!(b.classify(Coordinate::new(5, 0)), Cell::Blocked);
    }

    #[test]
    fn test_find_start_counts() {
        let none = board(&[&[0, 0], &[0, 1]]);
        assert_eq!(none.find_start(), Err(EngineError::NoStartFound { found: 0 }));
        let many = board(&[&[2, 2], &[0, 2]]);
        assert_eq!(many.find_start(), Err(EngineError::NoStartFound { found: 3 }));
    }

    #[test]
    fn test_shape_errors() {
        let empty: [&[i64]; 0] = [];
        assert_eq!(Board::from_matrix(&empty), Err(EngineError::EmptyBoard));
        let ragged: [&[i64]; 2] = [&[2, 0], &[0]];
        assert_eq!(
            Board::from_matrix(&ragged),
            Err(EngineError::RaggedRow { row: 1, expected: 2, found: 1 })
        );
        let bad_code: [&[i64]; 1] = [&[2, 3]];
        assert_eq!(
            Board::from_matrix(&bad_code),
            Err(EngineError::InvalidCell { row: 0, col: 1, value: 3 })
        );
    }

    #[test]
    fn test_from_json_and_back() {
        let b = Board::from_json(r#"{"board": [[2, 0], [1, 0]]}"#).unwrap();
        assert_eq!(b.to_matrix(), vec![vec![2, 0], vec![1, 0]]);
        assert!(matches!(Board::from_json(r#"{"rows": []}"#), Err(EngineError::Json(_))));
    }

    #[test]
    fn test_validate_for_level() {
        let mut rows = vec![vec![0i64; 5]; 5];
        rows[2][3] = 2;
        let b = Board::from_matrix(&rows).unwrap();
        assert!(b.validate_for_level(Level::Beginner).is_ok());
        assert!(matches!(
            b.validate_for_level(Level::Easy),
            Err(EngineError::DimensionMismatch { expected_rows: 8, expected_cols: 6, .. })
        ));

        rows[0][0] = 2;
        let two_starts = Board::from_matrix(&rows).unwrap();
        assert_eq!(
            two_starts.validate_for_level(Level::Beginner),
            Err(EngineError::NoStartFound { found: 2 })
        );
    }

    #[test]
    fn test_neighbors_skip_blocked_and_edges() {
        let b = board(&[&[2, 1], &[0, 0]]);
        let n: Vec<_> = b.neighbors(Coordinate::new(0, 0)).collect();
        assert_eq!(n, vec![Coordinate::new(1, 0)]);
        let n: Vec<_> = b.neighbors(Coordinate::new(1, 1)).collect();
        assert_eq!(n, vec![Coordinate::new(1, 0)]);
    }

    #[test]
    fn test_random_board_shape() {
        let mut rng = BoardRng::from_seed(42);
        for level in Level::ALL {
            let b = generate_random_board(level, &mut rng);
            let (rows, cols) = level.dimensions();
            assert_eq!((b.rows(), b.cols()), (rows, cols));
            assert!(b.find_start().is_ok());
            let blocked = b.coordinates().filter(|&c| b.classify(c) == Cell::Blocked).count();
            assert_eq!(blocked, rows * cols * 15 / 100);
            assert_eq!(b.required_visit_count(), rows * cols - blocked);
        }
    }

    #[test]
    fn test_generate_solvable_board_always_solvable() {
        let result = generate_solvable_board(Level::Beginner, 100, |_| true);
        assert!(result.success);
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn test_generate_solvable_board_never_solvable() {
        let result = generate_solvable_board(Level::Beginner, 10, |_| false);
        assert!(!result.success);
        assert_eq!(result.attempts, 10);
    }
}
