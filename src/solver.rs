//! Dot-Connect solver: the collaborator that produces replay sequences.
//!
//! Contains:
//! - A cheap pre-check that rejects obviously unsolvable boards
//! - Depth-first search (neighbours tried up, down, left, right)
//! - Greedy search (neighbours with the most onward moves tried first)
//! - Top-level `is_solvable()` used by board generation

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::board::Board;
use crate::config::SolverConfig;
use crate::error::{EngineError, Result};
use crate::types::{Cell, Coordinate};

/// Produces a full path for a board, first element the start cell.
pub trait Solver {
    fn solve(&self, board: &Board) -> Result<Vec<Coordinate>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    DepthFirst,
    Greedy,
}

// ─── Pre-check ──────────────────────────────────────────────────────────────

/// What the pre-check learned about a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precheck {
    pub start: Coordinate,
    pub required: usize,
}

/// Reject boards that cannot have a one-stroke path.
///
/// An open cell with no open neighbour can never be reached, and a path has
/// only one free end, so at most one open cell may be a dead end.
pub fn precheck(board: &Board) -> Result<Precheck> {
    let start = board.find_start()?;
    let mut dead_ends = 0usize;

    for c in board.coordinates() {
        if board.classify(c) != Cell::Open {
            continue;
        }
        match board.neighbors(c).count() {
            0 => return Err(EngineError::IsolatedCell(c)),
            1 => {
                dead_ends += 1;
                if dead_ends > 1 {
                    return Err(EngineError::TooManyDeadEnds);
                }
            }
            _ => {}
        }
    }

    Ok(Precheck {
        start,
        required: board.required_visit_count(),
    })
}

// ─── Search ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSolver {
    pub strategy: Strategy,
    pub max_expansions: u64,
}

impl PathSolver {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            strategy: config.strategy,
            max_expansions: config.max_expansions,
        }
    }
}

impl Default for PathSolver {
    fn default() -> Self {
        Self::new(&SolverConfig::default())
    }
}

impl Solver for PathSolver {
    #[instrument(skip(self, board), fields(strategy = ?self.strategy))]
    fn solve(&self, board: &Board) -> Result<Vec<Coordinate>> {
        let Precheck { start, required } = precheck(board)?;

        let mut search = Search {
            board,
            strategy: self.strategy,
            visited: vec![false; board.rows() * board.cols()],
            path: Vec::with_capacity(required),
            frames: Vec::with_capacity(required),
            required,
            expansions: 0,
            max_expansions: self.max_expansions,
        };

        if search.run(start)? {
            debug!(expansions = search.expansions, "solution found");
            Ok(search.path)
        } else {
            debug!(expansions = search.expansions, "search space exhausted");
            Err(EngineError::Unsolvable)
        }
    }
}

/// Untried moves out of one path cell. `frames[i]` belongs to `path[i]`.
struct Frame {
    candidates: Vec<Coordinate>,
    next: usize,
}

struct Search<'a> {
    board: &'a Board,
    strategy: Strategy,
    visited: Vec<bool>,
    path: Vec<Coordinate>,
    frames: Vec<Frame>,
    required: usize,
    expansions: u64,
    max_expansions: u64,
}

impl Search<'_> {
    #[inline(always)]
    fn index(&self, c: Coordinate) -> usize {
        c.row * self.board.cols() + c.col
    }

    fn open_neighbors(&self, c: Coordinate) -> Vec<Coordinate> {
        self.board
            .neighbors(c)
            .filter(|&n| !self.visited[self.index(n)])
            .collect()
    }

    /// Visit `c`; true once the path covers every required cell.
    fn enter(&mut self, c: Coordinate) -> Result<bool> {
        self.expansions += 1;
        if self.expansions > self.max_expansions {
            return Err(EngineError::SearchExhausted(self.max_expansions));
        }

        let idx = self.index(c);
        self.visited[idx] = true;
        self.path.push(c);

        if self.path.len() == self.required {
            return Ok(true);
        }

        let mut candidates = self.open_neighbors(c);
        if self.strategy == Strategy::Greedy {
            // Stable sort: ties keep up/down/left/right order.
            candidates.sort_by_key(|&n| std::cmp::Reverse(self.open_neighbors(n).len()));
        }
        self.frames.push(Frame { candidates, next: 0 });
        Ok(false)
    }

    /// Depth-first walk over an explicit stack, so path length never turns
    /// into call depth.
    fn run(&mut self, start: Coordinate) -> Result<bool> {
        if self.enter(start)? {
            return Ok(true);
        }

        while let Some(frame) = self.frames.last_mut() {
            match frame.candidates.get(frame.next).copied() {
                Some(next) => {
                    frame.next += 1;
                    if self.enter(next)? {
                        return Ok(true);
                    }
                }
                None => {
                    self.frames.pop();
                    if let Some(c) = self.path.pop() {
                        let idx = self.index(c);
                        self.visited[idx] = false;
                    }
                }
            }
        }
        Ok(false)
    }
}

/// Whether `board` has a one-stroke path, as far as the configured search can
/// tell within its budget.
pub fn is_solvable(board: &Board, config: &SolverConfig) -> bool {
    PathSolver::new(config).solve(board).is_ok()
}
