//! Interaction Controller: turns press/click/release/reset input into Path
//! and Edge Registry updates and fires the win signal.
//!
//! States are `Idle`, `Drawing` and `Won`. Manual input is ignored while a
//! replay owns the path and after a win until `reset()`.

use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::board::Board;
use crate::edges::{segment_id, EdgeRegistry, SegmentId};
use crate::path::Path;
use crate::types::{Cell, Coordinate};
use crate::validator::check_extend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ControllerState {
    Idle,
    /// A press is held; `anchor` is where it went down.
    Drawing { anchor: Coordinate },
    Won,
}

/// Reported to the win handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WinReport {
    pub path_len: usize,
}

/// What an input did, for adapters that re-render on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Step {
    Ignored,
    Pressed { cell: Coordinate },
    /// The release ended a drawing without extending the path.
    Released,
    Extended {
        cell: Coordinate,
        segment: Option<SegmentId>,
    },
    Won(WinReport),
    Reset,
}

type WinHandler = Box<dyn FnMut(&WinReport)>;

pub struct Controller {
    board: Board,
    start: Option<Coordinate>,
    path: Path,
    edges: EdgeRegistry,
    state: ControllerState,
    /// Terminal of the path, or the pressed cell while drawing.
    last_dot: Option<Coordinate>,
    replaying: bool,
    on_win: Option<WinHandler>,
}

impl Controller {
    /// Start a controller in `Idle` with the path at `[start]`.
    ///
    /// A board without a single start cell gives an empty path; sessions
    /// reject such boards before getting here.
    #[instrument(skip(board), fields(rows = board.rows(), cols = board.cols()))]
    pub fn new(board: Board) -> Self {
        let start = match board.find_start() {
            Ok(start) => Some(start),
            Err(err) => {
                warn!(%err, "no start cell resolved, path starts empty");
                None
            }
        };
        let edges = EdgeRegistry::new(board.rows(), board.cols());
        Self {
            board,
            start,
            path: Path::seeded(start),
            edges,
            state: ControllerState::Idle,
            last_dot: start,
            replaying: false,
            on_win: None,
        }
    }

    /// Install the callback fired once per win.
    pub fn set_win_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&WinReport) + 'static,
    {
        self.on_win = Some(Box::new(handler));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.start
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn edges(&self) -> &EdgeRegistry {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut EdgeRegistry {
        &mut self.edges
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn last_dot(&self) -> Option<Coordinate> {
        self.last_dot
    }

    pub fn is_won(&self) -> bool {
        self.state == ControllerState::Won
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub(crate) fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    fn accepts_manual_input(&self) -> bool {
        !self.replaying && self.state != ControllerState::Won
    }

    /// Pointer down on `cell`. Only records the anchor.
    #[instrument(skip(self))]
    pub fn press(&mut self, cell: Coordinate) -> Step {
        if !self.accepts_manual_input() || self.board.classify(cell) == Cell::Blocked {
            return Step::Ignored;
        }
        self.state = ControllerState::Drawing { anchor: cell };
        self.last_dot = Some(cell);
        Step::Pressed { cell }
    }

    /// Pointer up on `cell`. Without a held press this is a no-op.
    ///
    /// A release on a legal next cell appends it, shows its segment and
    /// evaluates the win rule.
    #[instrument(skip(self))]
    pub fn release(&mut self, cell: Coordinate) -> Step {
        if !self.accepts_manual_input() {
            return Step::Ignored;
        }
        let ControllerState::Drawing { .. } = self.state else {
            trace!("release without press");
            return Step::Ignored;
        };
        self.state = ControllerState::Idle;

        match self.commit(cell) {
            Step::Ignored => {
                self.last_dot = self.path.last().or(self.start);
                Step::Released
            }
            step => step,
        }
    }

    /// Click on `cell`: extend the path when the move is legal, otherwise do
    /// nothing. Independent of press/release.
    #[instrument(skip(self))]
    pub fn click(&mut self, cell: Coordinate) -> Step {
        if !self.accepts_manual_input() {
            return Step::Ignored;
        }
        self.commit(cell)
    }

    /// Validated append shared by `release` and `click`.
    fn commit(&mut self, cell: Coordinate) -> Step {
        if let Err(reason) = check_extend(&self.path, cell, &self.board) {
            debug!(%cell, %reason, "move rejected");
            return Step::Ignored;
        }

        let prev = self.path.last();
        self.path.push(cell);
        self.last_dot = Some(cell);

        let segment = prev.and_then(|prev| match segment_id(prev, cell) {
            Ok(id) => self.edges.register(id).then_some(id),
            Err(err) => {
                // The validator has already checked adjacency.
                debug_assert!(false, "{err}");
                error!(%err, "validated move has no segment");
                None
            }
        });

        self.evaluate_win(true)
            .unwrap_or(Step::Extended { cell, segment })
    }

    /// Append `cell` without adjacency or revisit checks.
    ///
    /// This is the trust boundary for solver-driven replay: the caller vouches
    /// for the sequence. A malformed step still appends, and its segment is
    /// skipped when it has no identifier on this board. Never fails, and
    /// never wins unless the path covers every required cell exactly once.
    pub fn apply_trusted(&mut self, cell: Coordinate, notify_win: bool) -> Step {
        if self.state == ControllerState::Won {
            return Step::Ignored;
        }

        let prev = self.path.last();
        self.path.push(cell);
        self.last_dot = Some(cell);

        let segment = match prev.map(|prev| segment_id(prev, cell)) {
            Some(Ok(id)) if self.edges.register(id) => Some(id),
            Some(Ok(id)) => {
                warn!(%id, "replay segment is not on the board");
                None
            }
            Some(Err(err)) => {
                warn!(%err, "replay step skips its segment");
                None
            }
            None => None,
        };

        self.evaluate_win(notify_win)
            .unwrap_or(Step::Extended { cell, segment })
    }

    /// A win needs every required cell on the path exactly once and nothing
    /// else on it.
    fn evaluate_win(&mut self, notify: bool) -> Option<Step> {
        let required = self.board.required_visit_count();
        if self.path.len() != required || !self.covers_required() {
            return None;
        }
        self.state = ControllerState::Won;
        let report = WinReport {
            path_len: self.path.len(),
        };
        info!(path_len = report.path_len, notify, "puzzle solved");
        if notify {
            if let Some(handler) = self.on_win.as_mut() {
                handler(&report);
            }
        }
        Some(Step::Won(report))
    }

    /// Full scan; callers check the length first.
    fn covers_required(&self) -> bool {
        self.path.distinct_len() == self.path.len()
            && self.path.iter().all(|c| self.board.classify(c).is_required())
    }

    /// Back to `Idle` with the path at `[start]` and every segment hidden.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Step {
        self.path = Path::seeded(self.start);
        self.edges.clear();
        self.state = ControllerState::Idle;
        self.last_dot = self.start;
        Step::Reset
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("start", &self.start)
            .field("path", &self.path.as_slice())
            .field("edges", &self.edges.active())
            .field("state", &self.state)
            .field("last_dot", &self.last_dot)
            .field("replaying", &self.replaying)
            .finish_non_exhaustive()
    }
}
