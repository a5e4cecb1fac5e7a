//! WebAssembly path-tracing engine for the Dot-Connect puzzle.
//!
//! A board is a matrix of cell codes (0 = open, 1 = blocked, 2 = start). The
//! player draws one stroke from the start cell through every open cell. The
//! engine validates each extension, tracks the segments to render, detects the
//! win and replays solver output or a finished path on a fixed schedule.
//!
//! Coordinates cross the JS boundary as `[row, col]` pairs.

pub mod board;
pub mod config;
pub mod controller;
pub mod edges;
pub mod error;
pub mod path;
pub mod replay;
pub mod rng;
pub mod session;
pub mod solver;
pub mod types;
pub mod validator;

pub use board::Board;
pub use config::{EngineConfig, ReplayConfig, SolverConfig};
pub use controller::{Controller, ControllerState, Step, WinReport};
pub use edges::{segment_id, EdgeChange, EdgeRegistry, SegmentId};
pub use error::{EngineError, Result};
pub use path::Path;
pub use replay::{ReplayDriver, ReplayKind};
pub use session::Session;
pub use solver::{PathSolver, Solver, Strategy};
pub use types::{Cell, Coordinate, Level};
pub use validator::can_extend;

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::board::{self, Board};
    use crate::config::EngineConfig;
    use crate::error::EngineError;
    use crate::replay::ReplayKind;
    use crate::rng::BoardRng;
    use crate::session::Session;
    use crate::solver::{self, PathSolver, Solver};
    use crate::types::{Coordinate, Level};

    fn engine_error(err: EngineError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    fn read_config(config: JsValue) -> Result<EngineConfig, JsValue> {
        if config.is_undefined() || config.is_null() {
            Ok(EngineConfig::default())
        } else {
            Ok(serde_wasm_bindgen::from_value(config)?)
        }
    }

    fn read_board(board: JsValue) -> Result<Board, JsValue> {
        let matrix: Vec<Vec<i64>> = serde_wasm_bindgen::from_value(board)?;
        Board::from_matrix(&matrix).map_err(engine_error)
    }

    fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(value)?)
    }

    /// One puzzle session, driven by pointer events from the page.
    #[wasm_bindgen(js_name = "DotConnect")]
    pub struct WasmSession {
        session: Session,
        config: EngineConfig,
    }

    #[wasm_bindgen(js_class = "DotConnect")]
    impl WasmSession {
        /// `board` is a matrix of cell codes; `config` is optional.
        #[wasm_bindgen(constructor)]
        pub fn new(board: JsValue, config: JsValue) -> Result<WasmSession, JsValue> {
            let config = read_config(config)?;
            let board = read_board(board)?;
            let session = Session::new(board, config.replay).map_err(engine_error)?;
            Ok(WasmSession { session, config })
        }

        /// Register the win callback. It receives the final path length.
        #[wasm_bindgen(js_name = "onWin")]
        pub fn on_win(&mut self, callback: js_sys::Function) {
            self.session.set_win_handler(move |report| {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from(report.path_len as u32)) {
                    tracing::warn!(error = ?err, "win callback threw");
                }
            });
        }

        pub fn press(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
            to_js(&self.session.press(Coordinate::new(row, col)))
        }

        pub fn release(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
            to_js(&self.session.release(Coordinate::new(row, col)))
        }

        pub fn click(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
            to_js(&self.session.click(Coordinate::new(row, col)))
        }

        /// Right-click / "new board": clear the path and all segments.
        pub fn reset(&mut self) -> Result<JsValue, JsValue> {
            to_js(&self.session.reset())
        }

        /// Current path as `[[row, col], ...]`.
        pub fn path(&self) -> Result<JsValue, JsValue> {
            to_js(&self.session.path())
        }

        pub fn state(&self) -> Result<JsValue, JsValue> {
            to_js(&self.session.state())
        }

        #[wasm_bindgen(js_name = "isWon")]
        pub fn is_won(&self) -> bool {
            self.session.controller().is_won()
        }

        /// Segment changes since the last call: `[{kind: "shown"|"hidden", segment: "hr0-1"}]`.
        #[wasm_bindgen(js_name = "drainEdgeChanges")]
        pub fn drain_edge_changes(&mut self) -> Result<JsValue, JsValue> {
            to_js(&self.session.drain_edge_changes())
        }

        /// Start replaying `sequence` (`"animation"` or `"bot"`). False if a
        /// replay is already running.
        #[wasm_bindgen(js_name = "startReplay")]
        pub fn start_replay(&mut self, sequence: JsValue, kind: JsValue) -> Result<bool, JsValue> {
            let sequence: Vec<Coordinate> = serde_wasm_bindgen::from_value(sequence)?;
            let kind: ReplayKind = serde_wasm_bindgen::from_value(kind)?;
            Ok(self.session.start_replay(sequence, kind))
        }

        #[wasm_bindgen(js_name = "animateSolution")]
        pub fn animate_solution(&mut self) -> bool {
            self.session.animate_solution()
        }

        /// Solve the loaded board and replay the solution as the bot.
        #[wasm_bindgen(js_name = "solveAndReplay")]
        pub fn solve_and_replay(&mut self) -> Result<bool, JsValue> {
            let solver = PathSolver::new(&self.config.solver);
            self.session.solve_and_replay(&solver).map_err(engine_error)
        }

        /// Milliseconds to wait before `replayTick`, or `undefined` when idle.
        #[wasm_bindgen(js_name = "nextReplayDelayMs")]
        pub fn next_replay_delay_ms(&self) -> Option<u32> {
            self.session
                .next_replay_delay()
                .map(|d| d.as_millis().min(u32::MAX as u128) as u32)
        }

        #[wasm_bindgen(js_name = "replayTick")]
        pub fn replay_tick(&mut self) -> Result<JsValue, JsValue> {
            match self.session.tick_replay() {
                Some(step) => to_js(&step),
                None => Ok(JsValue::NULL),
            }
        }

        #[wasm_bindgen(js_name = "cancelReplay")]
        pub fn cancel_replay(&mut self) -> u32 {
            self.session.cancel_replay() as u32
        }
    }

    /// Solve a board matrix. Returns `[[row, col], ...]` or `null` when no
    /// solution exists.
    #[wasm_bindgen(js_name = "solveBoard")]
    pub fn wasm_solve_board(board: JsValue, config: JsValue) -> Result<JsValue, JsValue> {
        let config = read_config(config)?;
        let board = read_board(board)?;
        match PathSolver::new(&config.solver).solve(&board) {
            Ok(solution) => to_js(&solution),
            Err(EngineError::Unsolvable
                | EngineError::IsolatedCell(_)
                | EngineError::TooManyDeadEnds) => Ok(JsValue::NULL),
            Err(err) => Err(engine_error(err)),
        }
    }

    /// Parse board-file text (`{"board": [[...]]}`) into a cell matrix.
    #[wasm_bindgen(js_name = "parseBoardFile")]
    pub fn wasm_parse_board_file(text: &str) -> Result<JsValue, JsValue> {
        let board = Board::from_json(text).map_err(engine_error)?;
        to_js(&board.to_matrix())
    }

    /// Check a board matrix against a difficulty level. Throws with the reason
    /// when it does not fit.
    #[wasm_bindgen(js_name = "validateBoard")]
    pub fn wasm_validate_board(board: JsValue, level: &str) -> Result<(), JsValue> {
        let level: Level = level.parse().map_err(engine_error)?;
        read_board(board)?.validate_for_level(level).map_err(engine_error)
    }

    #[wasm_bindgen(js_name = "generateRandomBoard")]
    pub fn wasm_generate_random_board(level: &str) -> Result<JsValue, JsValue> {
        let level: Level = level.parse().map_err(engine_error)?;
        let board = board::generate_random_board(level, &mut BoardRng::new());
        to_js(&board.to_matrix())
    }

    /// Generate a board the solver can finish.
    /// Returns `{ success: bool, attempts: u32, board: number[][] }`.
    #[wasm_bindgen(js_name = "generateSolvableBoard")]
    pub fn wasm_generate_solvable_board(level: &str, config: JsValue) -> Result<JsValue, JsValue> {
        let level: Level = level.parse().map_err(engine_error)?;
        let config = read_config(config)?;
        let result = board::generate_solvable_board(level, config.max_generation_attempts, |b| {
            solver::is_solvable(b, &config.solver)
        });

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"success".into(), &result.success.into())?;
        js_sys::Reflect::set(&obj, &"attempts".into(), &result.attempts.into())?;
        js_sys::Reflect::set(&obj, &"board".into(), &to_js(&result.board.to_matrix())?)?;
        Ok(obj.into())
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "Dot-Connect engine ready".to_string()
    }
}
