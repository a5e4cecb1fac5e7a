//! A puzzle session: one board, its controller and its replay driver.
//!
//! This is the unit an input adapter owns. Board problems surface here, before
//! any interaction is possible.

use std::time::Duration;

use tracing::{info, instrument};

use crate::board::Board;
use crate::config::ReplayConfig;
use crate::controller::{Controller, ControllerState, Step, WinReport};
use crate::edges::EdgeChange;
use crate::error::Result;
use crate::replay::{ReplayDriver, ReplayKind};
use crate::solver::Solver;
use crate::types::Coordinate;

#[derive(Debug)]
pub struct Session {
    controller: Controller,
    replay: ReplayDriver,
}

impl Session {
    /// Load `board`. Fails with `NoStartFound` unless it has exactly one
    /// start cell.
    #[instrument(skip(board, replay_config), fields(rows = board.rows(), cols = board.cols()))]
    pub fn new(board: Board, replay_config: ReplayConfig) -> Result<Self> {
        let start = board.find_start()?;
        info!(%start, required = board.required_visit_count(), "board loaded");
        Ok(Self {
            controller: Controller::new(board),
            replay: ReplayDriver::new(replay_config),
        })
    }

    pub fn set_win_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&WinReport) + 'static,
    {
        self.controller.set_win_handler(handler);
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn board(&self) -> &Board {
        self.controller.board()
    }

    pub fn path(&self) -> &[Coordinate] {
        self.controller.path().as_slice()
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn press(&mut self, cell: Coordinate) -> Step {
        self.controller.press(cell)
    }

    pub fn release(&mut self, cell: Coordinate) -> Step {
        self.controller.release(cell)
    }

    pub fn click(&mut self, cell: Coordinate) -> Step {
        self.controller.click(cell)
    }

    /// Clear the path and every segment, abandoning any running replay.
    pub fn reset(&mut self) -> Step {
        self.replay.cancel(&mut self.controller);
        self.controller.reset()
    }

    /// Replay `sequence`. False if a replay is already running.
    pub fn start_replay(&mut self, sequence: Vec<Coordinate>, kind: ReplayKind) -> bool {
        self.replay.start(&mut self.controller, sequence, kind)
    }

    /// Re-draw the current path step by step with the animation delay.
    pub fn animate_solution(&mut self) -> bool {
        let sequence = self.controller.path().to_vec();
        self.start_replay(sequence, ReplayKind::Animation)
    }

    /// Ask `solver` for a solution and replay it as the bot. Ok(false) when a
    /// replay is already running.
    pub fn solve_and_replay(&mut self, solver: &dyn Solver) -> Result<bool> {
        if self.replay.is_active() {
            return Ok(false);
        }
        let solution = solver.solve(self.controller.board())?;
        Ok(self.start_replay(solution, ReplayKind::Bot))
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_active()
    }

    pub fn next_replay_delay(&self) -> Option<Duration> {
        self.replay.next_delay()
    }

    pub fn tick_replay(&mut self) -> Option<Step> {
        self.replay.tick(&mut self.controller)
    }

    pub fn cancel_replay(&mut self) -> usize {
        self.replay.cancel(&mut self.controller)
    }

    /// Run the active replay to completion over an async sleep.
    pub async fn drive_replay<F, Fut>(&mut self, sleep: F) -> Option<Step>
    where
        F: FnMut(Duration) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        self.replay.drive(&mut self.controller, sleep).await
    }

    /// Segment changes since the last call, for the renderer.
    pub fn drain_edge_changes(&mut self) -> Vec<EdgeChange> {
        self.controller.edges_mut().drain_changes()
    }
}
