//! Replay Driver: feeds a precomputed coordinate sequence into the
//! controller one step per fixed delay.
//!
//! The schedule is explicit. A host asks for `next_delay()`, waits, then
//! calls `tick()`; `drive()` does the same loop over an async sleep. Dropping
//! the loop or calling `cancel()` abandons the remaining steps with no
//! rollback of segments already shown.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ReplayConfig;
use crate::controller::{Controller, Step};
use crate::types::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayKind {
    /// Re-draw a path the player already completed.
    Animation,
    /// Play out solver output.
    Bot,
}

impl ReplayKind {
    /// Only bot replays report a win; an animation re-draws one already
    /// reported.
    pub fn notifies_win(self) -> bool {
        matches!(self, ReplayKind::Bot)
    }
}

#[derive(Debug)]
struct ActiveReplay {
    kind: ReplayKind,
    steps: VecDeque<Coordinate>,
}

#[derive(Debug)]
pub struct ReplayDriver {
    config: ReplayConfig,
    active: Option<ActiveReplay>,
}

impl ReplayDriver {
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn kind(&self) -> Option<ReplayKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    /// Steps still scheduled.
    pub fn remaining(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.steps.len())
    }

    /// Reset the controller and schedule `sequence`.
    ///
    /// The first element stands for the start cell and is skipped, unless the
    /// controller has no start, in which case it seeds the path. Returns
    /// false without touching anything when a replay is already running.
    pub fn start(&mut self, controller: &mut Controller, sequence: Vec<Coordinate>, kind: ReplayKind) -> bool {
        if self.is_active() {
            debug!(?kind, "replay already in progress, request ignored");
            return false;
        }

        controller.reset();
        let mut steps = VecDeque::from(sequence);
        match (controller.start(), steps.pop_front()) {
            (Some(start), Some(first)) if first != start => {
                warn!(%start, %first, "replay sequence does not begin at the start cell");
            }
            (None, Some(first)) => {
                controller.apply_trusted(first, kind.notifies_win());
            }
            _ => {}
        }

        info!(?kind, steps = steps.len(), "replay started");
        if steps.is_empty() {
            return true;
        }
        controller.set_replaying(true);
        self.active = Some(ActiveReplay { kind, steps });
        true
    }

    /// Delay to wait before the next `tick`, `None` once nothing is scheduled.
    pub fn next_delay(&self) -> Option<Duration> {
        self.active
            .as_ref()
            .map(|active| self.config.delay_for(active.kind))
    }

    /// Apply the next scheduled coordinate.
    pub fn tick(&mut self, controller: &mut Controller) -> Option<Step> {
        let active = self.active.as_mut()?;
        let kind = active.kind;
        let cell = active.steps.pop_front()?;
        let step = controller.apply_trusted(cell, kind.notifies_win());

        if active.steps.is_empty() {
            self.active = None;
            controller.set_replaying(false);
            info!(?kind, "replay finished");
        }
        Some(step)
    }

    /// Abandon the remaining steps and hand input back to the player.
    /// Returns how many steps were dropped.
    pub fn cancel(&mut self, controller: &mut Controller) -> usize {
        controller.set_replaying(false);
        match self.active.take() {
            Some(active) => {
                debug!(dropped = active.steps.len(), "replay cancelled");
                active.steps.len()
            }
            None => 0,
        }
    }

    /// Run the schedule to the end, awaiting `sleep(delay)` before each step.
    /// Returns the last step applied.
    pub async fn drive<F, Fut>(&mut self, controller: &mut Controller, mut sleep: F) -> Option<Step>
    where
        F: FnMut(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut last = None;
        while let Some(delay) = self.next_delay() {
            sleep(delay).await;
            last = self.tick(controller).or(last);
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::controller::WinReport;
    use crate::edges::SegmentId;

    fn c(row: usize, col: usize) -> Coordinate {
        Coordinate::new(row, col)
    }

    fn square() -> Controller {
        Controller::new(Board::from_matrix(&[[2i64, 0], [0, 0]]).unwrap())
    }

    fn solution() -> Vec<Coordinate> {
        vec![c(0, 0), c(0, 1), c(1, 1), c(1, 0)]
    }

    #[test]
    fn test_schedule_steps_one_at_a_time() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        assert!(driver.start(&mut ctl, solution(), ReplayKind::Bot));
        assert!(ctl.is_replaying());
        assert_eq!(driver.remaining(), 3);
        assert_eq!(driver.next_delay(), Some(Duration::from_millis(50)));

        assert!(matches!(driver.tick(&mut ctl), Some(Step::Extended { .. })));
        assert_eq!(ctl.path().len(), 2);
        driver.tick(&mut ctl);
        assert_eq!(driver.tick(&mut ctl), Some(Step::Won(WinReport { path_len: 4 })));

        assert!(!driver.is_active());
        assert!(!ctl.is_replaying());
        assert_eq!(driver.next_delay(), None);
        assert_eq!(driver.tick(&mut ctl), None);
    }

    #[test]
    fn test_animation_uses_its_own_delay() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        driver.start(&mut ctl, solution(), ReplayKind::Animation);
        assert_eq!(driver.next_delay(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_second_request_ignored_while_active() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        assert!(driver.start(&mut ctl, solution(), ReplayKind::Bot));
        driver.tick(&mut ctl);
        assert!(!driver.start(&mut ctl, vec![c(0, 0), c(1, 0)], ReplayKind::Animation));
        assert_eq!(driver.kind(), Some(ReplayKind::Bot));
        assert_eq!(ctl.path().len(), 2);
    }

    #[test]
    fn test_cancel_keeps_partial_segments() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        driver.start(&mut ctl, solution(), ReplayKind::Bot);
        driver.tick(&mut ctl);
        assert_eq!(driver.cancel(&mut ctl), 2);
        assert!(!ctl.is_replaying());
        assert_eq!(ctl.edges().active(), &[SegmentId::Horizontal { row: 0, col: 0 }]);
        assert_eq!(driver.cancel(&mut ctl), 0);
    }

    #[test]
    fn test_malformed_sequence_never_panics() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        driver.start(&mut ctl, vec![c(0, 0), c(1, 1), c(7, 7), c(1, 1)], ReplayKind::Bot);
        while driver.tick(&mut ctl).is_some() {}
        assert_eq!(ctl.path().len(), 4);
        assert!(ctl.edges().is_empty());
        assert!(!ctl.is_won());
    }

    #[test]
    fn test_single_element_sequence_finishes_immediately() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        assert!(driver.start(&mut ctl, vec![c(0, 0)], ReplayKind::Bot));
        assert!(!driver.is_active());
        assert!(!ctl.is_replaying());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_waits_between_steps() {
        let mut ctl = square();
        let mut driver = ReplayDriver::new(ReplayConfig::default());
        driver.start(&mut ctl, solution(), ReplayKind::Animation);

        let began = tokio::time::Instant::now();
        let last = driver.drive(&mut ctl, tokio::time::sleep).await;
        assert_eq!(last, Some(Step::Won(WinReport { path_len: 4 })));
        assert!(began.elapsed() >= Duration::from_millis(900));
        assert_eq!(ctl.edges().len(), 3);
    }
}
