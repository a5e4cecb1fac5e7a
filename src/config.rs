//! Engine configuration.
//!
//! Every field has a default, so `{}` (or no config at all from JS) is a valid
//! configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::replay::ReplayKind;
use crate::solver::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Delay between steps when animating a finished path.
    pub animation_delay_ms: u64,
    /// Delay between steps when replaying solver output.
    pub bot_delay_ms: u64,
}

impl ReplayConfig {
    pub fn delay_for(&self, kind: ReplayKind) -> Duration {
        match kind {
            ReplayKind::Animation => Duration::from_millis(self.animation_delay_ms),
            ReplayKind::Bot => Duration::from_millis(self.bot_delay_ms),
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            animation_delay_ms: 300,
            bot_delay_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: Strategy,
    /// Upper bound on search nodes expanded before giving up.
    pub max_expansions: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::DepthFirst,
            max_expansions: 5_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub replay: ReplayConfig,
    pub solver: SolverConfig,
    /// Random layouts tried by solvable board generation.
    pub max_generation_attempts: u32,
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            replay: ReplayConfig::default(),
            solver: SolverConfig::default(),
            max_generation_attempts: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.replay.delay_for(ReplayKind::Animation), Duration::from_millis(300));
        assert_eq!(config.replay.delay_for(ReplayKind::Bot), Duration::from_millis(50));
    }

    #[test]
    fn test_partial_override() {
        let config =
            EngineConfig::from_json(r#"{"replay": {"bot_delay_ms": 5}, "solver": {"strategy": "greedy"}}"#)
                .unwrap();
        assert_eq!(config.replay.bot_delay_ms, 5);
        assert_eq!(config.replay.animation_delay_ms, 300);
        assert_eq!(config.solver.strategy, Strategy::Greedy);
        assert_eq!(config.solver.max_expansions, 5_000_000);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json("{ nope"),
            Err(crate::error::EngineError::Json(_))
        ));
    }
}
