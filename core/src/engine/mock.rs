//! Scripted hydraulic engine for tests
//!
//! Plays back a fixed sequence of per-step depth and inflow observations and
//! records every setting written to it. Available in all builds to support
//! integration testing, but should only be used in test code.

use crate::engine::{EngineError, HydraulicEngine, RoutingSummary};
use std::collections::HashMap;

/// Observations the mock exposes for one control step
#[derive(Debug, Clone, Default)]
pub struct MockStep {
    /// Node depths visible after this step's integration
    pub depths: HashMap<String, f64>,

    /// Instantaneous inflow per outfall
    pub outfall_inflows: HashMap<String, f64>,
}

impl MockStep {
    /// Build a step from (node, depth) and (outfall, inflow) pairs
    pub fn new(depths: &[(&str, f64)], outfall_inflows: &[(&str, f64)]) -> Self {
        Self {
            depths: depths
                .iter()
                .map(|(id, v)| (id.to_string(), *v))
                .collect(),
            outfall_inflows: outfall_inflows
                .iter()
                .map(|(id, v)| (id.to_string(), *v))
                .collect(),
        }
    }
}

/// Scripted engine: fixed steps, recorded writes
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::engine::mock::{MockEngine, MockStep};
/// use drainage_simulator_core_rs::HydraulicEngine;
///
/// let mut engine = MockEngine::new(vec!["p1".to_string()], vec!["cso_1".to_string()])
///     .with_step(MockStep::new(&[("n1", 0.5)], &[("cso_1", 0.0)]));
///
/// assert_eq!(engine.advance(900.0).unwrap(), Some(900.0));
/// assert_eq!(engine.node_depth("n1").unwrap(), 0.5);
/// assert_eq!(engine.advance(900.0).unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    pumps: Vec<String>,
    outfalls: Vec<String>,
    steps: Vec<MockStep>,
    /// Steps already played back
    cursor: usize,
    elapsed_seconds: f64,
    /// Every write, in order: (step index at write time, link, setting)
    writes: Vec<(usize, String, f64)>,
    summary: RoutingSummary,
}

impl MockEngine {
    /// Create an engine exposing the given pumps and outfalls
    pub fn new(pumps: Vec<String>, outfalls: Vec<String>) -> Self {
        Self {
            pumps,
            outfalls,
            ..Self::default()
        }
    }

    /// Append one scripted step
    pub fn with_step(mut self, step: MockStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the routing summary reported at end of run
    pub fn with_summary(mut self, summary: RoutingSummary) -> Self {
        self.summary = summary;
        self
    }

    /// All recorded setting writes, in order
    pub fn writes(&self) -> &[(usize, String, f64)] {
        &self.writes
    }

    /// Recorded (step, setting) writes for one link
    pub fn writes_for(&self, link: &str) -> Vec<(usize, f64)> {
        self.writes
            .iter()
            .filter(|(_, id, _)| id == link)
            .map(|(step, _, setting)| (*step, *setting))
            .collect()
    }

    /// Last setting written to a link, if any
    pub fn current_setting(&self, link: &str) -> Option<f64> {
        self.writes_for(link).last().map(|(_, setting)| *setting)
    }

    fn current_step(&self) -> Result<&MockStep, EngineError> {
        if self.cursor == 0 {
            return Err(EngineError::Failed(
                "no step advanced yet, nothing to observe".to_string(),
            ));
        }
        Ok(&self.steps[self.cursor - 1])
    }
}

impl HydraulicEngine for MockEngine {
    fn advance(&mut self, interval_seconds: f64) -> Result<Option<f64>, EngineError> {
        if self.cursor >= self.steps.len() {
            return Ok(None);
        }
        self.cursor += 1;
        self.elapsed_seconds += interval_seconds;
        Ok(Some(self.elapsed_seconds))
    }

    fn node_depth(&self, node: &str) -> Result<f64, EngineError> {
        self.current_step()?
            .depths
            .get(node)
            .copied()
            .ok_or_else(|| EngineError::NodeNotFound(node.to_string()))
    }

    fn set_target_setting(&mut self, link: &str, setting: f64) -> Result<(), EngineError> {
        if !self.pumps.iter().any(|id| id == link) {
            return Err(EngineError::LinkNotFound(link.to_string()));
        }
        self.writes.push((self.cursor, link.to_string(), setting));
        Ok(())
    }

    fn pump_ids(&self) -> Vec<String> {
        self.pumps.clone()
    }

    fn outfall_ids(&self) -> Vec<String> {
        self.outfalls.clone()
    }

    fn outfall_inflow(&self, node: &str) -> Result<f64, EngineError> {
        self.current_step()?
            .outfall_inflows
            .get(node)
            .copied()
            .ok_or_else(|| EngineError::NodeNotFound(node.to_string()))
    }

    fn routing_summary(&self) -> RoutingSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_before_first_advance_fails() {
        let engine = MockEngine::new(vec![], vec![]);
        assert!(matches!(
            engine.node_depth("n1").unwrap_err(),
            EngineError::Failed(_)
        ));
    }

    #[test]
    fn test_write_to_unknown_link_fails() {
        let mut engine = MockEngine::new(vec!["p1".to_string()], vec![]);
        assert_eq!(
            engine.set_target_setting("p9", 1.0).unwrap_err(),
            EngineError::LinkNotFound("p9".to_string())
        );
    }

    #[test]
    fn test_playback_ends() {
        let mut engine = MockEngine::new(vec![], vec![])
            .with_step(MockStep::default())
            .with_step(MockStep::default());
        assert_eq!(engine.advance(60.0).unwrap(), Some(60.0));
        assert_eq!(engine.advance(60.0).unwrap(), Some(120.0));
        assert_eq!(engine.advance(60.0).unwrap(), None);
    }
}
