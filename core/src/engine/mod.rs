//! External hydraulic engine contract
//!
//! The hydraulic simulation itself (depth/flow physics, routing, continuity
//! accounting) is an external collaborator. The control loop depends on it
//! only through the five-point contract below: advance by a control
//! interval, read a node depth, write an actuator target setting, enumerate
//! pumps and outfalls by role, and report an end-of-run routing summary.
//!
//! Engine failures are never caught by the control loop; they abort the run.

pub mod mock;

pub use mock::MockEngine;

use thiserror::Error;

/// Errors surfaced by a hydraulic engine implementation
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Node '{0}' not found in the hydraulic model")]
    NodeNotFound(String),

    #[error("Link '{0}' not found in the hydraulic model")]
    LinkNotFound(String),

    #[error("Hydraulic engine failure: {0}")]
    Failed(String),
}

/// End-of-run routing statistics, informational output only
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct RoutingSummary {
    /// Flow routing continuity error (percent)
    pub continuity_error_percent: f64,

    /// Total flooding volume reported by the engine (m3)
    pub flooding_volume: f64,
}

/// Contract between the control loop and an external hydraulic engine
///
/// The engine owns the physics; the loop owns the decisions. One `advance`
/// call integrates the hydraulics forward by the given interval and blocks
/// until done, so the loop's rule evaluation at step *n* always sees the
/// depths produced by the integration from step *n-1* to *n*.
pub trait HydraulicEngine {
    /// Advance the simulation by `interval_seconds`
    ///
    /// Returns `Some(elapsed_seconds)` (total simulation time after the
    /// step), or `None` when the simulation has ended.
    fn advance(&mut self, interval_seconds: f64) -> Result<Option<f64>, EngineError>;

    /// Current water depth (m) at a named node
    fn node_depth(&self, node: &str) -> Result<f64, EngineError>;

    /// Write an actuator's target setting in `[0, 1]`
    ///
    /// The setting applies to the engine's next integration interval.
    fn set_target_setting(&mut self, link: &str, setting: f64) -> Result<(), EngineError>;

    /// Identifiers of all pump-like (controllable) links
    fn pump_ids(&self) -> Vec<String>;

    /// Identifiers of all outfall nodes
    fn outfall_ids(&self) -> Vec<String>;

    /// Instantaneous total inflow (m3/s) into a named outfall
    fn outfall_inflow(&self, node: &str) -> Result<f64, EngineError>;

    /// Routing continuity and flooding statistics for the run so far
    fn routing_summary(&self) -> RoutingSummary;
}
