//! Orchestrator - the stepped control loop
//!
//! Drives an external hydraulic engine one control interval at a time,
//! evaluating the rule table against live depths and recording outfall
//! inflows.
//!
//! See `engine.rs` for full implementation.

pub mod engine;

pub use engine::{ControlLoop, ControlLoopConfig, RunSummary, SimulationError, StepResult};
