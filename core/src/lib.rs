//! Urban Drainage Simulator Core - Rust Engine
//!
//! Teaching-oriented analysis of urban drainage networks with deterministic
//! execution. Two algorithmic engines are provided:
//!
//! - **Central Basin Approach (CBA)**: a lumped single-reservoir mass-balance
//!   model estimating combined-sewer-overflow (CSO) volume from a storage
//!   capacity, a treatment-plant throughput, and an inflow time series.
//! - **Heuristic Real-Time Control (RTC)**: a threshold-rule engine driving
//!   pump settings inside a stepped hydraulic simulation, evaluated once per
//!   fixed control interval against live node depths.
//!
//! # Architecture
//!
//! - **core**: Control-step time management
//! - **model**: Domain types (VolumeCurve, DrainageModel, OutfallSeries, events)
//! - **cba**: Storage-curve integration and mass-balance simulation
//! - **control**: Rule tables and per-step hysteresis evaluation
//! - **engine**: External hydraulic engine contract (plus a scripted mock)
//! - **orchestrator**: Stepped control loop
//!
//! # Critical Invariants
//!
//! 1. Available storage always lies in `[0, capacity]`
//! 2. Cumulative overflow volume never decreases
//! 3. Rule evaluation is ordered: the last matching rule wins within a step
//! 4. Unmatched actuators keep their previous setting (hysteresis latching)

// Module declarations
pub mod cba;
pub mod control;
pub mod core;
pub mod engine;
pub mod model;
pub mod orchestrator;

// Re-exports for convenience
pub use cba::{
    storage_below_threshold, CbaError, CentralBasin, MassBalance, MassBalanceReport,
    OverflowAccounting,
};
pub use control::{ControlError, ControlRule, Direction, RuleTable};
pub use crate::core::time::ControlClock;
pub use engine::{EngineError, HydraulicEngine, MockEngine, RoutingSummary};
pub use model::{
    curve::VolumeCurve,
    event::{Event, EventLog},
    network::{DrainageModel, ModelError},
    series::OutfallSeries,
    storage::{StorageGeometry, StorageNode, StorageSpec},
};
pub use orchestrator::{ControlLoop, ControlLoopConfig, RunSummary, SimulationError, StepResult};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn drainage_simulator_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::central_basin::PyCentralBasin>()?;
    Ok(())
}
