//! Central Basin Approach (CBA)
//!
//! The CBA lumps a drainage network's distributed storage into one reservoir
//! and runs a conservation-law recurrence against an inflow series to
//! estimate combined-sewer-overflow volume. It is the most basic form of the
//! approach: no per-CSO weighting and a single lumped basin.
//!
//! Pipeline:
//!
//! 1. `storage_below_threshold` integrates one storage curve up to a depth
//!    threshold (`integrator.rs`)
//! 2. `CentralBasin` sums per-node volumes into one system capacity
//!    (`capacity.rs`)
//! 3. `MassBalance` runs the overflow recurrence over an inflow series
//!    (`mass_balance.rs`)

pub mod capacity;
pub mod integrator;
pub mod mass_balance;

pub use capacity::CentralBasin;
pub use integrator::storage_below_threshold;
pub use mass_balance::{MassBalance, MassBalanceReport, OverflowAccounting};

use crate::model::network::ModelError;
use thiserror::Error;

/// Errors raised by the CBA engines
#[derive(Debug, Error)]
pub enum CbaError {
    /// Lookup or parse failure against the model definition
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(
        "Curve ends after {depth_span} m of depth, cannot integrate to threshold {threshold} m"
    )]
    CurveExhausted { threshold: f64, depth_span: f64 },

    #[error("Depth threshold must be non-negative and finite, got {0}")]
    InvalidThreshold(f64),

    #[error("Storage specs must not be empty")]
    EmptySpecs,

    #[error("Inflow series must not be empty")]
    EmptyInflow,

    #[error("System capacity must be non-negative and finite, got {0}")]
    InvalidCapacity(f64),

    #[error("Treatment throughput must be non-negative and finite, got {0}")]
    InvalidThroughput(f64),

    #[error("Time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
}
