//! Mass-balance overflow simulation
//!
//! One state variable, `available_storage`, starts at the system capacity
//! (the basin is empty of water, full of headroom) and is updated once per
//! inflow sample. When a sample's volume exceeds the treatment drain plus the
//! remaining headroom, the excess spills as CSO volume and the headroom is
//! committed entirely.
//!
//! # Critical Invariants
//!
//! 1. Every trajectory value lies in `[0, capacity]`
//! 2. Cumulative overflow never decreases
//! 3. `run` is a pure function of its arguments: identical inputs yield
//!    identical reports

use crate::cba::CbaError;
use serde::{Deserialize, Serialize};

/// Which storage value enters the overflow shortfall subtraction
///
/// The two readings of the overflow branch produce materially different
/// results and both are kept distinguishable on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowAccounting {
    /// Shortfall = `demand - drain - available_storage`, with the storage
    /// value read *before* it is zeroed. The spill is reduced by the headroom
    /// consumed in the same step.
    #[default]
    PreReset,

    /// Shortfall = `demand - drain`: the subtraction reads the storage
    /// variable *after* it has been reset to zero, so the spill is
    /// independent of how much headroom the step consumed.
    PostReset,
}

/// Result of one mass-balance run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassBalanceReport {
    /// Total CSO volume (m3) over all inflow samples
    pub cso_volume: f64,

    /// Available storage (m3) after the last sample
    pub final_available_storage: f64,

    /// Post-update available storage per sample; same length as the inflow
    pub storage_trajectory: Vec<f64>,
}

/// Mass-balance overflow simulator over a lumped storage capacity
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::MassBalance;
///
/// // 100 m3 of storage, no treatment, 1 s reporting interval
/// let sim = MassBalance::new(100.0, 0.0, 1.0).unwrap();
/// let report = sim.run(&[50.0]).unwrap();
/// assert_eq!(report.cso_volume, 0.0);
/// assert_eq!(report.storage_trajectory, vec![50.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassBalance {
    /// Lumped system capacity (m3)
    capacity: f64,

    /// Treatment-plant throughput (m3/s)
    throughput_capacity: f64,

    /// Inflow reporting interval (s), converts flows to volumes
    time_step: f64,

    /// Shortfall interpretation for the overflow branch
    accounting: OverflowAccounting,
}

impl MassBalance {
    /// Create a simulator, validating its configuration
    ///
    /// # Errors
    ///
    /// * `CbaError::InvalidCapacity` - negative or non-finite capacity
    /// * `CbaError::InvalidThroughput` - negative or non-finite throughput
    /// * `CbaError::InvalidTimeStep` - zero, negative, or non-finite step
    pub fn new(
        capacity: f64,
        throughput_capacity: f64,
        time_step: f64,
    ) -> Result<Self, CbaError> {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(CbaError::InvalidCapacity(capacity));
        }
        if !throughput_capacity.is_finite() || throughput_capacity < 0.0 {
            return Err(CbaError::InvalidThroughput(throughput_capacity));
        }
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(CbaError::InvalidTimeStep(time_step));
        }

        Ok(Self {
            capacity,
            throughput_capacity,
            time_step,
            accounting: OverflowAccounting::default(),
        })
    }

    /// Select the overflow shortfall interpretation (default: `PreReset`)
    pub fn with_accounting(mut self, accounting: OverflowAccounting) -> Self {
        self.accounting = accounting;
        self
    }

    /// Lumped system capacity (m3)
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Treatment throughput (m3/s)
    pub fn throughput_capacity(&self) -> f64 {
        self.throughput_capacity
    }

    /// Reporting interval (s)
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Active shortfall interpretation
    pub fn accounting(&self) -> OverflowAccounting {
        self.accounting
    }

    /// Run the recurrence over an inflow series (m3/s per sample)
    ///
    /// Starts from `available_storage = capacity` every call; the simulator
    /// keeps no state between runs.
    ///
    /// # Errors
    ///
    /// * `CbaError::EmptyInflow` - no samples given
    pub fn run(&self, inflow: &[f64]) -> Result<MassBalanceReport, CbaError> {
        if inflow.is_empty() {
            return Err(CbaError::EmptyInflow);
        }

        let drain = self.throughput_capacity * self.time_step;
        let mut available_storage = self.capacity;
        let mut cso_volume = 0.0;
        let mut storage_trajectory = Vec::with_capacity(inflow.len());

        for &inflow_t in inflow {
            let demand = inflow_t * self.time_step;

            if demand > drain + available_storage {
                // More inflow than the system can pass and store: every
                // remaining cubic metre of headroom is committed and the rest
                // spills. The shortfall subtraction reads the headroom either
                // before or after the reset, depending on the accounting mode.
                let shortfall = match self.accounting {
                    OverflowAccounting::PreReset => demand - drain - available_storage,
                    OverflowAccounting::PostReset => demand - drain,
                };
                available_storage = 0.0;
                cso_volume += shortfall;
            } else {
                // The in/out difference moves the headroom, capped at the
                // system capacity. The branch condition keeps it above zero.
                available_storage = (available_storage + drain - demand).min(self.capacity);
            }

            storage_trajectory.push(available_storage);
        }

        Ok(MassBalanceReport {
            cso_volume,
            final_available_storage: available_storage,
            storage_trajectory,
        })
    }
}
