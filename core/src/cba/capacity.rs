//! Lumped system capacity
//!
//! Aggregates the usable volume of every specified storage node into one
//! scalar capacity, the single bucket the mass-balance recurrence draws on.

use crate::cba::integrator::storage_below_threshold;
use crate::cba::mass_balance::MassBalance;
use crate::cba::CbaError;
use crate::model::network::{DrainageModel, ModelError};
use crate::model::storage::{StorageGeometry, StorageSpec};

/// The lumped central basin: all specified storage collapsed into one volume
///
/// Construction resolves every storage spec against the model definition and
/// sums the per-node volumes. The build is all-or-nothing: if any spec fails
/// to resolve, no capacity is produced. Once built, the capacity is fixed for
/// the lifetime of the value.
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::{CentralBasin, DrainageModel, StorageSpec};
///
/// let model = DrainageModel::parse(
///     "[STORAGE]\ntank 0 3 0 FUNCTIONAL 200.0\n",
/// ).unwrap();
/// let basin = CentralBasin::from_model(&model, &[StorageSpec::new("tank", 1.5)]).unwrap();
/// assert_eq!(basin.capacity(), 300.0); // 1.5 m * 200 m2
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CentralBasin {
    /// Total available storage volume (m3) without CSOs occurring
    capacity: f64,
}

impl CentralBasin {
    /// Build the lumped capacity from a model definition and storage specs
    ///
    /// For each spec, a tabular node is integrated over its storage curve up
    /// to the spec's depth threshold; a prismatic node contributes
    /// `threshold * area` directly.
    ///
    /// # Errors
    ///
    /// * `CbaError::EmptySpecs` - no specs given
    /// * `CbaError::Model` - a node name resolves to zero or multiple rows,
    ///   or a referenced curve is missing
    /// * `CbaError::InvalidThreshold` - a negative or non-finite threshold
    /// * `CbaError::CurveExhausted` - a curve is too short for its threshold
    pub fn from_model(model: &DrainageModel, specs: &[StorageSpec]) -> Result<Self, CbaError> {
        if specs.is_empty() {
            return Err(CbaError::EmptySpecs);
        }

        let mut capacity = 0.0;
        for spec in specs {
            if !spec.depth_threshold.is_finite() || spec.depth_threshold < 0.0 {
                return Err(CbaError::InvalidThreshold(spec.depth_threshold));
            }

            let node = model.storage_node(&spec.node)?;
            let volume = match &node.geometry {
                StorageGeometry::Tabular { curve } => {
                    let table = model
                        .curve(curve)
                        .ok_or_else(|| ModelError::CurveNotFound(curve.clone()))?;
                    storage_below_threshold(table, spec.depth_threshold)?
                }
                StorageGeometry::Prismatic { area } => spec.depth_threshold * area,
            };
            capacity += volume;
        }

        Ok(Self { capacity })
    }

    /// Wrap an already-known capacity value
    ///
    /// # Errors
    ///
    /// * `CbaError::InvalidCapacity` - negative or non-finite capacity
    pub fn from_capacity(capacity: f64) -> Result<Self, CbaError> {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(CbaError::InvalidCapacity(capacity));
        }
        Ok(Self { capacity })
    }

    /// Total available storage volume (m3)
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Create a mass-balance simulator over this basin
    ///
    /// # Arguments
    ///
    /// * `throughput_capacity` - treatment-plant throughput (m3/s)
    /// * `time_step` - inflow reporting interval (s)
    pub fn mass_balance(
        &self,
        throughput_capacity: f64,
        time_step: f64,
    ) -> Result<MassBalance, CbaError> {
        MassBalance::new(self.capacity, throughput_capacity, time_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "\
[STORAGE]
tab_1   0  3  0  TABULAR     sc_1
flat_1  0  2  0  FUNCTIONAL  40.0

[CURVES]
sc_1  STORAGE  0.0  10.0
sc_1           1.0  20.0
sc_1           2.0  30.0
";

    #[test]
    fn test_mixed_geometry_sum() {
        let model = DrainageModel::parse(MODEL).unwrap();
        let specs = [
            StorageSpec::new("tab_1", 2.0),
            StorageSpec::new("flat_1", 1.0),
        ];
        let basin = CentralBasin::from_model(&model, &specs).unwrap();
        // tabular: (10+20)/2 + (20+30)/2 = 40; prismatic: 1.0 * 40 = 40
        assert_eq!(basin.capacity(), 80.0);
    }

    #[test]
    fn test_unknown_node_fails_whole_build() {
        let model = DrainageModel::parse(MODEL).unwrap();
        let specs = [
            StorageSpec::new("tab_1", 2.0),
            StorageSpec::new("nowhere", 1.0),
        ];
        let err = CentralBasin::from_model(&model, &specs).unwrap_err();
        assert!(matches!(
            err,
            CbaError::Model(ModelError::NodeNotFound(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn test_empty_specs_rejected() {
        let model = DrainageModel::parse(MODEL).unwrap();
        assert!(matches!(
            CentralBasin::from_model(&model, &[]).unwrap_err(),
            CbaError::EmptySpecs
        ));
    }
}
