//! PyO3 wrapper for the Central Basin Approach
//!
//! This module provides the Python interface to the CBA engines.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::cba::CentralBasin as RustCentralBasin;
use crate::model::network::DrainageModel;
use crate::model::storage::StorageSpec;

/// Python wrapper over a parsed model definition and the CBA engines
///
/// # Example (from Python)
///
/// ```python
/// from drainage_simulator_core_rs import CentralBasin
///
/// cba = CentralBasin.from_file("catchment.inp")
/// storage = [("tank_1", 1.5), ("tank_2", 2.0)]
/// capacity = cba.capacity(storage)
/// cso, final_storage, trajectory = cba.run(storage, 0.5, inflow, 900.0)
/// ```
#[pyclass(name = "CentralBasin")]
pub struct PyCentralBasin {
    model: DrainageModel,
}

#[pymethods]
impl PyCentralBasin {
    /// Parse a model definition file
    #[staticmethod]
    fn from_file(path: &str) -> PyResult<Self> {
        let model = DrainageModel::from_path(path)
            .map_err(|e| PyValueError::new_err(format!("Failed to load model: {}", e)))?;
        Ok(Self { model })
    }

    /// Parse a model definition from text
    #[staticmethod]
    fn from_text(text: &str) -> PyResult<Self> {
        let model = DrainageModel::parse(text)
            .map_err(|e| PyValueError::new_err(format!("Failed to parse model: {}", e)))?;
        Ok(Self { model })
    }

    /// Lumped system capacity (m3) for `[(node, depth_threshold), ...]`
    fn capacity(&self, storage: Vec<(String, f64)>) -> PyResult<f64> {
        Ok(self.basin(&storage)?.capacity())
    }

    /// Run the mass-balance simulation
    ///
    /// Returns `(cso_volume, final_available_storage, storage_trajectory)`.
    fn run(
        &self,
        storage: Vec<(String, f64)>,
        wwtp_capacity: f64,
        inflow: Vec<f64>,
        time_step: f64,
    ) -> PyResult<(f64, f64, Vec<f64>)> {
        let basin = self.basin(&storage)?;
        let report = basin
            .mass_balance(wwtp_capacity, time_step)
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .run(&inflow)
            .map_err(|e| PyRuntimeError::new_err(format!("Mass balance run failed: {}", e)))?;
        Ok((
            report.cso_volume,
            report.final_available_storage,
            report.storage_trajectory,
        ))
    }
}

impl PyCentralBasin {
    fn basin(&self, storage: &[(String, f64)]) -> PyResult<RustCentralBasin> {
        let specs: Vec<StorageSpec> = storage
            .iter()
            .map(|(node, threshold)| StorageSpec::new(node.clone(), *threshold))
            .collect();
        RustCentralBasin::from_model(&self.model, &specs)
            .map_err(|e| PyValueError::new_err(format!("Failed to build capacity: {}", e)))
    }
}
