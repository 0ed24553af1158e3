//! Recorded outfall inflow series
//!
//! The control loop appends one inflow value per outfall per control step,
//! together with the step's timestamp. Columns are index-aligned: for every
//! outfall, `values[i]` belongs to `times[i]`.

use serde::Serialize;

/// Per-outfall inflow history with a parallel timestamp sequence
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::OutfallSeries;
///
/// let mut series = OutfallSeries::new(vec!["cso_1".to_string(), "wwtp".to_string()]);
/// series.record(900.0, vec![0.0, 0.4]);
/// series.record(1800.0, vec![0.2, 0.5]);
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.values("cso_1"), Some(&[0.0, 0.2][..]));
/// assert_eq!(series.total_inflow("wwtp"), Some(0.9));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutfallSeries {
    /// Outfall identifiers, fixing column order
    outfalls: Vec<String>,

    /// Step timestamps (seconds of simulation time)
    times: Vec<f64>,

    /// One column per outfall, index-aligned with `times`
    values: Vec<Vec<f64>>,
}

impl OutfallSeries {
    /// Create an empty series for the given outfalls
    pub fn new(outfalls: Vec<String>) -> Self {
        let values = vec![Vec::new(); outfalls.len()];
        Self {
            outfalls,
            times: Vec::new(),
            values,
        }
    }

    /// Append one step: a timestamp plus one inflow value per outfall
    ///
    /// `inflows` must be ordered like the outfall list this series was
    /// created with.
    ///
    /// # Panics
    ///
    /// Panics if `inflows.len()` differs from the number of outfalls.
    pub fn record(&mut self, time: f64, inflows: Vec<f64>) {
        assert_eq!(
            inflows.len(),
            self.outfalls.len(),
            "one inflow value per outfall required"
        );
        self.times.push(time);
        for (column, inflow) in self.values.iter_mut().zip(inflows) {
            column.push(inflow);
        }
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True before the first step is recorded
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Outfall identifiers in column order
    pub fn outfall_ids(&self) -> &[String] {
        &self.outfalls
    }

    /// Step timestamps in seconds
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Recorded inflow column for one outfall
    pub fn values(&self, outfall: &str) -> Option<&[f64]> {
        let index = self.outfalls.iter().position(|id| id == outfall)?;
        Some(&self.values[index])
    }

    /// Sum of recorded inflow for one outfall
    pub fn total_inflow(&self, outfall: &str) -> Option<f64> {
        self.values(outfall).map(|column| column.iter().sum())
    }

    /// Summed inflow per outfall, in column order
    pub fn totals(&self) -> Vec<(String, f64)> {
        self.outfalls
            .iter()
            .zip(&self.values)
            .map(|(id, column)| (id.clone(), column.iter().sum()))
            .collect()
    }
}
