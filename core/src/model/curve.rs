//! Storage curve model
//!
//! A storage node's cross-section is described by an ordered table of
//! (depth, area) samples. The table is validated on construction and
//! immutable afterwards; the CBA integrator consumes it pairwise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building a volume curve
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("Curve must contain at least one (depth, area) sample")]
    Empty,

    #[error("Curve depths must be strictly increasing: sample {index} has depth {depth}, previous depth {previous}")]
    NonIncreasingDepth {
        index: usize,
        depth: f64,
        previous: f64,
    },

    #[error("Curve sample {index} is not finite: depth {depth}, area {area}")]
    NonFiniteSample { index: usize, depth: f64, area: f64 },

    #[error("Curve sample {index} has negative area {area}")]
    NegativeArea { index: usize, area: f64 },
}

/// One (depth, area) sample of a storage curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    /// Depth above the node invert (m)
    pub depth: f64,
    /// Wetted surface area at that depth (m2)
    pub area: f64,
}

/// Ordered depth/area table describing a storage node's cross-section
///
/// Depths are strictly increasing. Immutable once constructed.
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::VolumeCurve;
///
/// let curve = VolumeCurve::new(vec![(0.0, 100.0), (2.0, 150.0)]).unwrap();
/// assert_eq!(curve.len(), 2);
/// assert_eq!(curve.depth_span(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeCurve {
    samples: Vec<CurveSample>,
}

impl VolumeCurve {
    /// Build a curve from (depth, area) pairs, validating shape
    ///
    /// # Errors
    ///
    /// * `CurveError::Empty` - no samples given
    /// * `CurveError::NonIncreasingDepth` - depths not strictly increasing
    /// * `CurveError::NonFiniteSample` - NaN or infinite values
    /// * `CurveError::NegativeArea` - area below zero
    pub fn new(pairs: Vec<(f64, f64)>) -> Result<Self, CurveError> {
        if pairs.is_empty() {
            return Err(CurveError::Empty);
        }

        let mut samples = Vec::with_capacity(pairs.len());
        for (index, (depth, area)) in pairs.into_iter().enumerate() {
            if !depth.is_finite() || !area.is_finite() {
                return Err(CurveError::NonFiniteSample { index, depth, area });
            }
            if area < 0.0 {
                return Err(CurveError::NegativeArea { index, area });
            }
            if let Some(previous) = samples.last().map(|s: &CurveSample| s.depth) {
                if depth <= previous {
                    return Err(CurveError::NonIncreasingDepth {
                        index,
                        depth,
                        previous,
                    });
                }
            }
            samples.push(CurveSample { depth, area });
        }

        Ok(Self { samples })
    }

    /// Number of samples in the curve
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the curve has no samples (never holds for a constructed curve)
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, ordered by increasing depth
    pub fn samples(&self) -> &[CurveSample] {
        &self.samples
    }

    /// Sample at `index`, if present
    pub fn sample(&self, index: usize) -> Option<CurveSample> {
        self.samples.get(index).copied()
    }

    /// Total depth covered by the table (last depth minus first depth)
    pub fn depth_span(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.depth - first.depth,
            _ => 0.0,
        }
    }
}
