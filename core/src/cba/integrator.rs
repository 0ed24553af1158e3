//! Storage curve volume integration
//!
//! Converts a depth/area table into the volume stored below a depth
//! threshold, by trapezoidal accumulation over consecutive sample pairs.

use crate::cba::CbaError;
use crate::model::curve::VolumeCurve;

/// Volume stored below `depth_threshold`, by trapezoidal integration
///
/// Walks consecutive sample pairs while the running cumulative depth is below
/// the threshold, adding `((a0 + a1) / 2) * (d1 - d0)` per interval. The walk
/// advances by whole intervals: when the threshold falls strictly inside an
/// interval, that interval is still charged at full width, so the result
/// over-estimates the true volume by up to one interval's contribution.
///
/// # Errors
///
/// * `CbaError::InvalidThreshold` - threshold negative or not finite
/// * `CbaError::CurveExhausted` - the curve ends before the cumulative depth
///   reaches the threshold
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::{storage_below_threshold, VolumeCurve};
///
/// // Constant area of 100 m2 over 2 m of depth
/// let curve = VolumeCurve::new(vec![(0.0, 100.0), (2.0, 100.0)]).unwrap();
/// assert_eq!(storage_below_threshold(&curve, 0.0).unwrap(), 0.0);
/// assert_eq!(storage_below_threshold(&curve, 2.0).unwrap(), 200.0);
/// ```
pub fn storage_below_threshold(
    curve: &VolumeCurve,
    depth_threshold: f64,
) -> Result<f64, CbaError> {
    if !depth_threshold.is_finite() || depth_threshold < 0.0 {
        return Err(CbaError::InvalidThreshold(depth_threshold));
    }

    let mut covered = 0.0;
    let mut volume = 0.0;
    let mut index = 0;

    while covered < depth_threshold {
        let (lower, upper) = match (curve.sample(index), curve.sample(index + 1)) {
            (Some(lower), Some(upper)) => (lower, upper),
            _ => {
                return Err(CbaError::CurveExhausted {
                    threshold: depth_threshold,
                    depth_span: curve.depth_span(),
                })
            }
        };

        let width = upper.depth - lower.depth;
        volume += 0.5 * (lower.area + upper.area) * width;
        covered += width;
        index += 1;
    }

    Ok(volume)
}
