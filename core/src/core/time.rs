//! Time management for the control loop
//!
//! The control loop operates in discrete steps of a fixed interval, regardless
//! of the hydraulic engine's internal numerical sub-stepping. This module
//! provides deterministic step counting and elapsed-time bookkeeping.

use serde::{Deserialize, Serialize};

/// Manages control-loop time in discrete steps of a fixed interval
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::ControlClock;
///
/// let mut clock = ControlClock::new(900.0); // one evaluation per 15 minutes
/// assert_eq!(clock.current_step(), 0);
///
/// clock.advance_step();
/// assert_eq!(clock.current_step(), 1);
/// assert_eq!(clock.elapsed_seconds(), 900.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlClock {
    /// Control steps completed since simulation start
    current_step: usize,
    /// Seconds between consecutive rule evaluations
    interval_seconds: f64,
}

impl ControlClock {
    /// Create a new ControlClock
    ///
    /// # Arguments
    /// * `interval_seconds` - Seconds between consecutive control steps
    ///
    /// # Example
    /// ```
    /// use drainage_simulator_core_rs::ControlClock;
    ///
    /// let clock = ControlClock::new(900.0);
    /// assert_eq!(clock.interval_seconds(), 900.0);
    /// ```
    pub fn new(interval_seconds: f64) -> Self {
        assert!(
            interval_seconds > 0.0 && interval_seconds.is_finite(),
            "interval_seconds must be positive and finite"
        );
        Self {
            current_step: 0,
            interval_seconds,
        }
    }

    /// Advance time by one control step
    pub fn advance_step(&mut self) {
        self.current_step += 1;
    }

    /// Get the number of completed control steps
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Get the control interval in seconds
    pub fn interval_seconds(&self) -> f64 {
        self.interval_seconds
    }

    /// Get elapsed simulation time in seconds
    ///
    /// # Example
    /// ```
    /// use drainage_simulator_core_rs::ControlClock;
    ///
    /// let mut clock = ControlClock::new(60.0);
    /// for _ in 0..10 {
    ///     clock.advance_step();
    /// }
    /// assert_eq!(clock.elapsed_seconds(), 600.0);
    /// ```
    pub fn elapsed_seconds(&self) -> f64 {
        self.current_step as f64 * self.interval_seconds
    }
}
