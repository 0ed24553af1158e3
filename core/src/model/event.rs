//! Event logging for control-run auditing.
//!
//! The control loop records significant state changes as events. The log
//! makes hysteresis behavior inspectable after a run: every effective
//! actuator change is captured with the step and time it occurred, and the
//! run's closing routing summary is appended at termination.

use serde::Serialize;

/// Control-run event capturing a state change.
///
/// All events include the control step for temporal ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    /// An actuator's target setting changed after rule evaluation
    SettingChanged {
        step: usize,
        time: f64,
        actuator: String,
        /// Setting in force before this step (None before the first write)
        previous: Option<f64>,
        new: f64,
    },

    /// The hydraulic engine signalled simulation end
    ///
    /// Carries the engine's own routing continuity error and flooding volume,
    /// informational output only.
    RunCompleted {
        steps: usize,
        continuity_error_percent: f64,
        flooding_volume: f64,
    },
}

impl Event {
    /// Control step this event belongs to
    pub fn step(&self) -> usize {
        match self {
            Event::SettingChanged { step, .. } => *step,
            Event::RunCompleted { steps, .. } => *steps,
        }
    }
}

/// Append-only log of control-run events
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::{Event, EventLog};
///
/// let mut log = EventLog::new();
/// log.log(Event::SettingChanged {
///     step: 3,
///     time: 2700.0,
///     actuator: "p10_1".to_string(),
///     previous: None,
///     new: 1.0,
/// });
/// assert_eq!(log.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of logged events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in logging order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Setting changes recorded for one actuator, in step order
    pub fn setting_changes_for(&self, actuator: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| {
                matches!(event, Event::SettingChanged { actuator: a, .. } if a == actuator)
            })
            .collect()
    }
}
