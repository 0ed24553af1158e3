//! Heuristic Real-Time Control rules
//!
//! Actuators (pumps and gate-like links) are driven by ordered threshold
//! rules against observed node depths. A rule list works as hysteresis
//! bands, not mutually exclusive cases: every matching rule overwrites the
//! pending setting for its actuator, so the *last* matching rule in the list
//! wins within one evaluation, and an actuator with no matching rule keeps
//! its previous setting (latching).
//!
//! - `rules.rs`: `Direction`, `ControlRule`, `RuleTable` and the JSON input
//!   form
//! - `evaluator.rs`: coverage precondition and per-step evaluation

pub mod evaluator;
pub mod rules;

pub use evaluator::{ensure_coverage, evaluate_step};
pub use rules::{ControlRule, Direction, RuleTable};

use std::collections::HashMap;
use thiserror::Error;

/// Observed node depths for one control step, node id -> depth (m)
///
/// Supplied anew every step by the hydraulic engine; never retained.
pub type DepthSnapshot = HashMap<String, f64>;

/// Actuator target settings, actuator id -> setting in `[0, 1]`
pub type ActuatorSettings = HashMap<String, f64>;

/// Errors raised while authoring or evaluating control rules
#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("Actuator '{0}' has no rules, please add an entry for it")]
    MissingRule(String),

    #[error("Actuator '{0}' has an empty rule list")]
    EmptyRuleList(String),

    #[error("Rule table must not be empty")]
    EmptyRuleTable,

    #[error("Unknown rule direction '{0}', expected \"higher\" or \"lower\"")]
    UnknownDirection(String),

    #[error("Rule for actuator '{actuator}' has target setting {setting}, expected a value in [0, 1]")]
    SettingOutOfRange { actuator: String, setting: f64 },

    #[error("Rule for actuator '{actuator}' has non-finite threshold {threshold}")]
    InvalidThreshold { actuator: String, threshold: f64 },

    #[error("Observed node '{node}' (rule for actuator '{actuator}') is missing from the depth snapshot")]
    ObservedNodeMissing { actuator: String, node: String },

    #[error("Rule input is not valid JSON: {0}")]
    Json(String),
}
