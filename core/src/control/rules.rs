//! Rule table data model
//!
//! A `RuleTable` maps each actuator to an ordered list of threshold rules.
//! Order is significant: later matching rules overwrite earlier ones within
//! a single evaluation. Tables can be authored in code or loaded from the
//! JSON 4-tuple form `{actuator: [[node, threshold, setting, "higher"], …]}`.

use crate::control::ControlError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Which side of the threshold fires a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Fires when the observed depth is strictly above the threshold
    Above,
    /// Fires when the observed depth is at or below the threshold
    AtOrBelow,
}

impl FromStr for Direction {
    type Err = ControlError;

    /// Parse the wire form: `"higher"` or `"lower"`, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("higher") {
            Ok(Direction::Above)
        } else if s.eq_ignore_ascii_case("lower") {
            Ok(Direction::AtOrBelow)
        } else {
            Err(ControlError::UnknownDirection(s.to_string()))
        }
    }
}

/// One threshold rule: observed node, threshold depth, target setting
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::{ControlRule, Direction};
///
/// let on = ControlRule::new("j_10", 0.2, 1.0, Direction::Above);
/// assert!(on.matches(0.5));
/// assert!(!on.matches(0.2)); // strictly above
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRule {
    /// Node whose depth the rule observes
    pub observed_node: String,

    /// Depth threshold (m)
    pub threshold: f64,

    /// Target setting staged on a match: 0 = off, 1 = full capacity,
    /// in between = fraction of the pump curve
    pub target_setting: f64,

    /// Side of the threshold that fires the rule
    pub direction: Direction,
}

impl ControlRule {
    /// Convenience constructor
    pub fn new(
        observed_node: impl Into<String>,
        threshold: f64,
        target_setting: f64,
        direction: Direction,
    ) -> Self {
        Self {
            observed_node: observed_node.into(),
            threshold,
            target_setting,
            direction,
        }
    }

    /// True if the observed depth fires this rule
    pub fn matches(&self, depth: f64) -> bool {
        match self.direction {
            Direction::Above => depth > self.threshold,
            Direction::AtOrBelow => depth <= self.threshold,
        }
    }
}

/// Wire form of one rule: `(node, threshold, setting, direction_string)`
pub type RuleSpec = (String, f64, f64, String);

/// Ordered rule lists per actuator
///
/// # Example
/// ```
/// use drainage_simulator_core_rs::{ControlRule, Direction, RuleTable};
///
/// let mut table = RuleTable::new();
/// table.insert("p10_1", vec![
///     ControlRule::new("j_10", 0.2, 1.0, Direction::Above),
///     ControlRule::new("j_10", 0.2, 0.0, Direction::AtOrBelow),
/// ]).unwrap();
/// assert!(table.contains("p10_1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleTable {
    rules: HashMap<String, Vec<ControlRule>>,
}

impl RuleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rule list for one actuator, validating each rule
    ///
    /// # Errors
    ///
    /// * `ControlError::EmptyRuleList` - the list is empty
    /// * `ControlError::SettingOutOfRange` - a setting outside `[0, 1]`
    /// * `ControlError::InvalidThreshold` - a NaN or infinite threshold
    pub fn insert(
        &mut self,
        actuator: impl Into<String>,
        rules: Vec<ControlRule>,
    ) -> Result<(), ControlError> {
        let actuator = actuator.into();
        if rules.is_empty() {
            return Err(ControlError::EmptyRuleList(actuator));
        }
        for rule in &rules {
            if !rule.threshold.is_finite() {
                return Err(ControlError::InvalidThreshold {
                    actuator: actuator.clone(),
                    threshold: rule.threshold,
                });
            }
            if !rule.target_setting.is_finite()
                || !(0.0..=1.0).contains(&rule.target_setting)
            {
                return Err(ControlError::SettingOutOfRange {
                    actuator: actuator.clone(),
                    setting: rule.target_setting,
                });
            }
        }
        self.rules.insert(actuator, rules);
        Ok(())
    }

    /// Build a table from the wire form, actuator -> list of 4-tuples
    ///
    /// # Errors
    ///
    /// All `insert` errors, plus `ControlError::UnknownDirection` for a
    /// direction string other than `"higher"`/`"lower"`, and
    /// `ControlError::EmptyRuleTable` when the mapping itself is empty.
    pub fn from_spec(spec: HashMap<String, Vec<RuleSpec>>) -> Result<Self, ControlError> {
        if spec.is_empty() {
            return Err(ControlError::EmptyRuleTable);
        }
        let mut table = Self::new();
        for (actuator, entries) in spec {
            let rules = entries
                .into_iter()
                .map(|(node, threshold, setting, direction)| {
                    Ok(ControlRule::new(
                        node,
                        threshold,
                        setting,
                        Direction::from_str(&direction)?,
                    ))
                })
                .collect::<Result<Vec<_>, ControlError>>()?;
            table.insert(actuator, rules)?;
        }
        Ok(table)
    }

    /// Build a table from the JSON wire form
    ///
    /// # Example
    /// ```
    /// use drainage_simulator_core_rs::RuleTable;
    ///
    /// let table = RuleTable::from_json(r#"{
    ///     "p10_1": [["j_10", 0.2, 1.0, "higher"],
    ///               ["j_10", 0.2, 0.0, "lower"]]
    /// }"#).unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ControlError> {
        let spec: HashMap<String, Vec<RuleSpec>> =
            serde_json::from_str(json).map_err(|e| ControlError::Json(e.to_string()))?;
        Self::from_spec(spec)
    }

    /// Ordered rule list for one actuator
    pub fn rules_for(&self, actuator: &str) -> Option<&[ControlRule]> {
        self.rules.get(actuator).map(Vec::as_slice)
    }

    /// True if the actuator has a rule entry
    pub fn contains(&self, actuator: &str) -> bool {
        self.rules.contains_key(actuator)
    }

    /// Actuators with rule entries (arbitrary order)
    pub fn actuators(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// All (actuator, rules) entries (arbitrary order)
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[ControlRule])> {
        self.rules
            .iter()
            .map(|(actuator, rules)| (actuator.as_str(), rules.as_slice()))
    }

    /// Number of actuators with rule entries
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no actuator has rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
