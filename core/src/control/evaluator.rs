//! Per-step rule evaluation
//!
//! Each control step, every actuator's rule list is walked in order against
//! the current depth snapshot. A matching rule stages its target setting;
//! later matches overwrite earlier ones. An actuator whose rules all miss
//! keeps whatever setting it had, which is where the hysteresis latching
//! comes from: settings only move when a threshold is crossed.

use crate::control::{ActuatorSettings, ControlError, DepthSnapshot, RuleTable};

/// Verify every live actuator has a rule entry before stepping begins
///
/// Making coverage a structural precondition keeps a missing rule from
/// surfacing halfway through a simulation as an incidental lookup failure.
///
/// # Errors
///
/// * `ControlError::MissingRule` - names the first uncovered actuator
pub fn ensure_coverage(table: &RuleTable, actuators: &[String]) -> Result<(), ControlError> {
    for actuator in actuators {
        if !table.contains(actuator) {
            return Err(ControlError::MissingRule(actuator.clone()));
        }
    }
    Ok(())
}

/// Evaluate one control step
///
/// Returns the settings for the step just evaluated: `current` with every
/// staged change applied. Actuators without a matching rule are carried over
/// unchanged; actuators absent from `current` that match no rule stay absent
/// (their engine-side setting remains in force).
///
/// # Errors
///
/// * `ControlError::ObservedNodeMissing` - a rule references a node the
///   snapshot does not contain
pub fn evaluate_step(
    table: &RuleTable,
    snapshot: &DepthSnapshot,
    current: &ActuatorSettings,
) -> Result<ActuatorSettings, ControlError> {
    let mut next = current.clone();

    for (actuator, rules) in table.entries() {
        let mut staged = None;
        for rule in rules {
            let depth = snapshot.get(&rule.observed_node).copied().ok_or_else(|| {
                ControlError::ObservedNodeMissing {
                    actuator: actuator.to_string(),
                    node: rule.observed_node.clone(),
                }
            })?;
            if rule.matches(depth) {
                // Last match wins within one evaluation
                staged = Some(rule.target_setting);
            }
        }
        if let Some(setting) = staged {
            next.insert(actuator.to_string(), setting);
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::rules::{ControlRule, Direction};
    use std::collections::HashMap;

    fn hysteresis_table() -> RuleTable {
        let mut table = RuleTable::new();
        table
            .insert(
                "p1",
                vec![
                    ControlRule::new("n1", 0.2, 1.0, Direction::Above),
                    ControlRule::new("n1", 0.2, 0.0, Direction::AtOrBelow),
                ],
            )
            .unwrap();
        table
    }

    fn snapshot(depth: f64) -> DepthSnapshot {
        HashMap::from([("n1".to_string(), depth)])
    }

    #[test]
    fn test_above_threshold_switches_on() {
        let table = hysteresis_table();
        let next = evaluate_step(&table, &snapshot(0.5), &HashMap::new()).unwrap();
        assert_eq!(next["p1"], 1.0);
    }

    #[test]
    fn test_last_match_wins() {
        let mut table = RuleTable::new();
        table
            .insert(
                "p1",
                vec![
                    ControlRule::new("n1", 0.2, 1.0, Direction::Above),
                    ControlRule::new("n1", 1.5, 0.5, Direction::Above),
                ],
            )
            .unwrap();
        // Depth 2.0 matches both bands; the later rule's setting sticks
        let next = evaluate_step(&table, &snapshot(2.0), &HashMap::new()).unwrap();
        assert_eq!(next["p1"], 0.5);
    }

    #[test]
    fn test_missing_observed_node() {
        let table = hysteresis_table();
        let empty = HashMap::new();
        let err = evaluate_step(&table, &empty, &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            ControlError::ObservedNodeMissing {
                actuator: "p1".to_string(),
                node: "n1".to_string(),
            }
        );
    }

    #[test]
    fn test_coverage_precondition() {
        let table = hysteresis_table();
        assert!(ensure_coverage(&table, &["p1".to_string()]).is_ok());
        let err =
            ensure_coverage(&table, &["p1".to_string(), "p2".to_string()]).unwrap_err();
        assert_eq!(err, ControlError::MissingRule("p2".to_string()));
    }
}
