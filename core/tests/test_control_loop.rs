//! End-to-end tests for the stepped control loop over a scripted engine

use drainage_simulator_core_rs::engine::mock::{MockEngine, MockStep};
use drainage_simulator_core_rs::engine::{EngineError, RoutingSummary};
use drainage_simulator_core_rs::{
    ControlError, ControlLoop, ControlLoopConfig, Event, RuleTable, SimulationError,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// On above 0.5, off at or below 0.2: a genuine dead band in between
fn dead_band_rules() -> RuleTable {
    RuleTable::from_json(
        r#"{"p1": [["j_1", 0.5, 1.0, "higher"],
                   ["j_1", 0.2, 0.0, "lower"]]}"#,
    )
    .unwrap()
}

fn config(rules: RuleTable) -> ControlLoopConfig {
    ControlLoopConfig {
        control_interval_seconds: 900.0,
        rules,
    }
}

/// One pump, one outfall, depths and inflows scripted per step
fn scripted_engine(steps: &[(f64, f64)]) -> MockEngine {
    let mut engine = MockEngine::new(vec!["p1".to_string()], vec!["cso_1".to_string()]);
    for &(depth, inflow) in steps {
        engine = engine.with_step(MockStep::new(&[("j_1", depth)], &[("cso_1", inflow)]));
    }
    engine
}

// ============================================================================
// Hysteresis Over a Run
// ============================================================================

#[test]
fn test_writes_only_on_effective_changes() {
    // Depths walk on -> dead band -> off -> dead band -> on
    let engine = scripted_engine(&[(0.8, 0.0), (0.3, 0.0), (0.1, 0.0), (0.3, 0.0), (0.6, 0.0)]);
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();
    let summary = control.run().unwrap();

    assert_eq!(summary.steps, 5);
    // Dead-band steps keep the latched setting: no redundant writes
    assert_eq!(
        control.engine().writes_for("p1"),
        vec![(1, 1.0), (3, 0.0), (5, 1.0)]
    );
    assert_eq!(control.settings()["p1"], 1.0);
}

#[test]
fn test_setting_changes_logged_with_step_and_time() {
    let engine = scripted_engine(&[(0.8, 0.0), (0.1, 0.0)]);
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();
    control.run().unwrap();

    let changes = control.event_log().setting_changes_for("p1");
    assert_eq!(changes.len(), 2);
    assert_eq!(
        *changes[0],
        Event::SettingChanged {
            step: 1,
            time: 900.0,
            actuator: "p1".to_string(),
            previous: None,
            new: 1.0,
        }
    );
    assert_eq!(
        *changes[1],
        Event::SettingChanged {
            step: 2,
            time: 1800.0,
            actuator: "p1".to_string(),
            previous: Some(1.0),
            new: 0.0,
        }
    );
}

#[test]
fn test_step_results_count_changes() {
    let engine = scripted_engine(&[(0.8, 0.0), (0.3, 0.0), (0.1, 0.0)]);
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();

    let first = control.step().unwrap().unwrap();
    assert_eq!(first.step, 1);
    assert_eq!(first.time, 900.0);
    assert_eq!(first.num_setting_changes, 1);

    // Dead band: evaluation runs, nothing changes
    let second = control.step().unwrap().unwrap();
    assert_eq!(second.num_setting_changes, 0);

    let third = control.step().unwrap().unwrap();
    assert_eq!(third.num_setting_changes, 1);
}

#[test]
fn test_independent_pumps_written_separately() {
    let rules = RuleTable::from_json(
        r#"{"p1": [["j_1", 0.2, 1.0, "higher"], ["j_1", 0.2, 0.0, "lower"]],
            "p2": [["j_2", 1.0, 1.0, "higher"], ["j_2", 1.0, 0.0, "lower"]]}"#,
    )
    .unwrap();
    let engine = MockEngine::new(vec!["p1".to_string(), "p2".to_string()], vec![])
        .with_step(MockStep::new(&[("j_1", 0.5), ("j_2", 0.5)], &[]))
        .with_step(MockStep::new(&[("j_1", 0.5), ("j_2", 1.5)], &[]));
    let mut control = ControlLoop::new(engine, config(rules)).unwrap();
    control.run().unwrap();

    // p1 is on from step 1 and never rewritten; p2 switches off then on
    assert_eq!(control.engine().writes_for("p1"), vec![(1, 1.0)]);
    assert_eq!(control.engine().writes_for("p2"), vec![(1, 0.0), (2, 1.0)]);
}

// ============================================================================
// Outfall Recording
// ============================================================================

#[test]
fn test_outfall_series_records_every_step() {
    let engine = scripted_engine(&[(0.8, 0.0), (0.3, 0.1), (0.1, 0.2), (0.3, 0.0), (0.6, 0.3)]);
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();
    control.run().unwrap();

    let series = control.outfall_series();
    assert_eq!(series.len(), 5);
    assert_eq!(series.times(), &[900.0, 1800.0, 2700.0, 3600.0, 4500.0]);
    assert_eq!(series.values("cso_1"), Some(&[0.0, 0.1, 0.2, 0.0, 0.3][..]));
    assert_eq!(series.total_inflow("cso_1"), Some(0.6));
}

#[test]
fn test_into_series_keeps_recording() {
    let engine = scripted_engine(&[(0.8, 0.4), (0.8, 0.6)]);
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();
    control.run().unwrap();

    let series = control.into_series();
    assert_eq!(series.totals(), vec![("cso_1".to_string(), 1.0)]);
}

// ============================================================================
// Run Completion
// ============================================================================

#[test]
fn test_run_summary_carries_routing_statistics() {
    let engine = scripted_engine(&[(0.8, 0.0)]).with_summary(RoutingSummary {
        continuity_error_percent: -0.42,
        flooding_volume: 125.0,
    });
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();
    let summary = control.run().unwrap();

    assert_eq!(summary.steps, 1);
    assert_eq!(summary.routing.continuity_error_percent, -0.42);
    assert_eq!(summary.routing.flooding_volume, 125.0);

    let completed = control
        .event_log()
        .events()
        .iter()
        .find(|e| matches!(e, Event::RunCompleted { .. }))
        .unwrap();
    assert_eq!(
        *completed,
        Event::RunCompleted {
            steps: 1,
            continuity_error_percent: -0.42,
            flooding_volume: 125.0,
        }
    );
}

#[test]
fn test_empty_script_completes_with_zero_steps() {
    let engine = scripted_engine(&[]);
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();
    let summary = control.run().unwrap();

    assert_eq!(summary.steps, 0);
    assert!(control.outfall_series().is_empty());
}

// ============================================================================
// Error Propagation
// ============================================================================

#[test]
fn test_missing_rule_fails_at_construction() {
    let engine = MockEngine::new(
        vec!["p1".to_string(), "uncovered".to_string()],
        vec![],
    );
    let err = ControlLoop::new(engine, config(dead_band_rules())).err().unwrap();
    assert_eq!(
        err,
        SimulationError::Control(ControlError::MissingRule("uncovered".to_string()))
    );
}

#[test]
fn test_engine_error_aborts_the_run() {
    // The rule observes j_1 but the scripted step never exposes it
    let engine = MockEngine::new(vec!["p1".to_string()], vec!["cso_1".to_string()])
        .with_step(MockStep::new(&[("other", 0.8)], &[("cso_1", 0.0)]));
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();

    let err = control.run().unwrap_err();
    assert_eq!(
        err,
        SimulationError::Engine(EngineError::NodeNotFound("j_1".to_string()))
    );
}

#[test]
fn test_missing_outfall_observation_aborts_the_run() {
    let engine = MockEngine::new(vec!["p1".to_string()], vec!["cso_1".to_string()])
        .with_step(MockStep::new(&[("j_1", 0.8)], &[]));
    let mut control = ControlLoop::new(engine, config(dead_band_rules())).unwrap();

    assert!(matches!(
        control.run().unwrap_err(),
        SimulationError::Engine(EngineError::NodeNotFound(_))
    ));
}
