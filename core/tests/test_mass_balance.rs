//! Tests for the mass-balance overflow simulator

use drainage_simulator_core_rs::{CbaError, MassBalance, OverflowAccounting};

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_single_sample_fills_storage_without_overflow() {
    // capacity=100, throughput=0, dt=1, inflow=[50]
    let sim = MassBalance::new(100.0, 0.0, 1.0).unwrap();
    let report = sim.run(&[50.0]).unwrap();

    assert_eq!(report.cso_volume, 0.0);
    assert_eq!(report.storage_trajectory, vec![50.0]);
    assert_eq!(report.final_available_storage, 50.0);
}

#[test]
fn test_overflow_uses_pre_reset_storage() {
    // capacity=100, throughput=0, dt=1, inflow=[50, 80]
    // Step 1: storage 100 -> 50. Step 2: demand 80 > 0 + 50, so the
    // shortfall is 80 - 0 - 50 = 30 using the storage value before the reset.
    let sim = MassBalance::new(100.0, 0.0, 1.0).unwrap();
    let report = sim.run(&[50.0, 80.0]).unwrap();

    assert_eq!(report.cso_volume, 30.0);
    assert_eq!(report.storage_trajectory, vec![50.0, 0.0]);
    assert_eq!(report.final_available_storage, 0.0);
}

#[test]
fn test_post_reset_accounting_diverges() {
    // Same input, post-reset shortfall reads the zeroed storage: 80 - 0 = 80
    let sim = MassBalance::new(100.0, 0.0, 1.0)
        .unwrap()
        .with_accounting(OverflowAccounting::PostReset);
    let report = sim.run(&[50.0, 80.0]).unwrap();

    assert_eq!(report.cso_volume, 80.0);
    // The trajectory is identical either way; only the spill differs
    assert_eq!(report.storage_trajectory, vec![50.0, 0.0]);
}

// ============================================================================
// Recurrence Behavior
// ============================================================================

#[test]
fn test_treatment_drains_storage_back_up() {
    // throughput 10 m3/s over dt=1: each quiet sample restores 10 m3
    let sim = MassBalance::new(100.0, 10.0, 1.0).unwrap();
    let report = sim.run(&[60.0, 0.0, 0.0]).unwrap();

    // 100 -> 50, then +10 twice
    assert_eq!(report.storage_trajectory, vec![50.0, 60.0, 70.0]);
    assert_eq!(report.cso_volume, 0.0);
}

#[test]
fn test_storage_clamped_at_capacity() {
    let sim = MassBalance::new(100.0, 10.0, 1.0).unwrap();
    let report = sim.run(&[0.0, 0.0, 0.0]).unwrap();

    // Already full of headroom; draining cannot exceed capacity
    assert_eq!(report.storage_trajectory, vec![100.0, 100.0, 100.0]);
}

#[test]
fn test_inflow_within_throughput_never_draws_storage() {
    let sim = MassBalance::new(100.0, 5.0, 60.0).unwrap();
    let report = sim.run(&[5.0, 4.0, 5.0]).unwrap();

    assert!(report
        .storage_trajectory
        .iter()
        .all(|&v| v == 100.0));
    assert_eq!(report.cso_volume, 0.0);
}

#[test]
fn test_trajectory_length_matches_inflow() {
    let sim = MassBalance::new(100.0, 1.0, 30.0).unwrap();
    let inflow = vec![2.0; 17];
    let report = sim.run(&inflow).unwrap();
    assert_eq!(report.storage_trajectory.len(), inflow.len());
}

#[test]
fn test_repeated_overflow_accumulates() {
    // capacity 10, no treatment, dt=1: first sample commits the storage and
    // spills 10, each further sample spills its full 20
    let sim = MassBalance::new(10.0, 0.0, 1.0).unwrap();
    let report = sim.run(&[20.0, 20.0, 20.0]).unwrap();

    assert_eq!(report.cso_volume, 10.0 + 20.0 + 20.0);
    assert_eq!(report.storage_trajectory, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_zero_capacity_basin_spills_everything_above_throughput() {
    let sim = MassBalance::new(0.0, 1.0, 1.0).unwrap();
    let report = sim.run(&[3.0, 1.0, 5.0]).unwrap();

    // Samples above throughput spill (q - 1); the 1.0 sample just passes
    assert_eq!(report.cso_volume, 2.0 + 4.0);
    assert_eq!(report.storage_trajectory, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_run_is_pure() {
    let sim = MassBalance::new(75.0, 2.0, 600.0).unwrap();
    let inflow = vec![0.5, 3.0, 0.1, 4.0, 0.0];
    let first = sim.run(&inflow).unwrap();
    let second = sim.run(&inflow).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_inputs_rejected() {
    assert!(matches!(
        MassBalance::new(f64::NAN, 0.0, 1.0).unwrap_err(),
        CbaError::InvalidCapacity(_)
    ));
    assert!(matches!(
        MassBalance::new(100.0, -1.0, 1.0).unwrap_err(),
        CbaError::InvalidThroughput(_)
    ));
    assert!(matches!(
        MassBalance::new(100.0, 0.0, -60.0).unwrap_err(),
        CbaError::InvalidTimeStep(_)
    ));

    let sim = MassBalance::new(100.0, 0.0, 1.0).unwrap();
    assert!(matches!(sim.run(&[]).unwrap_err(), CbaError::EmptyInflow));
}
