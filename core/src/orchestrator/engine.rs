//! Stepped control loop
//!
//! Main RTC loop integrating all components:
//! - Time stepping (one rule evaluation per fixed control interval)
//! - Depth snapshots (pulled from the hydraulic engine after each advance)
//! - Rule evaluation (ordered hysteresis bands, sticky settings)
//! - Actuator write-back (only effective changes reach the engine)
//! - Outfall recording (one inflow sample per outfall per step)
//! - Event logging (setting changes and run completion)
//!
//! # Architecture
//!
//! ```text
//! For each control step n:
//! 1. Ask the engine to integrate forward by one interval
//!    (stop if the simulation has ended)
//! 2. Snapshot the depths of every rule-observed node
//! 3. Evaluate the rule table against the snapshot
//! 4. Write changed settings back (they govern interval n -> n+1)
//! 5. Record each outfall's instantaneous inflow and the timestamp
//! ```
//!
//! Step 4 acting on the *next* interval is the one-interval control latency
//! inherent to a sampled control loop.
//!
//! # Example
//!
//! ```
//! use drainage_simulator_core_rs::engine::mock::{MockEngine, MockStep};
//! use drainage_simulator_core_rs::{ControlLoop, ControlLoopConfig, RuleTable};
//!
//! let engine = MockEngine::new(vec!["p1".to_string()], vec!["cso_1".to_string()])
//!     .with_step(MockStep::new(&[("j_1", 0.5)], &[("cso_1", 0.0)]))
//!     .with_step(MockStep::new(&[("j_1", 0.1)], &[("cso_1", 0.2)]));
//!
//! let rules = RuleTable::from_json(r#"{
//!     "p1": [["j_1", 0.2, 1.0, "higher"],
//!            ["j_1", 0.2, 0.0, "lower"]]
//! }"#).unwrap();
//!
//! let mut control = ControlLoop::new(engine, ControlLoopConfig {
//!     control_interval_seconds: 900.0,
//!     rules,
//! }).unwrap();
//!
//! let summary = control.run().unwrap();
//! assert_eq!(summary.steps, 2);
//! assert_eq!(control.outfall_series().len(), 2);
//! ```

use crate::control::evaluator::{ensure_coverage, evaluate_step};
use crate::control::{ActuatorSettings, ControlError, DepthSnapshot, RuleTable};
use crate::core::time::ControlClock;
use crate::engine::{EngineError, HydraulicEngine, RoutingSummary};
use crate::model::event::{Event, EventLog};
use crate::model::series::OutfallSeries;
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete control-loop configuration
#[derive(Debug, Clone)]
pub struct ControlLoopConfig {
    /// Seconds between consecutive rule evaluations (e.g. 900 = every 15 min)
    pub control_interval_seconds: f64,

    /// Threshold rules per controllable actuator
    pub rules: RuleTable,
}

/// Result of a single control step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Control step number (1-based: the step just completed)
    pub step: usize,

    /// Simulation time (s) after this step's integration
    pub time: f64,

    /// Number of actuator settings that changed this step
    pub num_setting_changes: usize,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Total control steps executed
    pub steps: usize,

    /// Engine routing statistics, informational output only
    pub routing: RoutingSummary,
}

/// Simulation error types
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Rule authoring or evaluation error
    #[error(transparent)]
    Control(#[from] ControlError),

    /// Hydraulic engine failure (never caught, aborts the run)
    #[error(transparent)]
    Engine(#[from] EngineError),
}

// ============================================================================
// Control Loop
// ============================================================================

/// Stepped control loop over an external hydraulic engine
///
/// Owns the engine for the duration of a run, together with the actuator
/// settings, the outfall series, and the event log. All stepping is
/// synchronous and single-threaded; any error aborts the run, and a run is
/// never resumed past a failure.
pub struct ControlLoop<E: HydraulicEngine> {
    /// External hydraulic engine (exclusively mutated by this loop)
    engine: E,

    /// Control-step clock
    clock: ControlClock,

    /// Threshold rules per actuator
    rules: RuleTable,

    /// Settings currently in force (absent until a rule first fires)
    settings: ActuatorSettings,

    /// Controllable pump links, enumerated once at construction
    pumps: Vec<String>,

    /// Outfall nodes, enumerated once at construction
    outfalls: Vec<String>,

    /// Recorded per-outfall inflow
    series: OutfallSeries,

    /// Setting changes and run completion
    event_log: EventLog,

    /// True once the engine has signalled simulation end
    finished: bool,
}

impl<E: HydraulicEngine> ControlLoop<E> {
    /// Create a control loop from an engine and configuration
    ///
    /// Validates the configuration and checks, up front, that every pump the
    /// engine enumerates has a rule entry; a missing rule surfaces here as
    /// `ControlError::MissingRule`, not halfway through a run.
    pub fn new(engine: E, config: ControlLoopConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let pumps = engine.pump_ids();
        ensure_coverage(&config.rules, &pumps)?;

        let outfalls = engine.outfall_ids();
        let series = OutfallSeries::new(outfalls.clone());

        Ok(Self {
            engine,
            clock: ControlClock::new(config.control_interval_seconds),
            rules: config.rules,
            settings: ActuatorSettings::new(),
            pumps,
            outfalls,
            series,
            event_log: EventLog::new(),
            finished: false,
        })
    }

    /// Validate configuration
    fn validate_config(config: &ControlLoopConfig) -> Result<(), SimulationError> {
        if !config.control_interval_seconds.is_finite() || config.control_interval_seconds <= 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "control_interval_seconds must be positive, got {}",
                config.control_interval_seconds
            )));
        }
        if config.rules.is_empty() {
            return Err(SimulationError::InvalidConfig(
                "rule table must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of completed control steps
    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    /// Reference to the wrapped engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Settings currently in force
    pub fn settings(&self) -> &ActuatorSettings {
        &self.settings
    }

    /// Recorded outfall inflow series
    pub fn outfall_series(&self) -> &OutfallSeries {
        &self.series
    }

    /// Event log (setting changes, run completion)
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Consume the loop, keeping the recorded series
    pub fn into_series(self) -> OutfallSeries {
        self.series
    }

    // ========================================================================
    // Step Loop Implementation
    // ========================================================================

    /// Execute one control step
    ///
    /// Returns `Ok(Some(StepResult))` after a completed step or `Ok(None)`
    /// once the engine reports simulation end (the routing summary is logged
    /// the first time that happens).
    pub fn step(&mut self) -> Result<Option<StepResult>, SimulationError> {
        let time = match self.engine.advance(self.clock.interval_seconds())? {
            Some(time) => time,
            None => {
                if !self.finished {
                    self.finished = true;
                    let summary = self.engine.routing_summary();
                    self.event_log.log(Event::RunCompleted {
                        steps: self.clock.current_step(),
                        continuity_error_percent: summary.continuity_error_percent,
                        flooding_volume: summary.flooding_volume,
                    });
                }
                return Ok(None);
            }
        };

        self.clock.advance_step();
        let step = self.clock.current_step();

        // STEP 1: SNAPSHOT
        // Pull depths for every node some rule observes, once per node
        let mut snapshot = DepthSnapshot::new();
        for (_, rules) in self.rules.entries() {
            for rule in rules {
                if !snapshot.contains_key(&rule.observed_node) {
                    let depth = self.engine.node_depth(&rule.observed_node)?;
                    snapshot.insert(rule.observed_node.clone(), depth);
                }
            }
        }

        // STEP 2: RULE EVALUATION
        let next = evaluate_step(&self.rules, &snapshot, &self.settings)?;

        // STEP 3: WRITE-BACK
        // Only effective changes reach the engine; each one is logged.
        // These settings govern the engine's next integration interval.
        let mut num_setting_changes = 0;
        for pump in &self.pumps {
            let new = match next.get(pump) {
                Some(&setting) => setting,
                None => continue,
            };
            let previous = self.settings.get(pump).copied();
            if previous != Some(new) {
                self.engine.set_target_setting(pump, new)?;
                self.event_log.log(Event::SettingChanged {
                    step,
                    time,
                    actuator: pump.clone(),
                    previous,
                    new,
                });
                num_setting_changes += 1;
            }
        }
        self.settings = next;

        // STEP 4: OUTFALL RECORDING
        let mut inflows = Vec::with_capacity(self.outfalls.len());
        for outfall in &self.outfalls {
            inflows.push(self.engine.outfall_inflow(outfall)?);
        }
        self.series.record(time, inflows);

        Ok(Some(StepResult {
            step,
            time,
            num_setting_changes,
        }))
    }

    /// Run to simulation end
    ///
    /// Steps until the engine signals termination, then returns the run
    /// summary with the engine's routing statistics.
    pub fn run(&mut self) -> Result<RunSummary, SimulationError> {
        while self.step()?.is_some() {}
        Ok(RunSummary {
            steps: self.clock.current_step(),
            routing: self.engine.routing_summary(),
        })
    }
}
