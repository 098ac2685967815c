//! Single-model simulation
//!
//! A [`Simulator`] owns one [`Model`], an optional parameter overlay and the
//! solver configuration, and keeps the trajectory of its last successful
//! run. Typical use:
//!
//! ```rust
//! use coculture::models::coculture::{build_model, CocultureParameters};
//! use coculture::Simulator;
//! use coculture::solver::linspace;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = build_model(&CocultureParameters::default())?;
//! let result = Simulator::new(model)
//!     .update_parameters([("a_e", 0.2)])?
//!     .simulate_time_course(&linspace(0.0, 14.0, 11))?
//!     .get_result()?;
//!
//! assert_eq!(result.variables.columns(), ["E", "C"]);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use crate::error::SimulationError;
use crate::model::{Model, OdeModel};
use crate::solver::{solver_for, SolverConfiguration, TimeGrid, Trajectory};
use crate::table::{TableKind, TimeCourse};

// =================================================================================================
// Simulation result
// =================================================================================================

/// Variables and fluxes of one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// One column per variable
    pub variables: TimeCourse,

    /// One column per reaction, derived quantities included
    pub fluxes: TimeCourse,

    /// Solver diagnostics
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn time(&self) -> &[f64] {
        self.variables.time()
    }

    pub fn table(&self, kind: TableKind) -> &TimeCourse {
        match kind {
            TableKind::Variables => &self.variables,
            TableKind::Fluxes => &self.fluxes,
        }
    }
}

// =================================================================================================
// Simulator
// =================================================================================================

#[derive(Debug, Clone)]
pub struct Simulator {
    model: Model,
    config: SolverConfiguration,
    trajectory: Option<Trajectory>,
}

impl Simulator {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            config: SolverConfiguration::default(),
            trajectory: None,
        }
    }

    pub fn with_solver(mut self, config: SolverConfiguration) -> Self {
        self.config = config;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn solver_configuration(&self) -> &SolverConfiguration {
        &self.config
    }

    /// Effective parameter values, defaults overlaid by every update so far
    pub fn parameters(&self) -> &IndexMap<String, f64> {
        self.model.parameters()
    }

    /// Overlay parameter values
    ///
    /// Successive calls accumulate. Any previous result is discarded since it
    /// no longer matches the parameters.
    ///
    /// # Errors
    ///
    /// [`SimulationError::UnknownParameter`] if a key is not a declared
    /// parameter; the simulator is consumed in that case.
    pub fn update_parameters<I, K>(mut self, overrides: I) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        self.model = self.model.with_parameters(overrides)?;
        self.trajectory = None;
        Ok(self)
    }

    /// Integrate from the initial values at `time_points[0]`
    ///
    /// Every requested time point appears exactly in the result. A single
    /// time point yields the initial condition. On failure no result is kept.
    pub fn simulate_time_course(&mut self, time_points: &[f64]) -> Result<&mut Self, SimulationError> {
        self.trajectory = None;
        let grid = TimeGrid::new(time_points)?;
        let solver = solver_for(&self.config);

        debug!(
            "{}: integrating {} points over [{}, {}] with {}",
            self.model.name(),
            grid.len(),
            grid.start(),
            grid.end(),
            solver.name()
        );

        let trajectory = solver.integrate(&self.model, &grid, &self.config)?;

        debug!(
            "{}: done ({} function evaluations)",
            self.model.name(),
            trajectory
                .metadata
                .get("function evaluations")
                .map(String::as_str)
                .unwrap_or("?")
        );

        self.trajectory = Some(trajectory);
        Ok(self)
    }

    /// Variables and fluxes of the last successful run
    ///
    /// Fluxes are obtained by re-evaluating every reaction rate at each
    /// stored state.
    ///
    /// # Errors
    ///
    /// [`SimulationError::NoResult`] before a successful simulation.
    pub fn get_result(&self) -> Result<SimulationResult, SimulationError> {
        let trajectory = self.trajectory.as_ref().ok_or(SimulationError::NoResult)?;

        let variable_names = self.model.variable_names().into_iter().map(String::from).collect();
        let reaction_names = self.model.reaction_names().into_iter().map(String::from).collect();

        let fluxes: Vec<_> = trajectory
            .time_points
            .iter()
            .zip(&trajectory.states)
            .map(|(&t, state)| self.model.fluxes(t, state))
            .collect();

        let mut metadata = trajectory.metadata.clone();
        metadata.insert("model".to_string(), self.model.name().to_string());

        Ok(SimulationResult {
            variables: TimeCourse::from_states(
                trajectory.time_points.clone(),
                variable_names,
                &trajectory.states,
            ),
            fluxes: TimeCourse::from_states(trajectory.time_points.clone(), reaction_names, &fluxes),
            metadata,
        })
    }

    /// Whether a successful run is available
    pub fn has_result(&self) -> bool {
        self.trajectory.is_some()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrationError;
    use crate::model::ModelBuilder;
    use approx::assert_relative_eq;

    fn decay() -> Model {
        ModelBuilder::new("decay")
            .add_variable("x", 4.0)
            .and_then(|b| b.add_parameter("k", 0.5))
            .and_then(|b| b.add_reaction("v_decay", |a| a[0] * a[1], &["k", "x"], &[("x", -1.0)]))
            .and_then(|b| b.add_derived("half", |a| a[0] / 2.0, &["x"]))
            .and_then(|b| b.build())
            .unwrap()
    }

    #[test]
    fn test_get_result_before_simulation() {
        let simulator = Simulator::new(decay());
        assert_eq!(simulator.get_result(), Err(SimulationError::NoResult));
        assert!(!simulator.has_result());
    }

    #[test]
    fn test_simulation_matches_analytical() {
        let mut simulator = Simulator::new(decay());
        let result = simulator
            .simulate_time_course(&[0.0, 1.0, 2.0])
            .unwrap()
            .get_result()
            .unwrap();

        let x = result.variables.column("x").unwrap();
        for (t, value) in result.time().iter().zip(&x) {
            assert_relative_eq!(*value, 4.0 * (-0.5 * t).exp(), max_relative = 1e-5);
        }
    }

    #[test]
    fn test_fluxes_are_reevaluated_rates() {
        let mut simulator = Simulator::new(decay());
        simulator.simulate_time_course(&[0.0, 3.0]).unwrap();
        let result = simulator.get_result().unwrap();

        assert_eq!(result.fluxes.columns(), ["v_decay", "half"]);
        for row in 0..result.fluxes.len() {
            let x = result.variables.value(row, "x").unwrap();
            assert_relative_eq!(result.fluxes.value(row, "v_decay").unwrap(), 0.5 * x);
            assert_relative_eq!(result.fluxes.value(row, "half").unwrap(), x / 2.0);
        }
    }

    #[test]
    fn test_single_time_point_returns_initial_values() {
        let mut simulator = Simulator::new(decay());
        let result = simulator.simulate_time_course(&[2.0]).unwrap().get_result().unwrap();
        assert_eq!(result.time(), &[2.0]);
        assert_eq!(result.variables.value(0, "x"), Some(4.0));
    }

    #[test]
    fn test_update_parameters_overlays_defaults() {
        let simulator = Simulator::new(decay()).update_parameters([("k", 1.0)]).unwrap();
        assert_eq!(simulator.parameters().get("k"), Some(&1.0));
        assert_eq!(simulator.model().parameter("k"), Some(1.0));
    }

    #[test]
    fn test_update_parameters_accumulate() {
        let model = ModelBuilder::new("two")
            .add_parameters(&[("a", 1.0), ("b", 2.0)])
            .and_then(|b| b.build())
            .unwrap();
        let simulator = Simulator::new(model)
            .update_parameters([("a", 10.0)])
            .and_then(|s| s.update_parameters([("b", 20.0)]))
            .unwrap();
        assert_eq!(simulator.parameters().get("a"), Some(&10.0));
        assert_eq!(simulator.parameters().get("b"), Some(&20.0));
    }

    #[test]
    fn test_unknown_parameter() {
        let err = Simulator::new(decay())
            .update_parameters([("x", 1.0)])
            .unwrap_err();
        assert_eq!(err, SimulationError::UnknownParameter("x".to_string()));
    }

    #[test]
    fn test_update_discards_previous_result() {
        let mut simulator = Simulator::new(decay());
        simulator.simulate_time_course(&[0.0, 1.0]).unwrap();
        let simulator = simulator.update_parameters([("k", 0.1)]).unwrap();
        assert_eq!(simulator.get_result(), Err(SimulationError::NoResult));
    }

    #[test]
    fn test_failed_run_keeps_no_result() {
        let mut simulator = Simulator::new(decay());
        simulator.simulate_time_course(&[0.0, 1.0]).unwrap();
        let err = simulator.simulate_time_course(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Integration {
                source: IntegrationError::InvalidTimeGrid(_)
            }
        ));
        assert!(!simulator.has_result());
    }

    #[test]
    fn test_rk4_configuration_is_used() {
        let mut simulator = Simulator::new(decay()).with_solver(SolverConfiguration::rk4(20));
        let result = simulator.simulate_time_course(&[0.0, 1.0]).unwrap().get_result().unwrap();
        assert_eq!(result.metadata.get("solver"), Some(&"Runge-Kutta 4".to_string()));
        assert_eq!(result.metadata.get("model"), Some(&"decay".to_string()));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let points = [0.0, 0.7, 1.4, 5.0];
        let mut simulator = Simulator::new(decay());
        let first = simulator.simulate_time_course(&points).unwrap().get_result().unwrap();
        let second = simulator.simulate_time_course(&points).unwrap().get_result().unwrap();
        assert_eq!(first, second);
    }
}
