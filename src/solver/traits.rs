//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - `SolverMethod` names the numerical scheme and carries its own knobs
//! - `SolverConfiguration` holds everything that controls HOW to integrate
//! - `Trajectory` is the raw solver output: states at the requested times
//!   plus free-form metadata
//!
//! The `Solver` trait takes any [`OdeModel`] and a caller-supplied
//! [`TimeGrid`]; the grid points always appear exactly in the output.

use std::collections::HashMap;
use std::time::Duration;

use nalgebra::DVector;

use crate::error::IntegrationError;
use crate::model::OdeModel;
use crate::solver::TimeGrid;

// =================================================================================================
// Solver method enumeration
// =================================================================================================

/// Numerical scheme used to integrate between output points
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SolverMethod {
    /// Adaptive Dormand–Prince 5(4) with error control
    #[default]
    DormandPrince,

    /// Classical RK4 with a fixed number of substeps per output interval
    RungeKutta4 { substeps: usize },
}

impl SolverMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SolverMethod::DormandPrince => "Dormand-Prince 5(4)",
            SolverMethod::RungeKutta4 { .. } => "Runge-Kutta 4",
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical integration
///
/// Tolerances only apply to adaptive methods. `time_budget` bounds the
/// wall-clock time of one run, whatever the method.
///
/// # Example
///
/// ```rust
/// use coculture::solver::SolverConfiguration;
/// use std::time::Duration;
///
/// let config = SolverConfiguration::default()
///     .with_tolerances(1e-8, 1e-10)
///     .with_time_budget(Duration::from_secs(2));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    pub method: SolverMethod,

    /// Relative tolerance (default: 1e-6)
    pub rtol: f64,

    /// Absolute tolerance (default: 1e-9)
    pub atol: f64,

    /// First trial step; `None` picks 1e-3 of the first interval
    pub initial_step: Option<f64>,

    /// Smallest step before giving up (default: 1e-12)
    pub min_step: f64,

    /// Largest step allowed (default: unbounded)
    pub max_step: f64,

    /// Step attempts allowed over the whole run (default: 100 000)
    pub max_steps: usize,

    /// Wall-clock limit for one run
    pub time_budget: Option<Duration>,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            method: SolverMethod::DormandPrince,
            rtol: 1e-6,
            atol: 1e-9,
            initial_step: None,
            min_step: 1e-12,
            max_step: f64::INFINITY,
            max_steps: 100_000,
            time_budget: None,
        }
    }
}

impl SolverConfiguration {
    /// Adaptive Dormand–Prince with default tolerances
    pub fn dormand_prince() -> Self {
        Self::default()
    }

    /// Fixed-step RK4 with `substeps` steps per output interval
    pub fn rk4(substeps: usize) -> Self {
        Self {
            method: SolverMethod::RungeKutta4 { substeps },
            ..Self::default()
        }
    }

    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), IntegrationError> {
        let invalid = |msg: &str| Err(IntegrationError::InvalidConfiguration(msg.to_string()));

        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return invalid("rtol must be finite and positive");
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return invalid("atol must be finite and positive");
        }
        if !self.min_step.is_finite() || self.min_step <= 0.0 {
            return invalid("min_step must be finite and positive");
        }
        if self.max_step.is_nan() || self.max_step < self.min_step {
            return invalid("max_step must not be smaller than min_step");
        }
        if let Some(h0) = self.initial_step {
            if !h0.is_finite() || h0 <= 0.0 {
                return invalid("initial_step must be finite and positive");
            }
        }
        if self.max_steps == 0 {
            return invalid("max_steps must be greater than 0");
        }
        if let SolverMethod::RungeKutta4 { substeps: 0 } = self.method {
            return invalid("rk4 substeps must be greater than 0");
        }
        Ok(())
    }
}

// =================================================================================================
// Trajectory
// =================================================================================================

/// States at each requested output time
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Output times, exactly as requested
    pub time_points: Vec<f64>,

    /// One state per output time
    pub states: Vec<DVector<f64>>,

    /// Solver diagnostics (method, step counts, evaluations)
    pub metadata: HashMap<String, String>,
}

impl Trajectory {
    pub fn new(time_points: Vec<f64>, states: Vec<DVector<f64>>) -> Self {
        Self {
            time_points,
            states,
            metadata: HashMap::new(),
        }
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    pub fn final_state(&self) -> Option<&DVector<f64>> {
        self.states.last()
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// A numerical method integrating an [`OdeModel`] over a [`TimeGrid`]
pub trait Solver: Send + Sync {
    /// Integrate from `model.initial_state()` at the first grid point
    ///
    /// The returned trajectory holds one state per grid point, the first
    /// being the initial state itself.
    fn integrate(
        &self,
        model: &dyn OdeModel,
        grid: &TimeGrid,
        config: &SolverConfiguration,
    ) -> Result<Trajectory, IntegrationError>;

    fn name(&self) -> &'static str;
}
