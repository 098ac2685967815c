//! Numerical solvers
//!
//! This module provides the traits and implementations used to integrate an
//! [`OdeModel`] over an output time grid.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Model** (`OdeModel`) - WHAT to integrate
//!    - state dimension and initial state
//!    - right-hand side `f(t, y)`
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to integrate
//!    - method (`DormandPrince`, `RungeKutta4`)
//!    - tolerances, step bounds, step and wall-clock budgets
//!
//! 3. **Solver** (`Solver` trait) - the numerical method
//!    - applies the scheme between consecutive grid points
//!    - lands exactly on every grid point
//!    - independent of what the model represents
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `SolverMethod`, `SolverConfiguration`, `Trajectory`
//! - **`time_grid`**: validated output times and `linspace`
//! - **`methods`**: `DormandPrinceSolver` (adaptive, default) and `RK4Solver`
//!
//! # Quick Start
//!
//! ```rust
//! use coculture::model::ModelBuilder;
//! use coculture::solver::{solver_for, SolverConfiguration, TimeGrid};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ModelBuilder::new("decay")
//!     .add_variable("x", 1.0)?
//!     .add_parameter("k", 0.1)?
//!     .add_reaction("v", |a: &[f64]| a[0] * a[1], &["k", "x"], &[("x", -1.0)])?
//!     .build()?;
//!
//! let config = SolverConfiguration::default();
//! let grid = TimeGrid::linspace(0.0, 10.0, 11)?;
//! let trajectory = solver_for(&config).integrate(&model, &grid, &config)?;
//!
//! let x_end = trajectory.final_state().map(|s| s[0]).unwrap_or_default();
//! assert!((x_end - (-1.0f64).exp()).abs() < 1e-5);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Solvers return [`IntegrationError`]:
//! - invalid configuration or time grid
//! - NaN/Inf in the state
//! - step size underflow or step budget exhausted
//! - wall-clock budget exhausted

// =================================================================================================
// Module Declarations
// =================================================================================================

mod methods;
mod time_grid;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use methods::{DormandPrinceSolver, RK4Solver};
pub use time_grid::{linspace, TimeGrid};
pub use traits::{Solver, SolverConfiguration, SolverMethod, Trajectory};

use std::time::{Duration, Instant};

use nalgebra::DVector;

use crate::error::IntegrationError;
use crate::model::OdeModel;

/// Solver implementing the configured method
pub fn solver_for(config: &SolverConfiguration) -> Box<dyn Solver> {
    match config.method {
        SolverMethod::DormandPrince => Box::new(DormandPrinceSolver::new()),
        SolverMethod::RungeKutta4 { .. } => Box::new(RK4Solver::new()),
    }
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Validate a state for numerical issues
///
/// NaN arises from 0/0 or Inf - Inf in a rate function; Inf from overflow of
/// a diverging population. Either ends the run.
///
/// # Example
///
/// ```rust,ignore
/// validate_state(&model, &state, t, 42)?;  // state reached at step 42
/// ```
pub(crate) fn validate_state(
    model: &dyn OdeModel,
    state: &DVector<f64>,
    time: f64,
    step: usize,
) -> Result<(), IntegrationError> {
    match state.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(IntegrationError::NonFiniteState {
            variable: model.variable_name(index).to_string(),
            value: state[index],
            time,
            step,
        }),
        None => Ok(()),
    }
}

/// Wall-clock budget shared by the solver loops
pub(crate) struct BudgetClock {
    started: Instant,
    budget: Option<Duration>,
}

impl BudgetClock {
    pub(crate) fn start(budget: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub(crate) fn check(&self, time: f64) -> Result<(), IntegrationError> {
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => {
                Err(IntegrationError::TimeBudgetExceeded {
                    budget_ms: budget.as_millis(),
                    time,
                })
            }
            _ => Ok(()),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
