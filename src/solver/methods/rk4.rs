//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The classical fourth-order Runge-Kutta method uses a weighted average of
//! four slope estimates:
//!
//! ```text
//! k₁ = f(tₙ,        yₙ)
//! k₂ = f(tₙ + dt/2, yₙ + dt/2 · k₁)
//! k₃ = f(tₙ + dt/2, yₙ + dt/2 · k₂)
//! k₄ = f(tₙ + dt,   yₙ + dt · k₃)
//!
//! yₙ₊₁ = yₙ + dt/6 · (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: fourth-order accurate (global error ~ O(dt⁴))
//! - **Cost**: 4 function evaluations per step
//! - **Steps**: fixed, `substeps` per output interval
//!
//! There is no error control: accuracy is set by `substeps`. Halving the step
//! divides the error by about 16, which makes this method the reference for
//! convergence checks of the adaptive solver.
//!
//! # Example
//!
//! ```rust,ignore
//! use coculture::solver::{RK4Solver, Solver, SolverConfiguration, TimeGrid};
//!
//! let config = SolverConfiguration::rk4(200);
//! let trajectory = RK4Solver::new().integrate(&model, &grid, &config)?;
//! ```

use nalgebra::DVector;

use crate::error::IntegrationError;
use crate::model::OdeModel;
use crate::solver::{
    validate_state, BudgetClock, Solver, SolverConfiguration, SolverMethod, TimeGrid, Trajectory,
};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver
///
/// Each output interval `[tᵢ, tᵢ₊₁]` is split into `substeps` equal steps.
/// Step times are computed from the step index, never accumulated, so the
/// last step ends exactly on `tᵢ₊₁`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    ///
    /// ```rust
    /// use coculture::solver::{RK4Solver, Solver};
    ///
    /// let solver = RK4Solver::new();
    /// assert_eq!(solver.name(), "Runge-Kutta 4");
    /// ```
    pub fn new() -> Self {
        Self
    }

    fn step(model: &dyn OdeModel, t: f64, y: &DVector<f64>, dt: f64) -> DVector<f64> {
        // Stage 1: slope at the beginning of the step
        let k1 = model.right_hand_side(t, y);

        // Stages 2 and 3: slopes at the midpoint
        let k2 = model.right_hand_side(t + dt / 2.0, &(y + &k1 * (dt / 2.0)));
        let k3 = model.right_hand_side(t + dt / 2.0, &(y + &k2 * (dt / 2.0)));

        // Stage 4: slope at the end of the step
        let k4 = model.right_hand_side(t + dt, &(y + &k3 * dt));

        // Simpson weights
        y + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
    }
}

impl Solver for RK4Solver {
    fn integrate(
        &self,
        model: &dyn OdeModel,
        grid: &TimeGrid,
        config: &SolverConfiguration,
    ) -> Result<Trajectory, IntegrationError> {
        // ====== Step 1: Validation ======

        config.validate()?;

        let substeps = match config.method {
            SolverMethod::RungeKutta4 { substeps } => substeps,
            other => {
                return Err(IntegrationError::InvalidConfiguration(format!(
                    "RK4Solver requires an RK4 configuration, got {}",
                    other.name()
                )));
            }
        };

        let mut state = model.initial_state();
        if state.len() != model.dimension() {
            return Err(IntegrationError::InvalidConfiguration(format!(
                "initial state has {} components, model declares {}",
                state.len(),
                model.dimension()
            )));
        }
        validate_state(model, &state, grid.start(), 0)?;

        // ====== Step 2: Setup ======

        let clock = BudgetClock::start(config.time_budget);
        let mut states = Vec::with_capacity(grid.len());
        states.push(state.clone());
        let mut steps = 0usize;

        // ====== Step 3: Time Integration ======

        for (t_start, t_end) in grid.intervals() {
            if t_end > t_start {
                let dt = (t_end - t_start) / substeps as f64;

                for i in 0..substeps {
                    if steps >= config.max_steps {
                        return Err(IntegrationError::MaxStepsExceeded {
                            max_steps: config.max_steps,
                            time: t_start + i as f64 * dt,
                        });
                    }

                    let t = t_start + i as f64 * dt;
                    clock.check(t)?;

                    state = Self::step(model, t, &state, dt);
                    steps += 1;

                    let t_next = if i + 1 == substeps {
                        t_end
                    } else {
                        t_start + (i + 1) as f64 * dt
                    };
                    validate_state(model, &state, t_next, steps)?;
                }
            }

            states.push(state.clone());
        }

        // ====== Step 4: Build Trajectory ======

        let mut trajectory = Trajectory::new(grid.points().to_vec(), states);
        trajectory.add_metadata("solver", self.name());
        trajectory.add_metadata("substeps", &substeps.to_string());
        trajectory.add_metadata("time steps", &steps.to_string());
        trajectory.add_metadata("function evaluations", &(4 * steps).to_string());

        Ok(trajectory)
    }

    fn name(&self) -> &'static str {
        "Runge-Kutta 4"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
