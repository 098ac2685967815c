//! Dormand–Prince 5(4) adaptive solver
//!
//! # Mathematical Background
//!
//! Seven-stage explicit Runge-Kutta pair. The fifth-order solution advances
//! the state (local extrapolation) and the difference with the embedded
//! fourth-order solution estimates the local error:
//!
//! ```text
//! err = sqrt( 1/n Σ_i ( e_i / (atol + rtol · max(|y_i|, |y_new_i|)) )² )
//! ```
//!
//! A step is accepted when `err <= 1`. The next step size follows
//!
//! ```text
//! h_new = h · clamp(0.9 · err^(-1/5), 0.2, 5)
//! ```
//!
//! The last stage is evaluated at the accepted point, so it becomes the first
//! stage of the next step (FSAL) and an accepted step costs six evaluations.
//!
//! # Output points
//!
//! Steps are clamped so that every grid point is hit exactly; the proposed
//! step size survives the clamp, so dense grids do not throttle the
//! integrator.
//!
//! # Example
//!
//! ```rust,ignore
//! use coculture::solver::{DormandPrinceSolver, Solver, SolverConfiguration, TimeGrid};
//!
//! let grid = TimeGrid::linspace(0.0, 14.0, 11)?;
//! let config = SolverConfiguration::default().with_tolerances(1e-8, 1e-10);
//! let trajectory = DormandPrinceSolver::new().integrate(&model, &grid, &config)?;
//! ```

use log::trace;
use nalgebra::DVector;

use crate::error::IntegrationError;
use crate::model::OdeModel;
use crate::solver::{validate_state, BudgetClock, Solver, SolverConfiguration, TimeGrid, Trajectory};

// =================================================================================================
// Butcher tableau
// =================================================================================================

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights, also the last row of A (FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth minus fourth order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

// =================================================================================================
// Dormand-Prince Solver
// =================================================================================================

/// Adaptive Dormand–Prince 5(4) solver with step-size control
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrinceSolver;

impl DormandPrinceSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Outcome of one attempted step
struct Attempt {
    y_new: DVector<f64>,
    k7: DVector<f64>,
    error_norm: f64,
}

fn attempt_step(
    model: &dyn OdeModel,
    t: f64,
    y: &DVector<f64>,
    k1: &DVector<f64>,
    h: f64,
    config: &SolverConfiguration,
) -> Attempt {
    let k2 = model.right_hand_side(t + C2 * h, &(y + k1 * (h * A21)));
    let k3 = model.right_hand_side(t + C3 * h, &(y + (k1 * A31 + &k2 * A32) * h));
    let k4 = model.right_hand_side(
        t + C4 * h,
        &(y + (k1 * A41 + &k2 * A42 + &k3 * A43) * h),
    );
    let k5 = model.right_hand_side(
        t + C5 * h,
        &(y + (k1 * A51 + &k2 * A52 + &k3 * A53 + &k4 * A54) * h),
    );
    let k6 = model.right_hand_side(
        t + h,
        &(y + (k1 * A61 + &k2 * A62 + &k3 * A63 + &k4 * A64 + &k5 * A65) * h),
    );

    let y_new = y + (k1 * B1 + &k3 * B3 + &k4 * B4 + &k5 * B5 + &k6 * B6) * h;
    let k7 = model.right_hand_side(t + h, &y_new);

    let error = (k1 * E1 + &k3 * E3 + &k4 * E4 + &k5 * E5 + &k6 * E6 + &k7 * E7) * h;

    let n = y.len();
    let error_norm = if n == 0 {
        0.0
    } else {
        let sum: f64 = error
            .iter()
            .zip(y.iter().zip(y_new.iter()))
            .map(|(e, (a, b))| {
                let scale = config.atol + config.rtol * a.abs().max(b.abs());
                (e / scale).powi(2)
            })
            .sum();
        (sum / n as f64).sqrt()
    };

    Attempt {
        y_new,
        k7,
        error_norm,
    }
}

impl Solver for DormandPrinceSolver {
    fn integrate(
        &self,
        model: &dyn OdeModel,
        grid: &TimeGrid,
        config: &SolverConfiguration,
    ) -> Result<Trajectory, IntegrationError> {
        // ====== Step 1: Validation ======

        config.validate()?;

        let mut y = model.initial_state();
        if y.len() != model.dimension() {
            return Err(IntegrationError::InvalidConfiguration(format!(
                "initial state has {} components, model declares {}",
                y.len(),
                model.dimension()
            )));
        }
        validate_state(model, &y, grid.start(), 0)?;

        // ====== Step 2: Setup ======

        let clock = BudgetClock::start(config.time_budget);
        let mut states = Vec::with_capacity(grid.len());
        states.push(y.clone());

        let first_span = grid
            .intervals()
            .map(|(a, b)| b - a)
            .find(|span| *span > 0.0)
            .unwrap_or(0.0);
        let mut h = config
            .initial_step
            .unwrap_or(first_span * 1e-3)
            .max(config.min_step)
            .min(config.max_step);

        let mut k1 = model.right_hand_side(grid.start(), &y);
        let mut evaluations = 1usize;
        let mut accepted = 0usize;
        let mut rejected = 0usize;

        // ====== Step 3: Interval-by-interval integration ======

        for (t_start, t_end) in grid.intervals() {
            let mut t = t_start;

            while t < t_end {
                if accepted + rejected >= config.max_steps {
                    return Err(IntegrationError::MaxStepsExceeded {
                        max_steps: config.max_steps,
                        time: t,
                    });
                }
                clock.check(t)?;

                let remaining = t_end - t;
                let landing = h >= remaining;
                let h_try = if landing { remaining } else { h };

                let attempt = attempt_step(model, t, &y, &k1, h_try, config);
                evaluations += 6;

                let finite = attempt.y_new.iter().all(|v| v.is_finite());
                let error_norm = attempt.error_norm;

                if finite && error_norm <= 1.0 {
                    // ====== Accept ======
                    t = if landing { t_end } else { t + h_try };
                    y = attempt.y_new;
                    k1 = attempt.k7;
                    accepted += 1;
                    validate_state(model, &y, t, accepted)?;

                    let factor = if error_norm == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * error_norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    let proposed = (h_try * factor).min(config.max_step);
                    // A step shortened to hit a grid point says nothing about
                    // the size the error estimate would allow
                    h = if landing { h.max(proposed) } else { proposed };
                } else {
                    // ====== Reject ======
                    rejected += 1;
                    let factor = if finite && error_norm.is_finite() {
                        (SAFETY * error_norm.powf(-0.2)).clamp(MIN_FACTOR, 1.0)
                    } else {
                        MIN_FACTOR
                    };
                    trace!(
                        "{}: rejected step h = {:e} at t = {} (error {:e})",
                        model.name(),
                        h_try,
                        t,
                        error_norm
                    );
                    h = h_try * factor;

                    if h < config.min_step {
                        if !finite {
                            validate_state(model, &attempt.y_new, t + h_try, accepted + 1)?;
                        }
                        return Err(IntegrationError::StepSizeUnderflow {
                            time: t,
                            step_size: h,
                        });
                    }
                }
            }

            states.push(y.clone());
        }

        // ====== Step 4: Build Trajectory ======

        let mut trajectory = Trajectory::new(grid.points().to_vec(), states);
        trajectory.add_metadata("solver", self.name());
        trajectory.add_metadata("accepted steps", &accepted.to_string());
        trajectory.add_metadata("rejected steps", &rejected.to_string());
        trajectory.add_metadata("function evaluations", &evaluations.to_string());
        trajectory.add_metadata("rtol", &config.rtol.to_string());
        trajectory.add_metadata("atol", &config.atol.to_string());

        Ok(trajectory)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince 5(4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
