//! Numerical methods for solving differential equations
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! - **[`DormandPrinceSolver`]**: Dormand–Prince 5(4) with adaptive step size
//!   - Order: fifth-order solution, fourth-order embedded error estimate
//!   - Cost: 6 new function evaluations per attempted step (FSAL)
//!   - Use: **default**; non-stiff and mildly stiff population models
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step, fixed substeps per output interval
//!   - Use: reproducible fixed-cost runs, convergence studies
//!
//! Both methods integrate interval by interval between consecutive output
//! points and land exactly on each one, so trajectories never need
//! interpolation.
//!
//! # Design Philosophy
//!
//! Each solver is:
//! - **Stateless**: can be reused for any number of runs and shared across threads
//! - **Budgeted**: honours the step budget and the optional wall-clock budget
//! - **Checked**: every accepted state goes through `validate_state`

mod dopri5;
mod rk4;

pub use dopri5::DormandPrinceSolver;
pub use rk4::RK4Solver;
