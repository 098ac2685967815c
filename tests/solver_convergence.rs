//! Convergence tests for numerical solvers
//!
//! These tests verify that solvers exhibit the expected
//! convergence rates when refining the time step or the tolerance.

use coculture::solver::{DormandPrinceSolver, RK4Solver, Solver, SolverConfiguration, TimeGrid};

mod common;
use common::{exponential_decay, linear_production, relative_error};
use common::mock_models::decay_solution;

#[test]
fn test_rk4_fourth_order_convergence() {
    // RK4 should have fourth-order convergence: error ~ O(dt^4)
    // When dt → dt/2, error should → error/16

    let decay_rate = 0.3;
    let total_time = 5.0;
    let exact = decay_solution(1.0, decay_rate, total_time);

    let grid = TimeGrid::new(&[0.0, total_time]).unwrap();
    let model = exponential_decay(1.0, decay_rate);
    let rk4 = RK4Solver::new();

    let errors: Vec<f64> = [10, 20, 40, 80]
        .iter()
        .map(|&substeps| {
            let config = SolverConfiguration::rk4(substeps);
            let trajectory = rk4.integrate(&model, &grid, &config).unwrap();
            (trajectory.final_state().unwrap()[0] - exact).abs()
        })
        .collect();

    for i in 0..errors.len() - 1 {
        let ratio = errors[i] / errors[i + 1];
        println!("RK4 convergence ratio {}->{}: {}", i, i + 1, ratio);

        // Should be close to 16 for fourth-order
        assert!(
            ratio > 12.0 && ratio < 20.0,
            "Convergence ratio {} not fourth-order",
            ratio
        );
    }
}

#[test]
fn test_dopri_error_shrinks_with_tolerance() {
    let decay_rate = 0.8;
    let total_time = 10.0;
    let exact = decay_solution(2.0, decay_rate, total_time);

    let grid = TimeGrid::new(&[0.0, total_time]).unwrap();
    let model = exponential_decay(2.0, decay_rate);
    let solver = DormandPrinceSolver::new();

    let mut previous = f64::INFINITY;
    for rtol in [1e-4, 1e-7, 1e-10] {
        let config = SolverConfiguration::dormand_prince().with_tolerances(rtol, rtol * 1e-3);
        let trajectory = solver.integrate(&model, &grid, &config).unwrap();
        let error = relative_error(trajectory.final_state().unwrap()[0], exact);
        println!("DOPRI rtol {:e}: relative error {:e}", rtol, error);

        assert!(error < 100.0 * rtol, "error {:e} too large for rtol {:e}", error, rtol);
        assert!(error <= previous);
        previous = error;
    }
}

#[test]
fn test_both_methods_are_exact_for_constant_rates() {
    let grid = TimeGrid::linspace(0.0, 3.0, 7).unwrap();
    let model = linear_production(1.0, 2.5);

    let solvers: [(Box<dyn Solver>, SolverConfiguration); 2] = [
        (Box::new(DormandPrinceSolver::new()), SolverConfiguration::dormand_prince()),
        (Box::new(RK4Solver::new()), SolverConfiguration::rk4(3)),
    ];

    for (solver, config) in &solvers {
        let trajectory = solver.integrate(&model, &grid, config).unwrap();
        for (t, state) in trajectory.time_points.iter().zip(&trajectory.states) {
            assert!(
                (state[0] - (1.0 + 2.5 * t)).abs() < 1e-12,
                "{} at t = {}: {}",
                solver.name(),
                t,
                state[0]
            );
        }
    }
}

#[test]
fn test_output_lands_on_requested_points() {
    let points = [0.0, 0.1, 0.1, 0.35, 2.0, 7.25];
    let grid = TimeGrid::new(&points).unwrap();
    let model = exponential_decay(1.0, 0.5);

    let trajectory = DormandPrinceSolver::new()
        .integrate(&model, &grid, &SolverConfiguration::default())
        .unwrap();

    assert_eq!(trajectory.time_points, points);
    assert_eq!(trajectory.states[1], trajectory.states[2]);
    for (t, state) in points.iter().zip(&trajectory.states) {
        assert!(relative_error(state[0], decay_solution(1.0, 0.5, *t)) < 1e-5);
    }
}
