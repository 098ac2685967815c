//! Small networks with known analytical solutions
//!
//! Used to validate solver accuracy and scan plumbing independently of the
//! co-culture model.

#![allow(dead_code)]

use coculture::{Model, ModelBuilder};

// =================================================================================================
// Exponential Decay: dx/dt = -k*x
// =================================================================================================

/// `x(t) = x0 * exp(-k*t)`
pub fn exponential_decay(x0: f64, k: f64) -> Model {
    ModelBuilder::new("decay")
        .add_variable("x", x0)
        .and_then(|b| b.add_parameter("k", k))
        .and_then(|b| b.add_reaction("v_decay", |a| a[0] * a[1], &["k", "x"], &[("x", -1.0)]))
        .and_then(|b| b.build())
        .expect("decay model is well formed")
}

pub fn decay_solution(x0: f64, k: f64, t: f64) -> f64 {
    x0 * (-k * t).exp()
}

// =================================================================================================
// Exponential Growth: dy/dt = r*y
// =================================================================================================

/// `y(t) = y0 * exp(r*t)`
pub fn exponential_growth(y0: f64, r: f64) -> Model {
    ModelBuilder::new("growth")
        .add_variable("y", y0)
        .and_then(|b| b.add_parameter("r", r))
        .and_then(|b| b.add_reaction("v_growth", |a| a[0] * a[1], &["r", "y"], &[("y", 1.0)]))
        .and_then(|b| b.build())
        .expect("growth model is well formed")
}

// =================================================================================================
// Linear production: dz/dt = p
// =================================================================================================

/// `z(t) = z0 + p*t`, exact for every Runge-Kutta scheme
pub fn linear_production(z0: f64, p: f64) -> Model {
    ModelBuilder::new("production")
        .add_variable("z", z0)
        .and_then(|b| b.add_parameter("p", p))
        .and_then(|b| b.add_reaction("v_production", |a| a[0], &["p"], &[("z", 1.0)]))
        .and_then(|b| b.build())
        .expect("production model is well formed")
}
