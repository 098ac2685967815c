//! coculture: reaction-network ODE simulation and parameter scans
//!
//! Small, explicit population-dynamics models built from named variables,
//! parameters and reactions, integrated with adaptive Runge-Kutta methods and
//! scanned over parameter grids in parallel.
//!
//! # Architecture
//!
//! The crate keeps two concerns apart:
//!
//! 1. **What is integrated**: a [`Model`] compiled from a [`ModelBuilder`]
//!    declaration; reactions are evaluated in a dependency order computed once
//! 2. **How it is integrated**: a [`Solver`](solver::Solver) driven by a
//!    [`SolverConfiguration`](solver::SolverConfiguration)
//!
//! A [`Simulator`] ties one model to one solver configuration. A
//! [`Scan`](scan::Scan) runs one simulator per row of a parameter table and
//! merges the results.
//!
//! # Quick Start
//!
//! ```rust
//! use coculture::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Declare the network
//! let model = ModelBuilder::new("logistic")
//!     .add_variable("N", 10.0)?
//!     .add_parameters(&[("r", 0.5), ("K", 1000.0)])?
//!     .add_reaction("growth", |a| a[0] * a[1] * (1.0 - a[1] / a[2]), &["r", "N", "K"], &[("N", 1.0)])?
//!     .build()?;
//!
//! // 2. Simulate
//! let result = Simulator::new(model)
//!     .update_parameters([("r", 0.8)])?
//!     .simulate_time_course(&linspace(0.0, 20.0, 21))?
//!     .get_result()?;
//!
//! // 3. Read the tables
//! let n = result.variables.column("N").unwrap_or_default();
//! assert!(n.last().copied().unwrap_or(0.0) > 900.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`model`]: model declaration and compilation
//! - [`solver`]: numerical integrators
//! - [`simulator`]: single runs
//! - [`scan`]: batches of runs over parameter tables, optional result cache
//! - [`models`]: ready-made models (co-culture)
//! - [`config`]: scan settings from TOML
//! - [`output`]: CSV export and plots

pub mod config;
pub mod error;
pub mod model;
pub mod models;
pub mod output;
pub mod scan;
pub mod simulator;
pub mod solver;
pub mod table;

pub use error::{IntegrationError, ModelError, ScanError, SimulationError};
pub use model::{Model, ModelBuilder};
pub use simulator::{SimulationResult, Simulator};
pub use table::{RunTable, TableKind, TimeCourse};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use coculture::prelude::*;
    //! ```
    pub use crate::error::{IntegrationError, ModelError, ScanError, SimulationError};
    pub use crate::model::{Model, ModelBuilder, OdeModel};
    pub use crate::scan::{FailurePolicy, MemoryCache, Scan, ScanOptions, ScanResult, ScanTable};
    pub use crate::simulator::{SimulationResult, Simulator};
    pub use crate::solver::{linspace, SolverConfiguration};
    pub use crate::table::{RunTable, TableKind, TimeCourse};
}
