//! Parameter scans
//!
//! A scan runs one independent simulation per row of a [`ScanTable`], all
//! over the same time grid, and stacks the per-row tables into [`RunTable`]s
//! indexed by `(row id, time)`.
//!
//! # Execution
//!
//! Every row builds its own [`Model`] from the factory and its own
//! [`Simulator`]; nothing mutable is shared between rows. With the `parallel`
//! feature (default) rows are distributed over the rayon thread pool. The
//! merge always follows row order, whatever order rows complete in.
//!
//! # Failures
//!
//! Problems with the scan itself (unknown scan column, bad time grid, invalid
//! solver configuration, failing factory) are reported before any row runs.
//! A row whose integration fails, or whose model yields other variables or
//! reactions than the first model the factory built, is handled by
//! [`FailurePolicy`]:
//!
//! - `Continue` (default): the row is recorded in [`ScanResult::failures`],
//!   the other rows proceed and a partial result is returned
//! - `Abort`: the scan returns [`ScanError::RowFailed`] for the lowest failing
//!   row id
//!
//! # Example
//!
//! ```rust
//! use coculture::models::coculture::{factory, CocultureParameters};
//! use coculture::scan::{Scan, ScanOptions, ScanTable};
//! use coculture::solver::linspace;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let to_scan = ScanTable::grid([("a_e", vec![0.1, 1.0]), ("a_c", vec![0.1, 1.0])])?;
//! let result = Scan::time_course(
//!     factory(CocultureParameters::default()),
//!     &to_scan,
//!     &linspace(0.0, 14.0, 11),
//!     &ScanOptions::default(),
//! )?;
//!
//! assert!(result.failed_rows().is_empty());
//! assert_eq!(result.variables.run_ids(), vec![0, 1, 2, 3]);
//! # Ok(())
//! # }
//! ```

mod cache;
mod table;

pub use cache::{Fingerprint, MemoryCache, ResultCache};
pub use table::ScanTable;

use std::fmt;
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ModelError, ScanError, SimulationError};
use crate::model::Model;
use crate::simulator::{SimulationResult, Simulator};
use crate::solver::{SolverConfiguration, TimeGrid};
use crate::table::{RunTable, TableKind, TimeCourse};

// =================================================================================================
// Options
// =================================================================================================

/// What a scan does with a row whose simulation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the failure, keep the other rows
    #[default]
    Continue,

    /// Fail the whole scan
    Abort,
}

/// Settings shared by every row of a scan
#[derive(Clone)]
pub struct ScanOptions {
    pub solver: SolverConfiguration,

    /// Run rows on the rayon pool; ignored without the `parallel` feature
    pub parallel: bool,

    pub failure_policy: FailurePolicy,

    pub cache: Option<Arc<dyn ResultCache>>,

    /// Mixed into every cache key, see [`ScanOptions::with_model_revision`]
    pub model_revision: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            solver: SolverConfiguration::default(),
            parallel: true,
            failure_policy: FailurePolicy::Continue,
            cache: None,
            model_revision: 0,
        }
    }
}

impl ScanOptions {
    pub fn with_solver(mut self, solver: SolverConfiguration) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Reuse results stored in `cache`, keyed by [`Fingerprint`]
    ///
    /// The key covers the model's names, wiring and values but not the
    /// bodies of its rate functions. Factories sharing a cache that build
    /// same-named models with different rate functions must set distinct
    /// revisions with [`ScanOptions::with_model_revision`].
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_model_revision(mut self, revision: u64) -> Self {
        self.model_revision = revision;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn runs_in_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("solver", &self.solver)
            .field("parallel", &self.parallel)
            .field("failure_policy", &self.failure_policy)
            .field("cache", &self.cache.is_some())
            .field("model_revision", &self.model_revision)
            .finish()
    }
}

// =================================================================================================
// Result
// =================================================================================================

/// A scan row that did not produce a result
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub row: usize,
    pub error: SimulationError,
}

/// Merged output of a scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// The scanned rows, row id = row index
    pub parameters: ScanTable,

    /// Variable trajectories of successful rows, indexed by `(row id, time)`
    pub variables: RunTable,

    /// Reaction rates of successful rows, indexed by `(row id, time)`
    pub fluxes: RunTable,

    /// Failed rows in row order
    pub failures: Vec<RowFailure>,
}

impl ScanResult {
    pub fn failed_rows(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.row).collect()
    }

    pub fn succeeded_rows(&self) -> Vec<usize> {
        self.variables.run_ids()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn table(&self, kind: TableKind) -> &RunTable {
        match kind {
            TableKind::Variables => &self.variables,
            TableKind::Fluxes => &self.fluxes,
        }
    }

    /// Time course of one successful row
    pub fn run(&self, row: usize, kind: TableKind) -> Option<TimeCourse> {
        self.table(kind).run(row)
    }

    /// Parameter overrides that produced `row`
    pub fn overrides(&self, row: usize) -> Option<Vec<(&str, f64)>> {
        self.parameters.row(row)
    }
}

// =================================================================================================
// Scan
// =================================================================================================

type RowOutcome = Result<Arc<SimulationResult>, SimulationError>;

/// Entry point for batch simulations
#[derive(Debug, Clone, Copy)]
pub struct Scan;

impl Scan {
    /// Simulate every row of `to_scan` over `time_points`
    ///
    /// `model_factory` is called once up front to validate the scan and once
    /// per row.
    pub fn time_course<F>(
        model_factory: F,
        to_scan: &ScanTable,
        time_points: &[f64],
        options: &ScanOptions,
    ) -> Result<ScanResult, ScanError>
    where
        F: Fn() -> Result<Model, ModelError> + Sync,
    {
        // ====== Step 1: Validation ======

        let grid = TimeGrid::new(time_points).map_err(SimulationError::from)?;
        options.solver.validate().map_err(SimulationError::from)?;

        let template = model_factory()?;
        for column in to_scan.columns() {
            if template.parameter(column).is_none() {
                return Err(SimulationError::UnknownParameter(column.clone()).into());
            }
        }

        // ====== Step 2: Run rows ======

        let parallel = options.runs_in_parallel();
        info!(
            "scanning {} rows of '{}' over {} time points ({})",
            to_scan.len(),
            template.name(),
            grid.len(),
            if parallel { "parallel" } else { "sequential" }
        );

        let variable_columns: Vec<String> =
            template.variable_names().into_iter().map(String::from).collect();
        let flux_columns: Vec<String> =
            template.reaction_names().into_iter().map(String::from).collect();

        let run_row = |row: usize| -> RowOutcome {
            let result = Self::simulate_row(&model_factory, to_scan, row, &grid, options)?;
            check_columns(&variable_columns, result.variables.columns())?;
            check_columns(&flux_columns, result.fluxes.columns())?;
            Ok(result)
        };
        let abort = options.failure_policy == FailurePolicy::Abort;

        let outcomes: Vec<RowOutcome> = if parallel {
            Self::run_parallel(to_scan.len(), &run_row)
        } else {
            let mut outcomes = Vec::with_capacity(to_scan.len());
            for row in 0..to_scan.len() {
                let outcome = run_row(row);
                let failed = outcome.is_err();
                outcomes.push(outcome);
                if failed && abort {
                    break;
                }
            }
            outcomes
        };

        // ====== Step 3: Merge in row order ======

        let mut succeeded = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (row, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => succeeded.push((row, result)),
                Err(error) => {
                    if abort {
                        return Err(ScanError::RowFailed { row, source: error });
                    }
                    warn!("scan row {} ({}) failed: {}", row, describe(to_scan, row), error);
                    failures.push(RowFailure { row, error });
                }
            }
        }

        let variables = RunTable::concat(
            variable_columns,
            succeeded.iter().map(|(row, result)| (*row, &result.variables)),
        )?;
        let fluxes = RunTable::concat(
            flux_columns,
            succeeded.iter().map(|(row, result)| (*row, &result.fluxes)),
        )?;

        info!(
            "scan finished: {} succeeded, {} failed",
            succeeded.len(),
            failures.len()
        );

        Ok(ScanResult {
            parameters: to_scan.clone(),
            variables,
            fluxes,
            failures,
        })
    }

    fn simulate_row<F>(
        model_factory: &F,
        to_scan: &ScanTable,
        row: usize,
        grid: &TimeGrid,
        options: &ScanOptions,
    ) -> RowOutcome
    where
        F: Fn() -> Result<Model, ModelError>,
    {
        let overrides = to_scan.row(row).into_iter().flatten();
        let mut simulator = Simulator::new(model_factory()?)
            .with_solver(options.solver.clone())
            .update_parameters(overrides)?;

        match &options.cache {
            Some(cache) => {
                let key = Fingerprint::of(simulator.model(), grid.points(), &options.solver)
                    .with_revision(options.model_revision);
                cache.get_or_compute(key, &mut || {
                    simulator.simulate_time_course(grid.points())?.get_result()
                })
            }
            None => simulator
                .simulate_time_course(grid.points())?
                .get_result()
                .map(Arc::new),
        }
    }

    #[cfg(feature = "parallel")]
    fn run_parallel<R>(rows: usize, run_row: &R) -> Vec<RowOutcome>
    where
        R: Fn(usize) -> RowOutcome + Sync,
    {
        (0..rows).into_par_iter().map(run_row).collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel<R>(rows: usize, run_row: &R) -> Vec<RowOutcome>
    where
        R: Fn(usize) -> RowOutcome + Sync,
    {
        (0..rows).map(run_row).collect()
    }
}

fn check_columns(expected: &[String], found: &[String]) -> Result<(), SimulationError> {
    if expected == found {
        Ok(())
    } else {
        Err(SimulationError::ColumnMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        })
    }
}

fn describe(to_scan: &ScanTable, row: usize) -> String {
    to_scan.describe_row(row).unwrap_or_default()
}

// =================================================================================================
// Tests
// =================================================================================================
