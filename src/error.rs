//! Error taxonomy
//!
//! Errors are split by the layer that raises them:
//!
//! | Layer        | Type               | When                                   |
//! |--------------|--------------------|----------------------------------------|
//! | Construction | [`ModelError`]     | building a model, fail fast            |
//! | Numerics     | [`IntegrationError`] | one integration run                  |
//! | Simulation   | [`SimulationError`] | overlays, runs, result extraction     |
//! | Scan         | [`ScanError`]      | a batch of simulations                 |
//!
//! Construction errors are never recoverable by retrying: the model definition
//! has to be fixed. Integration errors are fatal for a standalone simulation
//! and isolated to their row inside a scan.

use thiserror::Error;

// =================================================================================================
// Construction errors
// =================================================================================================

/// Errors raised while building a [`Model`](crate::model::Model).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A variable, parameter or reaction name is already taken.
    #[error("name '{name}' is already declared as a {existing}")]
    DuplicateName { name: String, existing: &'static str },

    /// A reaction argument or stoichiometry key does not resolve.
    #[error("reaction '{reaction}' references unknown {expected} '{name}'")]
    UnknownReference {
        reaction: String,
        name: String,
        expected: &'static str,
    },

    /// A stoichiometry lists the same variable twice.
    #[error("reaction '{reaction}' lists variable '{variable}' twice in its stoichiometry")]
    DuplicateStoichiometry { reaction: String, variable: String },

    /// Reaction outputs depend on each other in a loop.
    #[error("cyclic dependency between reactions: {}", reactions.join(" -> "))]
    CyclicDependency { reactions: Vec<String> },
}

// =================================================================================================
// Numerical errors
// =================================================================================================

/// Failures of a single numerical integration run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrationError {
    #[error("invalid time grid: {0}")]
    InvalidTimeGrid(String),

    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),

    /// NaN or Inf showed up in the state vector.
    #[error("non-finite value {value} in '{variable}' at t = {time} (step {step})")]
    NonFiniteState {
        variable: String,
        value: f64,
        time: f64,
        step: usize,
    },

    #[error("step size {step_size:e} fell below the minimum at t = {time}")]
    StepSizeUnderflow { time: f64, step_size: f64 },

    #[error("exceeded {max_steps} steps at t = {time}")]
    MaxStepsExceeded { max_steps: usize, time: f64 },

    #[error("wall-clock budget of {budget_ms} ms exhausted at t = {time}")]
    TimeBudgetExceeded { budget_ms: u128, time: f64 },
}

// =================================================================================================
// Simulation errors
// =================================================================================================

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("integration failed: {source}")]
    Integration {
        #[from]
        source: IntegrationError,
    },

    /// Results were requested before a successful run.
    #[error("no simulation result available; run simulate_time_course first")]
    NoResult,

    /// A result's columns differ from the ones it is merged under.
    #[error("result columns [{}] do not match [{}]", found.join(", "), expected.join(", "))]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

// =================================================================================================
// Scan errors
// =================================================================================================

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScanError {
    #[error("model factory failed: {0}")]
    Model(#[from] ModelError),

    /// Raised before any row runs (unknown scan column, bad time grid).
    #[error("scan rejected: {0}")]
    Simulation(#[from] SimulationError),

    /// Only returned under [`FailurePolicy::Abort`](crate::scan::FailurePolicy::Abort).
    #[error("scan row {row} failed: {source}")]
    RowFailed {
        row: usize,
        #[source]
        source: SimulationError,
    },

    #[error("scan table is malformed: {0}")]
    InvalidTable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_reactions() {
        let err = ModelError::CyclicDependency {
            reactions: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "cyclic dependency between reactions: a -> b");
    }

    #[test]
    fn test_integration_error_converts_into_simulation_error() {
        let err: SimulationError = IntegrationError::MaxStepsExceeded {
            max_steps: 10,
            time: 1.0,
        }
        .into();
        assert!(matches!(err, SimulationError::Integration { .. }));
        assert!(err.to_string().contains("exceeded 10 steps"));
    }

    #[test]
    fn test_column_mismatch_message() {
        let err = SimulationError::ColumnMismatch {
            expected: vec!["x".to_string()],
            found: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(err.to_string(), "result columns [x, y] do not match [x]");
    }
}
