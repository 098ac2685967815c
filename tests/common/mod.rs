//! Common utilities for integration tests

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{exponential_decay, exponential_growth, linear_production};
pub use test_helpers::{assert_columns_close, max_relative_error, relative_error};
