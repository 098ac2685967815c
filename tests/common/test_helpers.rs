//! Helper functions for integration tests

#![allow(dead_code)]

use coculture::TimeCourse;

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Largest relative error between two equally long series
pub fn max_relative_error(actual: &[f64], expected: &[f64]) -> f64 {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| relative_error(*a, *e))
        .fold(0.0, f64::max)
}

/// Assert that two tables have the same columns and close values
pub fn assert_columns_close(left: &TimeCourse, right: &TimeCourse, tolerance: f64, message: &str) {
    assert_eq!(left.columns(), right.columns(), "{}: column mismatch", message);
    assert_eq!(left.time(), right.time(), "{}: time mismatch", message);

    for name in left.columns() {
        let a = left.column(name).unwrap();
        let b = right.column(name).unwrap();
        let err = max_relative_error(&a, &b);
        assert!(
            err < tolerance,
            "{}: column '{}' differs by {:e} (tolerance {:e})",
            message,
            name,
            err,
            tolerance
        );
    }
}
