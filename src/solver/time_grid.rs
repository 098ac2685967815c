//! Output time grid
//!
//! A [`TimeGrid`] is the validated list of times at which a trajectory is
//! reported. Solvers integrate from the first point and must land exactly on
//! every following one.

use crate::error::IntegrationError;

/// Non-empty, finite, non-decreasing sequence of output times
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// Validate a caller-supplied grid
    ///
    /// Repeated points are allowed and yield repeated states.
    ///
    /// # Errors
    ///
    /// [`IntegrationError::InvalidTimeGrid`] if the grid is empty, contains
    /// NaN/Inf or decreases anywhere.
    pub fn new(points: &[f64]) -> Result<Self, IntegrationError> {
        if points.is_empty() {
            return Err(IntegrationError::InvalidTimeGrid(
                "at least one time point is required".to_string(),
            ));
        }
        if let Some(bad) = points.iter().find(|t| !t.is_finite()) {
            return Err(IntegrationError::InvalidTimeGrid(format!(
                "time point {} is not finite",
                bad
            )));
        }
        if let Some(i) = points.windows(2).position(|w| w[1] < w[0]) {
            return Err(IntegrationError::InvalidTimeGrid(format!(
                "time points decrease at index {} ({} -> {})",
                i + 1,
                points[i],
                points[i + 1]
            )));
        }
        Ok(Self {
            points: points.to_vec(),
        })
    }

    /// `count` evenly spaced points from `start` to `end` inclusive
    ///
    /// ```rust
    /// use coculture::solver::TimeGrid;
    ///
    /// let grid = TimeGrid::linspace(0.0, 14.0, 11).unwrap();
    /// assert_eq!(grid.len(), 11);
    /// assert_eq!(grid.points()[10], 14.0);
    /// ```
    pub fn linspace(start: f64, end: f64, count: usize) -> Result<Self, IntegrationError> {
        Self::new(&linspace(start, end, count))
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive `(from, to)` output intervals
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Evenly spaced values, endpoints included
///
/// Each value is computed from its index so the last point is exactly `end`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
