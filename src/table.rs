//! Tabular simulation output
//!
//! - [`TimeCourse`]: rows indexed by time, one column per variable or reaction
//! - [`RunTable`]: several time courses stacked, rows indexed by `(run, time)`
//!
//! Values live in a row-major view over an `nalgebra::DMatrix` (rows = time
//! points), so a column is a contiguous trajectory of one quantity.

use nalgebra::{DMatrix, DVector};

use crate::error::SimulationError;

/// Which of the two result tables to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Variables,
    Fluxes,
}

impl TableKind {
    pub fn label(&self) -> &'static str {
        match self {
            TableKind::Variables => "variables",
            TableKind::Fluxes => "fluxes",
        }
    }
}

// =================================================================================================
// TimeCourse
// =================================================================================================

/// Values of named quantities at successive time points
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCourse {
    time: Vec<f64>,
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl TimeCourse {
    /// Build from one state vector per time point
    ///
    /// Every state must have `columns.len()` components.
    pub fn from_states(time: Vec<f64>, columns: Vec<String>, states: &[DVector<f64>]) -> Self {
        debug_assert_eq!(time.len(), states.len());
        let values = DMatrix::from_fn(states.len(), columns.len(), |i, j| states[i][j]);
        Self {
            time,
            columns,
            values,
        }
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw matrix, rows = time points, columns = quantities
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Trajectory of one quantity
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.column_index(name)?;
        Some(self.values.column(j).iter().copied().collect())
    }

    /// Value of `name` at row `row`
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let j = self.column_index(name)?;
        (row < self.len()).then(|| self.values[(row, j)])
    }

    /// All quantities at row `row`
    pub fn row(&self, row: usize) -> Option<Vec<f64>> {
        (row < self.len()).then(|| self.values.row(row).iter().copied().collect())
    }

    /// Last row, if any
    pub fn last_row(&self) -> Option<Vec<f64>> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }
}

// =================================================================================================
// RunTable
// =================================================================================================

/// Time courses of several runs, rows indexed by `(run id, time)`
///
/// Rows are grouped by run in the order runs were appended; run ids need
/// not be contiguous (failed runs leave gaps).
#[derive(Debug, Clone, PartialEq)]
pub struct RunTable {
    index: Vec<(usize, f64)>,
    columns: Vec<String>,
    values: DMatrix<f64>,
}

impl RunTable {
    /// Stack time courses under their run ids
    ///
    /// Fails on the first time course whose columns differ from `columns`.
    pub fn concat<'a, I>(columns: Vec<String>, runs: I) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = (usize, &'a TimeCourse)>,
    {
        let mut index = Vec::new();
        let mut data = Vec::new();

        for (run, course) in runs {
            if course.columns != columns {
                return Err(SimulationError::ColumnMismatch {
                    expected: columns,
                    found: course.columns.clone(),
                });
            }
            for (i, &t) in course.time.iter().enumerate() {
                index.push((run, t));
                data.extend(course.values.row(i).iter().copied());
            }
        }

        let values = DMatrix::from_row_iterator(index.len(), columns.len(), data);
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    pub fn index(&self) -> &[(usize, f64)] {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Distinct run ids in row order
    pub fn run_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = Vec::new();
        for &(run, _) in &self.index {
            if ids.last() != Some(&run) {
                ids.push(run);
            }
        }
        ids
    }

    /// The time course of one run
    pub fn run(&self, run: usize) -> Option<TimeCourse> {
        let rows: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, (r, _))| *r == run)
            .map(|(i, _)| i)
            .collect();
        if rows.is_empty() {
            return None;
        }

        let time = rows.iter().map(|&i| self.index[i].1).collect();
        let values = self.values.select_rows(rows.iter());
        Some(TimeCourse {
            time,
            columns: self.columns.clone(),
            values,
        })
    }

    /// One column across all runs
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(j).iter().copied().collect())
    }

    /// Value at `(run, time)`; exact time match
    pub fn value(&self, run: usize, time: f64, name: &str) -> Option<f64> {
        let j = self.columns.iter().position(|c| c == name)?;
        let i = self.index.iter().position(|&(r, t)| r == run && t == time)?;
        Some(self.values[(i, j)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(offset: f64) -> TimeCourse {
        TimeCourse::from_states(
            vec![0.0, 1.0],
            vec!["a".to_string(), "b".to_string()],
            &[
                DVector::from_vec(vec![offset, offset + 1.0]),
                DVector::from_vec(vec![offset + 2.0, offset + 3.0]),
            ],
        )
    }

    #[test]
    fn test_time_course_access() {
        let tc = course(0.0);
        assert_eq!(tc.len(), 2);
        assert_eq!(tc.column("b"), Some(vec![1.0, 3.0]));
        assert_eq!(tc.value(1, "a"), Some(2.0));
        assert_eq!(tc.value(2, "a"), None);
        assert_eq!(tc.row(0), Some(vec![0.0, 1.0]));
        assert_eq!(tc.last_row(), Some(vec![2.0, 3.0]));
        assert_eq!(tc.column("missing"), None);
    }

    #[test]
    fn test_run_table_concat_and_split() {
        let first = course(0.0);
        let third = course(10.0);
        let table = RunTable::concat(
            vec!["a".to_string(), "b".to_string()],
            [(0, &first), (2, &third)],
        )
        .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.run_ids(), vec![0, 2]);
        assert_eq!(table.index()[2], (2, 0.0));
        assert_eq!(table.value(2, 1.0, "b"), Some(13.0));
        assert_eq!(table.run(2), Some(third));
        assert_eq!(table.run(1), None);
        assert_eq!(table.column("a"), Some(vec![0.0, 2.0, 10.0, 12.0]));
    }

    #[test]
    fn test_run_table_rejects_mismatched_columns() {
        let first = course(0.0);
        let other = TimeCourse::from_states(
            vec![0.0],
            vec!["z".to_string()],
            &[DVector::from_vec(vec![1.0])],
        );
        let err = RunTable::concat(
            vec!["a".to_string(), "b".to_string()],
            [(0, &first), (1, &other)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimulationError::ColumnMismatch {
                expected: vec!["a".to_string(), "b".to_string()],
                found: vec!["z".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_run_table() {
        let table = RunTable::concat(vec!["a".to_string()], std::iter::empty()).unwrap();
        assert!(table.is_empty());
        assert!(table.run_ids().is_empty());
        assert_eq!(table.values().nrows(), 0);
    }
}
