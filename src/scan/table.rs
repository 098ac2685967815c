//! Parameter-override rows for a scan

use std::fmt::Write as _;

use indexmap::IndexSet;

use crate::error::ScanError;

/// Named parameter columns and one row of values per scenario
///
/// ```rust
/// use coculture::scan::ScanTable;
///
/// let table = ScanTable::grid([("a_e", vec![0.1, 0.5]), ("a_c", vec![0.0, 1.0])]).unwrap();
/// assert_eq!(table.len(), 4);
/// assert_eq!(table.row(1).unwrap(), vec![("a_e", 0.1), ("a_c", 1.0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ScanTable {
    /// Empty table with the given columns
    ///
    /// # Errors
    ///
    /// [`ScanError::InvalidTable`] if a column name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique = IndexSet::new();
        for column in columns {
            let column = column.into();
            if !unique.insert(column.clone()) {
                return Err(ScanError::InvalidTable(format!("duplicate column '{column}'")));
            }
        }
        Ok(Self {
            columns: unique.into_iter().collect(),
            rows: Vec::new(),
        })
    }

    /// Append one row; values follow column order
    pub fn push_row(&mut self, values: &[f64]) -> Result<(), ScanError> {
        if values.len() != self.columns.len() {
            return Err(ScanError::InvalidTable(format!(
                "row has {} values, table has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(values.to_vec());
        Ok(())
    }

    pub fn with_row(mut self, values: &[f64]) -> Result<Self, ScanError> {
        self.push_row(values)?;
        Ok(self)
    }

    /// Cartesian product of the axes, last axis varying fastest
    ///
    /// No axes gives a single row without overrides; an empty axis gives no
    /// rows.
    pub fn grid<I, S, V>(axes: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: AsRef<[f64]>,
    {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) = axes
            .into_iter()
            .map(|(name, values)| (name.into(), values.as_ref().to_vec()))
            .unzip();

        let mut table = Self::new(names)?;
        let mut rows: Vec<Vec<f64>> = vec![Vec::new()];
        for axis in &values {
            rows = rows
                .iter()
                .flat_map(|prefix| {
                    axis.iter().map(move |&v| {
                        let mut row = prefix.clone();
                        row.push(v);
                        row
                    })
                })
                .collect();
        }
        table.rows = rows;
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Overrides of row `index` as `(parameter, value)` pairs
    pub fn row(&self, index: usize) -> Option<Vec<(&str, f64)>> {
        let values = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .map(String::as_str)
                .zip(values.iter().copied())
                .collect(),
        )
    }

    pub fn value(&self, index: usize, column: &str) -> Option<f64> {
        let j = self.columns.iter().position(|c| c == column)?;
        self.rows.get(index).map(|row| row[j])
    }

    /// `a_e=0.1, a_c=0.5`, or `defaults` for a row without overrides
    pub fn describe_row(&self, index: usize) -> Option<String> {
        let row = self.row(index)?;
        if row.is_empty() {
            return Some("defaults".to_string());
        }
        let mut label = String::new();
        for (i, (name, value)) in row.iter().enumerate() {
            if i > 0 {
                label.push_str(", ");
            }
            let _ = write!(label, "{name}={value}");
        }
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_checks_width() {
        let mut table = ScanTable::new(["a", "b"]).unwrap();
        assert!(table.push_row(&[1.0, 2.0]).is_ok());
        assert!(matches!(table.push_row(&[1.0]), Err(ScanError::InvalidTable(_))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        assert!(matches!(ScanTable::new(["a", "a"]), Err(ScanError::InvalidTable(_))));
    }

    #[test]
    fn test_grid_order() {
        let table = ScanTable::grid([("x", vec![1.0, 2.0]), ("y", vec![10.0, 20.0, 30.0])]).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.row(0).unwrap(), vec![("x", 1.0), ("y", 10.0)]);
        assert_eq!(table.row(2).unwrap(), vec![("x", 1.0), ("y", 30.0)]);
        assert_eq!(table.row(3).unwrap(), vec![("x", 2.0), ("y", 10.0)]);
        assert_eq!(table.value(5, "y"), Some(30.0));
        assert!(table.row(6).is_none());
    }

    #[test]
    fn test_grid_edge_cases() {
        let none: [(&str, Vec<f64>); 0] = [];
        let table = ScanTable::grid(none).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.describe_row(0).as_deref(), Some("defaults"));

        let empty_axis = ScanTable::grid([("x", vec![1.0]), ("y", Vec::new())]).unwrap();
        assert!(empty_axis.is_empty());
    }

    #[test]
    fn test_describe_row() {
        let table = ScanTable::new(["a_e", "a_c"]).unwrap().with_row(&[0.1, 0.5]).unwrap();
        assert_eq!(table.describe_row(0).as_deref(), Some("a_e=0.1, a_c=0.5"));
        assert_eq!(table.describe_row(1), None);
    }
}
