//! Grid of subplots, one per scan row
//!
//! ```text
//! ┌──────────── title ────────────┐
//! │ a_e=0.1, a_c=0.1 │ a_e=0.1, … │
//! │   E ─── C ───    │            │
//! ├──────────────────┼────────────┤
//! │ a_e=1, a_c=0.1   │ …          │
//! └──────────────────┴────────────┘
//! ```
//!
//! Rows are laid out in row-id order, `PlotConfig::columns` per line. Failed
//! rows have no data and are skipped.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use super::config::{PlotConfig, NO_TITLE};
use super::time_course::{draw_table_on_area, is_svg, value_range};
use crate::output::ExportError;
use crate::scan::ScanResult;
use crate::table::{TableKind, TimeCourse};

/// Plot one table of every successful scan row in a grid
///
/// # Errors
///
/// [`ExportError::Empty`] if no row succeeded, [`ExportError::Plot`] if the
/// backend fails.
///
/// # Example
///
/// ```rust,ignore
/// let mut config = PlotConfig::scan_grid("E/C competition");
/// config.columns = 3;
/// plot_scan_grid(&scan, TableKind::Variables, Path::new("scan.svg"), Some(&config))?;
/// ```
pub fn plot_scan_grid(
    result: &ScanResult,
    which: TableKind,
    path: &Path,
    config: Option<&PlotConfig>,
) -> Result<(), ExportError> {
    let panels: Vec<(String, TimeCourse)> = result
        .succeeded_rows()
        .into_iter()
        .filter_map(|row| {
            let table = result.run(row, which)?;
            let caption = result.parameters.describe_row(row).unwrap_or_default();
            Some((format!("#{row}: {caption}"), table))
        })
        .collect();

    if panels.is_empty() {
        return Err(ExportError::Empty("scan has no successful rows".to_string()));
    }

    let default_config = PlotConfig::scan_grid(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let rendered = if is_svg(path) {
        let backend = SVGBackend::new(path, (config.width, config.height));
        plot_scan_grid_impl(backend, &panels, which, config)
    } else {
        let backend = BitMapBackend::new(path, (config.width, config.height));
        plot_scan_grid_impl(backend, &panels, which, config)
    };
    rendered.map_err(|e| ExportError::Plot(e.to_string()))
}

/// `(rows, columns)` of a grid holding `panels` subplots
pub(crate) fn grid_shape(panels: usize, columns: usize) -> (usize, usize) {
    let columns = columns.clamp(1, panels.max(1));
    (panels.div_ceil(columns).max(1), columns)
}

fn plot_scan_grid_impl<DB: DrawingBackend>(
    backend: DB,
    panels: &[(String, TimeCourse)],
    which: TableKind,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;
    let body = root.titled(&config.title, ("sans-serif", 32))?;

    let shared = config
        .shared_y
        .then(|| value_range(panels.iter().map(|(_, table)| table)));

    let (rows, columns) = grid_shape(panels.len(), config.columns);
    let areas = body.split_evenly((rows, columns));

    for ((caption, table), area) in panels.iter().zip(areas.iter()) {
        let y_range = shared.unwrap_or_else(|| value_range([table]));
        draw_table_on_area(area, caption, table, which, config, y_range, 18)?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coculture::{factory, CocultureParameters};
    use crate::scan::{Scan, ScanOptions, ScanTable};
    use crate::solver::{linspace, SolverConfiguration};

    fn scan(table: &ScanTable, options: &ScanOptions) -> ScanResult {
        Scan::time_course(
            factory(CocultureParameters::default()),
            table,
            &linspace(0.0, 14.0, 11),
            options,
        )
        .unwrap()
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(4, 2), (2, 2));
        assert_eq!(grid_shape(5, 2), (3, 2));
        assert_eq!(grid_shape(1, 3), (1, 1));
        assert_eq!(grid_shape(3, 0), (3, 1));
    }

    #[test]
    fn test_plot_scan_grid_svg() {
        let table = ScanTable::grid([("a_e", vec![0.1, 1.0]), ("a_c", vec![0.1, 1.0])]).unwrap();
        let result = scan(&table, &ScanOptions::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.svg");
        plot_scan_grid(&result, TableKind::Variables, &path, None).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("a_e=1, a_c=0.1"));
    }

    #[test]
    fn test_plot_scan_grid_per_panel_axes() {
        let table = ScanTable::grid([("mu_e", vec![0.2, 0.4, 0.6])]).unwrap();
        let result = scan(&table, &ScanOptions::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fluxes.svg");
        let config = PlotConfig {
            columns: 3,
            shared_y: false,
            ..PlotConfig::scan_grid("Growth rates")
        };
        plot_scan_grid(&result, TableKind::Fluxes, &path, Some(&config)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_all_rows_failed() {
        let table = ScanTable::grid([("mu_e", vec![0.4])]).unwrap();
        let options = ScanOptions::default().with_solver(SolverConfiguration::rk4(10).with_max_steps(1));
        let result = scan(&table, &options);
        assert_eq!(result.failed_rows(), vec![0]);

        let dir = tempfile::tempdir().unwrap();
        let err = plot_scan_grid(&result, TableKind::Variables, &dir.path().join("x.svg"), None)
            .unwrap_err();
        assert!(matches!(err, ExportError::Empty(_)));
    }
}
