//! Line charts of one run, and the drawing routine shared with scan grids

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::config::{PlotConfig, NO_TITLE};
use crate::output::ExportError;
use crate::simulator::SimulationResult;
use crate::table::{TableKind, TimeCourse};

/// Plot every column of one result table against time
///
/// The backend follows the file extension: `.svg` gives SVG, anything else
/// a bitmap.
///
/// # Example
///
/// ```rust,ignore
/// plot_time_course(&result, TableKind::Variables, Path::new("run.svg"), None)?;
/// ```
pub fn plot_time_course(
    result: &SimulationResult,
    which: TableKind,
    path: &Path,
    config: Option<&PlotConfig>,
) -> Result<(), ExportError> {
    let table = result.table(which);
    if table.is_empty() {
        return Err(ExportError::Empty(format!("{} table has no rows", which.label())));
    }

    let default_config = PlotConfig::time_course(NO_TITLE);
    let config = config.unwrap_or(&default_config);
    let y_range = value_range(std::iter::once(table));

    let rendered = if is_svg(path) {
        let backend = SVGBackend::new(path, (config.width, config.height));
        plot_time_course_impl(backend, table, which, config, y_range)
    } else {
        let backend = BitMapBackend::new(path, (config.width, config.height));
        plot_time_course_impl(backend, table, which, config, y_range)
    };
    rendered.map_err(|e| ExportError::Plot(e.to_string()))
}

fn plot_time_course_impl<DB: DrawingBackend>(
    backend: DB,
    table: &TimeCourse,
    which: TableKind,
    config: &PlotConfig,
    y_range: (f64, f64),
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;
    draw_table_on_area(&root, &config.title, table, which, config, y_range, 32)?;
    root.present()?;
    Ok(())
}

// =================================================================================================
// Shared helpers
// =================================================================================================

pub(super) fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// Finite min/max over every value of the tables, padded for display
pub(super) fn value_range<'a>(tables: impl IntoIterator<Item = &'a TimeCourse>) -> (f64, f64) {
    let (mut low, mut high) = (f64::INFINITY, f64::NEG_INFINITY);
    for table in tables {
        for &v in table.values().iter().filter(|v| v.is_finite()) {
            low = low.min(v);
            high = high.max(v);
        }
    }
    if !low.is_finite() || !high.is_finite() {
        return (0.0, 1.0);
    }
    let low = low.min(0.0);
    if high - low < 1e-12 {
        return (low, low + 1.0);
    }
    (low, high + 0.05 * (high - low))
}

/// Draw one table as a line chart with legend on `area`
pub(super) fn draw_table_on_area<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    table: &TimeCourse,
    which: TableKind,
    config: &PlotConfig,
    y_range: (f64, f64),
    caption_size: u32,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let time = table.time();
    let t_start = time.first().copied().unwrap_or(0.0);
    let mut t_end = time.last().copied().unwrap_or(1.0);
    if t_end <= t_start {
        t_end = t_start + 1.0;
    }

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t_start..t_end, y_range.0..y_range.1)?;

    let ylabel = if config.ylabel.is_empty() {
        which.label()
    } else {
        config.ylabel.as_str()
    };

    let mut mesh = chart.configure_mesh();
    if !config.show_grid {
        mesh.disable_mesh();
    }
    mesh.x_desc(config.xlabel.as_str())
        .y_desc(ylabel)
        .x_label_formatter(&|x| format!("{:.1}", x))
        .y_label_formatter(&|y| format!("{:.3}", y))
        .draw()?;

    for (k, name) in table.columns().iter().enumerate() {
        let color = config.series_color(k);
        let values = table.values().column(k);

        chart
            .draw_series(LineSeries::new(
                time.iter().zip(values.iter()).map(|(t, v)| (*t, *v)),
                ShapeStyle::from(&color).stroke_width(config.line_width),
            ))?
            .label(name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&config.background.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coculture::{build_model, CocultureParameters};
    use crate::simulator::Simulator;
    use crate::solver::linspace;

    fn run() -> SimulationResult {
        Simulator::new(build_model(&CocultureParameters::default()).unwrap())
            .simulate_time_course(&linspace(0.0, 14.0, 11))
            .unwrap()
            .get_result()
            .unwrap()
    }

    #[test]
    fn test_value_range() {
        let result = run();
        let (low, high) = value_range([&result.variables]);
        assert_eq!(low, 0.0);
        assert!(high > 333.0);
    }

    #[test]
    fn test_value_range_constant_table() {
        let table = TimeCourse::from_states(
            vec![0.0],
            vec!["x".to_string()],
            &[nalgebra::DVector::from_vec(vec![2.0])],
        );
        let (low, high) = value_range([&table]);
        assert_eq!(low, 0.0);
        approx::assert_relative_eq!(high, 2.1);
    }

    #[test]
    fn test_is_svg() {
        assert!(is_svg(Path::new("a/b.svg")));
        assert!(is_svg(Path::new("b.SVG")));
        assert!(!is_svg(Path::new("b.png")));
        assert!(!is_svg(Path::new("b")));
    }

    #[test]
    fn test_plot_time_course_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.svg");
        plot_time_course(&run(), TableKind::Variables, &path, None).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("polyline"));
    }

    #[test]
    fn test_plot_fluxes_with_custom_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fluxes.svg");
        let config = PlotConfig {
            show_grid: false,
            ylabel: "rate".to_string(),
            ..PlotConfig::time_course("Fluxes")
        };
        plot_time_course(&run(), TableKind::Fluxes, &path, Some(&config)).unwrap();
        assert!(path.exists());
    }
}
