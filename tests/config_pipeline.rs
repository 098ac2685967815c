//! Settings file to CSV and plots, the way the demos drive the crate

use std::fs;

use coculture::config::ScanSettings;
use coculture::models::coculture::{A_C, A_E, C, E, V_NECROMASS_C};
use coculture::output::{plot_scan_grid, CsvConfig, CsvExporter, Exporter, PlotConfig};
use coculture::prelude::*;

const SETTINGS: &str = r#"
[time]
start = 0.0
end = 14.0
points = 8

[solver]
method = "dormand-prince"
rtol = 1e-8
atol = 1e-10

[scan]
parallel = true
failure_policy = "continue"

[model]
theta = 0.002

[grid]
a_e = [0.1, 1.0]
a_c = [0.1, 0.5]

[[scenarios]]
a_e = 4.0
a_c = 0.0
"#;

fn run_settings(settings: &ScanSettings) -> ScanResult {
    Scan::time_course(
        settings.model_factory(),
        &settings.to_scan_table().unwrap(),
        &settings.time_points().unwrap(),
        &settings.scan_options().unwrap(),
    )
    .unwrap()
}

#[test]
fn test_settings_drive_a_complete_scan() {
    let settings = ScanSettings::from_toml_str(SETTINGS).unwrap();
    let result = run_settings(&settings);

    assert!(result.is_complete());
    assert_eq!(result.parameters.columns(), [A_E, A_C]);
    assert_eq!(result.parameters.len(), 5);
    assert_eq!(result.overrides(4).unwrap(), vec![(A_E, 4.0), (A_C, 0.0)]);
    assert_eq!(result.variables.len(), 5 * 8);

    // theta from [model] applies to every row: C stays under 1 / theta
    let c = result.variables.column(C).unwrap();
    assert!(c.iter().all(|&v| v < 500.0));
}

#[test]
fn test_scan_exports_to_csv() {
    let settings = ScanSettings::from_toml_str(SETTINGS).unwrap();
    let result = run_settings(&settings);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("variables.csv");
    CsvExporter::new(CsvConfig::default().with_header())
        .export_scan(&result, TableKind::Variables, &path)
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("# Co-culture simulation data"));
    assert!(text.contains("# Model: coculture"));

    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_path(&path)
        .unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["run", "time", "a_e", "a_c", "E", "C"]
    );

    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 5 * 8);

    let last = &records[records.len() - 1];
    assert_eq!(&last[0], "4");
    assert_eq!(last[2].parse::<f64>().unwrap(), 4.0);
    let e: f64 = last[4].parse().unwrap();
    assert_eq!(Some(e), result.variables.value(4, 14.0, E));
}

#[test]
fn test_scan_grid_plot_from_settings() {
    let settings = ScanSettings::from_toml_str(SETTINGS).unwrap();
    let result = run_settings(&settings);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fluxes.svg");
    let config = PlotConfig {
        columns: 3,
        ..PlotConfig::scan_grid("Fluxes")
    };
    plot_scan_grid(&result, TableKind::Fluxes, &path, Some(&config)).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("a_e=4, a_c=0"));
    assert!(svg.contains(V_NECROMASS_C));
}

#[test]
fn test_settings_file_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.toml");
    fs::write(&path, SETTINGS).unwrap();

    let settings = ScanSettings::from_file(&path).unwrap();
    assert_eq!(settings.time_points().unwrap().len(), 8);
    assert_eq!(settings.grid.len(), 2);
    assert_eq!(settings.scenarios.len(), 1);
}
