//! Example: co-culture scan driven by a TOML settings file
//!
//! ```bash
//! cargo run --example scan_from_config -- demos/coculture_scan.toml out/
//! ```
//!
//! Both arguments are optional. The settings default to
//! `demos/coculture_scan.toml`, the output directory to the system temp
//! directory. Writes one CSV and one SVG per table.

use std::path::PathBuf;

use coculture::{
    config::ScanSettings,
    output::{plot_scan_grid, CsvConfig, CsvExporter, Exporter, PlotConfig},
    prelude::*,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/coculture_scan.toml"));
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&out_dir)?;

    // ====== Settings ======

    let settings = ScanSettings::from_file(&settings_path)?;
    let to_scan = settings.to_scan_table()?;
    let time = settings.time_points()?;
    let options = settings.scan_options()?;

    println!("Settings : {}", settings_path.display());
    println!("Rows     : {} over {:?}", to_scan.len(), to_scan.columns());
    println!("Time     : {} points in [{}, {}]", time.len(), settings.time.start, settings.time.end);
    println!("Solver   : {:?}\n", options.solver.method);

    // ====== Scan ======

    let scan = Scan::time_course(settings.model_factory(), &to_scan, &time, &options)?;

    if !scan.is_complete() {
        println!("{} of {} rows failed:", scan.failures.len(), to_scan.len());
        for failure in &scan.failures {
            let label = to_scan.describe_row(failure.row).unwrap_or_default();
            println!("  #{} ({}): {}", failure.row, label, failure.error);
        }
    }

    // ====== Export ======

    let exporter = CsvExporter::new(CsvConfig::default().with_header());
    for which in [TableKind::Variables, TableKind::Fluxes] {
        let csv_path = out_dir.join(format!("scan_{}.csv", which.label()));
        let svg_path = out_dir.join(format!("scan_{}.svg", which.label()));

        exporter.export_scan(&scan, which, &csv_path)?;
        plot_scan_grid(&scan, which, &svg_path, Some(&PlotConfig::scan_grid(format!(
            "{} ({} rows)",
            which.label(),
            scan.succeeded_rows().len()
        ))))?;

        println!("✓ {} -> {}, {}", which.label(), csv_path.display(), svg_path.display());
    }

    Ok(())
}
