//! Example: E/C co-culture - competition and necromass scan
//!
//! Scans how strongly `E` crowds out `C` (`a_e`) against how much `C` gains
//! from dead `E` (`a_c`), then exports the merged tables and plots.
//!
//! **Model**:
//! - dE/dt = mu_e·E - delta_e·E
//! - dC/dt = mu_c·C·(1 - theta·C - a_e·theta·E) + a_c·delta_e·E·(1 - theta·C) - delta_c·C
//!
//! **Outputs** (in the system temp directory):
//! - `coculture_variables.csv`, `coculture_fluxes.csv`
//! - `coculture_variables.svg`, `coculture_fluxes.svg`
//! - `coculture_reference.png`: the default parameters alone
//!
//! Run with `RUST_LOG=info` to follow the scan.

use coculture::{
    models::coculture::{build_model, factory, CocultureParameters, A_C, A_E, C, E},
    output::{plot_scan_grid, plot_time_course, CsvConfig, CsvExporter, Exporter, PlotConfig},
    prelude::*,
};

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("═══════════════════════════════════════════════════════");
    println!("  E/C Co-culture - Competition × Necromass Scan");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Model parameters ======

    let params = CocultureParameters::default();
    println!("Default parameters:");
    println!("  E0, C0   : {}, {}", params.e0, params.c0);
    println!("  mu_e     : {}", params.mu_e);
    println!("  delta_e  : {}", params.delta_e);
    println!("  mu_c     : {}", params.mu_c);
    println!("  delta_c  : {}", params.delta_c);
    println!("  theta    : {} (capacity {})\n", params.theta, 1.0 / params.theta);

    let time = linspace(0.0, 14.0, 57);
    let tmp_dir = std::env::temp_dir();

    // =============================================================================================
    // Reference run
    // =============================================================================================

    let reference = Simulator::new(build_model(&params)?)
        .simulate_time_course(&time)?
        .get_result()?;

    let e_end = reference.variables.value(time.len() - 1, E).unwrap_or(f64::NAN);
    let c_end = reference.variables.value(time.len() - 1, C).unwrap_or(f64::NAN);
    println!("Reference run at t = 14: E = {:.3}, C = {:.3}\n", e_end, c_end);

    plot_time_course(
        &reference,
        TableKind::Variables,
        &tmp_dir.join("coculture_reference.png"),
        Some(&PlotConfig::time_course("Default co-culture")),
    )?;

    // =============================================================================================
    // Scan
    // =============================================================================================

    let to_scan = ScanTable::grid([
        (A_E, vec![0.0, 0.5, 1.0, 2.0]),
        (A_C, vec![0.1, 1.0]),
    ])?;

    println!("Scanning {} rows ...", to_scan.len());
    let started = Instant::now();
    let scan = Scan::time_course(factory(params), &to_scan, &time, &ScanOptions::default())?;
    println!("✓ {:.3}s\n", started.elapsed().as_secs_f64());

    println!("{:<5} {:<22} {:>12} {:>12}", "Row", "Overrides", "E(14)", "C(14)");
    println!("{:-<55}", "");
    for row in scan.succeeded_rows() {
        let label = scan.parameters.describe_row(row).unwrap_or_default();
        let e = scan.variables.value(row, 14.0, E).unwrap_or(f64::NAN);
        let c = scan.variables.value(row, 14.0, C).unwrap_or(f64::NAN);
        println!("{:<5} {:<22} {:>12.3} {:>12.3}", row, label, e, c);
    }
    for failure in &scan.failures {
        println!("{:<5} failed: {}", failure.row, failure.error);
    }

    // =============================================================================================
    // Export
    // =============================================================================================

    let exporter = CsvExporter::new(CsvConfig::default().precision(6).with_header());

    for which in [TableKind::Variables, TableKind::Fluxes] {
        let csv_path = tmp_dir.join(format!("coculture_{}.csv", which.label()));
        exporter.export_scan(&scan, which, &csv_path)?;

        let svg_path = tmp_dir.join(format!("coculture_{}.svg", which.label()));
        let config = PlotConfig {
            columns: 4,
            ..PlotConfig::scan_grid(format!("Co-culture {}", which.label()))
        };
        plot_scan_grid(&scan, which, &svg_path, Some(&config))?;

        println!("\n{}:", which.label());
        println!("  {}", csv_path.display());
        println!("  {}", svg_path.display());
    }

    Ok(())
}
