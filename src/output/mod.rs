//! Output module for simulation results
//!
//! This module turns results into files:
//! - **Visualization**: PNG/SVG line charts using plotters
//! - **Export**: CSV tables for external analysis
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file (ExportError)
//! ├── visualization/      ← Plots and graphics
//! │   ├── config.rs
//! │   ├── time_course.rs
//! │   └── scan_grid.rs
//! └── export/             ← Data export
//!     ├── mod.rs          ← Exporter trait
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use coculture::output::{plot_scan_grid, CsvExporter, Exporter, PlotConfig};
//! use coculture::TableKind;
//!
//! CsvExporter::default().export_scan(&scan, TableKind::Variables, Path::new("scan.csv"))?;
//! plot_scan_grid(&scan, TableKind::Variables, Path::new("scan.svg"), None)?;
//! ```
//!
//! Both sub-modules read [`TableKind`](crate::table::TableKind) to choose between
//! the variables and the fluxes of a result.

pub mod export;
pub mod visualization;

use thiserror::Error;

pub use export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
pub use visualization::{plot_scan_grid, plot_time_course, PlotConfig};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("nothing to export: {0}")]
    Empty(String),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}
