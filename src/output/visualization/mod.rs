//! Visualization of simulation results using the `plotters` library.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **time_course**: one run, every column against time
//! - **scan_grid**: one subplot per scan row
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use coculture::output::visualization::{plot_scan_grid, plot_time_course, PlotConfig};
//! use coculture::TableKind;
//!
//! plot_time_course(&result, TableKind::Variables, Path::new("run.png"), None)?;
//!
//! let mut config = PlotConfig::scan_grid("Competition scan");
//! config.columns = 3;
//! plot_scan_grid(&scan, TableKind::Fluxes, Path::new("fluxes.svg"), Some(&config))?;
//! ```

pub mod config;
pub mod scan_grid;
pub mod time_course;

pub use config::{IntoOptionalTitle, PlotConfig, NO_TITLE};
pub use scan_grid::plot_scan_grid;
pub use time_course::plot_time_course;
