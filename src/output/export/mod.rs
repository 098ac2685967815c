//! Writing run and scan tables to files
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use coculture::output::export::{CsvExporter, Exporter};
//! use coculture::TableKind;
//!
//! let exporter = CsvExporter::default();
//!
//! // One run: time + one column per variable
//! exporter.export_time_course(&result, TableKind::Variables, Path::new("run.csv"))?;
//!
//! // A scan: run id, time, scanned parameters, then the fluxes
//! exporter.export_scan(&scan, TableKind::Fluxes, Path::new("fluxes.csv"))?;
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::scan::ScanResult;
use crate::simulator::SimulationResult;
use crate::table::TableKind;

/// A file format for result tables
///
/// Formats report failures through their own error type.
pub trait Exporter {
    type Error: std::error::Error;

    /// Exports one table of a single run.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or the result has no
    /// rows.
    fn export_time_course(
        &self,
        result: &SimulationResult,
        which: TableKind,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// Exports one table of a scan, rows keyed by `(run, time)`.
    ///
    /// Failed rows have no lines. A scan without successful rows is an error.
    fn export_scan(&self, result: &ScanResult, which: TableKind, path: &Path) -> Result<(), Self::Error>;
}
