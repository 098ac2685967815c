//! CSV export of simulation and scan results
//!
//! Files are compatible with spreadsheets, pandas and most data tools.
//!
//! # Layout
//!
//! A single run:
//!
//! ```csv
//! time,E,C
//! 0,5,5
//! 1.4,7.609807778,5.669704299
//! ```
//!
//! A scan (one line per successful row and time point):
//!
//! ```csv
//! run,time,a_e,a_c,E,C
//! 0,0,0.1,0.1,5,5
//! 0,1.4,0.1,0.1,7.609807778,5.669704299
//! ```
//!
//! ## With Metadata
//!
//! With `include_metadata`, `#` comment lines come first:
//!
//! ```csv
//! # Co-culture simulation data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Model: coculture
//! # Solver: Dormand-Prince 5(4)
//! #
//! time,E,C
//! ```
//!
//! Readers must skip comment lines (`comment=b'#'` in the csv crate,
//! `comment="#"` in pandas).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use super::Exporter;
use crate::output::ExportError;
use crate::scan::ScanResult;
use crate::simulator::SimulationResult;
use crate::table::TableKind;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// ```rust
/// use coculture::output::CsvConfig;
///
/// let config = CsvConfig::default().delimiter(b';').precision(10);
/// assert_eq!(config.precision, Some(10));
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: b',')
    pub delimiter: u8,

    /// Decimal places; `None` writes the shortest exact representation (default)
    pub precision: Option<usize>,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Header metadata; derived from the result when `None`
    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "time")
    pub time_header: String,

    /// Header of the run column in scan exports (default: "run")
    pub run_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            precision: None,
            include_metadata: false,
            metadata: None,
            time_header: "time".to_string(),
            run_header: "run".to_string(),
        }
    }
}

impl CsvConfig {
    /// Semicolon-separated, for spreadsheets with a comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: b';',
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Write the comment header, derived from the exported result
    pub fn with_header(mut self) -> Self {
        self.include_metadata = true;
        self
    }

    /// Write the comment header with explicit metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set are written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CsvMetadata {
    pub model_name: Option<String>,
    pub solver_name: Option<String>,
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            model_name: result.metadata.get("model").cloned(),
            solver_name: result.metadata.get("solver").cloned(),
            custom: Vec::new(),
        }
    }

    pub fn from_scan(result: &ScanResult) -> Self {
        let mut metadata = Self::default();
        metadata.add_custom("Scanned parameters", &result.parameters.columns().join(", "));
        metadata.add_custom("Rows", &result.parameters.len().to_string());
        let failed = result.failed_rows();
        if !failed.is_empty() {
            let ids: Vec<String> = failed.iter().map(usize::to_string).collect();
            metadata.add_custom("Failed rows", &ids.join(", "));
        }
        metadata
    }

    pub fn add_custom(&mut self, key: &str, value: &str) {
        self.custom.push((key.to_string(), value.to_string()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header(file: &mut File, metadata: &CsvMetadata) -> Result<(), ExportError> {
    writeln!(file, "# Co-culture simulation data")?;
    writeln!(file, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(file, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(file, "# Solver: {}", solver)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(file, "# {}: {}", key, value)?;
    }

    writeln!(file, "#")?;
    Ok(())
}

fn format_number(value: f64, config: &CsvConfig) -> String {
    match config.precision {
        Some(precision) => format!("{:.prec$}", value, prec = precision),
        None => value.to_string(),
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Clone, Debug, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    fn open(&self, path: &Path, derived: impl FnOnce() -> CsvMetadata) -> Result<csv::Writer<File>, ExportError> {
        let mut file = File::create(path)?;

        if self.config.include_metadata {
            let metadata = self.config.metadata.clone().unwrap_or_else(derived);
            write_metadata_header(&mut file, &metadata)?;
        }

        Ok(csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .from_writer(file))
    }
}

impl Exporter for CsvExporter {
    type Error = ExportError;

    fn export_time_course(
        &self,
        result: &SimulationResult,
        which: TableKind,
        path: &Path,
    ) -> Result<(), ExportError> {
        let table = result.table(which);
        if table.is_empty() {
            return Err(ExportError::Empty(format!("{} table has no rows", which.label())));
        }

        let mut writer = self.open(path, || CsvMetadata::from_result(result))?;

        // ============================= Write Header ===========================

        let mut header = vec![self.config.time_header.as_str()];
        header.extend(table.columns().iter().map(String::as_str));
        writer.write_record(&header)?;

        // ============================= Write Data =============================

        let values = table.values();
        for (i, t) in table.time().iter().enumerate() {
            let mut record = Vec::with_capacity(values.ncols() + 1);
            record.push(format_number(*t, &self.config));
            record.extend(values.row(i).iter().map(|v| format_number(*v, &self.config)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        debug!("wrote {} rows to {}", table.len(), path.display());
        Ok(())
    }

    fn export_scan(&self, result: &ScanResult, which: TableKind, path: &Path) -> Result<(), ExportError> {
        let table = result.table(which);
        if table.is_empty() {
            return Err(ExportError::Empty("scan has no successful rows".to_string()));
        }

        let mut writer = self.open(path, || CsvMetadata::from_scan(result))?;
        let parameters = &result.parameters;

        // ============================= Write Header ===========================

        let mut header = vec![self.config.run_header.as_str(), self.config.time_header.as_str()];
        header.extend(parameters.columns().iter().map(String::as_str));
        header.extend(table.columns().iter().map(String::as_str));
        writer.write_record(&header)?;

        // ============================= Write Data =============================

        let values = table.values();
        for (i, &(run, t)) in table.index().iter().enumerate() {
            let mut record = vec![run.to_string(), format_number(t, &self.config)];
            for column in parameters.columns() {
                let value = parameters.value(run, column).unwrap_or(f64::NAN);
                record.push(format_number(value, &self.config));
            }
            record.extend(values.row(i).iter().map(|v| format_number(*v, &self.config)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        debug!("wrote {} scan rows to {}", table.len(), path.display());
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, ModelBuilder};
    use crate::scan::{Scan, ScanOptions, ScanTable};
    use crate::simulator::Simulator;
    use crate::error::ModelError;
    use std::fs;
    use tempfile::NamedTempFile;

    // ====== Mock model for CSV file testing ======

    fn decay() -> Result<Model, ModelError> {
        ModelBuilder::new("decay")
            .add_variable("x", 2.0)?
            .add_parameter("k", 0.1)?
            .add_reaction("v", |a| a[0] * a[1], &["k", "x"], &[("x", -1.0)])?
            .build()
    }

    fn run() -> SimulationResult {
        Simulator::new(decay().unwrap())
            .simulate_time_course(&[0.0, 1.0, 2.0])
            .unwrap()
            .get_result()
            .unwrap()
    }

    fn scan(values: Vec<f64>) -> ScanResult {
        let table = ScanTable::grid([("k", values)]).unwrap();
        Scan::time_course(decay, &table, &[0.0, 1.0], &ScanOptions::default()).unwrap()
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path).unwrap().lines().map(String::from).collect()
    }

    #[test]
    fn test_time_course_layout() {
        let tmp = NamedTempFile::new().unwrap();
        CsvExporter::default()
            .export_time_course(&run(), TableKind::Variables, tmp.path())
            .unwrap();

        let lines = lines(tmp.path());
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "time,x");
        assert_eq!(lines[1], "0,2");
        assert!(lines[2].starts_with("1,"));
    }

    #[test]
    fn test_flux_export_with_precision() {
        let tmp = NamedTempFile::new().unwrap();
        CsvExporter::new(CsvConfig::default().precision(3).delimiter(b';'))
            .export_time_course(&run(), TableKind::Fluxes, tmp.path())
            .unwrap();

        let lines = lines(tmp.path());
        assert_eq!(lines[0], "time;v");
        assert_eq!(lines[1], "0.000;0.200");
    }

    #[test]
    fn test_metadata_header() {
        let tmp = NamedTempFile::new().unwrap();
        CsvExporter::new(CsvConfig::default().with_header())
            .export_time_course(&run(), TableKind::Variables, tmp.path())
            .unwrap();

        let lines = lines(tmp.path());
        assert_eq!(lines[0], "# Co-culture simulation data");
        assert!(lines[1].starts_with("# Generated: "));
        assert!(lines.contains(&"# Model: decay".to_string()));
        assert!(lines.contains(&"# Solver: Dormand-Prince 5(4)".to_string()));
        assert!(lines.contains(&"time,x".to_string()));

        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .from_path(tmp.path())
            .unwrap();
        assert_eq!(reader.records().count(), 3);
    }

    #[test]
    fn test_scan_layout() {
        let tmp = NamedTempFile::new().unwrap();
        CsvExporter::default()
            .export_scan(&scan(vec![0.1, 0.2]), TableKind::Variables, tmp.path())
            .unwrap();

        let lines = lines(tmp.path());
        assert_eq!(lines[0], "run,time,k,x");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "0,0,0.1,2");
        assert!(lines[3].starts_with("1,0,0.2,"));
    }

    #[test]
    fn test_scan_header_lists_rows() {
        let tmp = NamedTempFile::new().unwrap();
        CsvExporter::new(CsvConfig::default().with_header())
            .export_scan(&scan(vec![0.1]), TableKind::Fluxes, tmp.path())
            .unwrap();

        let lines = lines(tmp.path());
        assert!(lines.contains(&"# Scanned parameters: k".to_string()));
        assert!(lines.contains(&"# Rows: 1".to_string()));
        assert!(lines.contains(&"run,time,k,v".to_string()));
    }

    #[test]
    fn test_empty_scan_is_an_error() {
        let tmp = NamedTempFile::new().unwrap();
        let err = CsvExporter::default()
            .export_scan(&scan(Vec::new()), TableKind::Variables, tmp.path())
            .unwrap_err();
        assert!(matches!(err, ExportError::Empty(_)));
    }

    #[test]
    fn test_unwritable_path() {
        let err = CsvExporter::default()
            .export_time_course(&run(), TableKind::Variables, Path::new("/nonexistent/dir/out.csv"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
