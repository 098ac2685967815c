//! Scan settings from TOML
//!
//! A settings file describes one co-culture scan end to end:
//!
//! ```toml
//! [time]
//! start = 0.0
//! end = 14.0
//! points = 11
//!
//! [solver]
//! method = "dormand-prince"   # or "rk4" (with `substeps`)
//! rtol = 1e-8
//! time_budget_secs = 5.0
//!
//! [scan]
//! parallel = true
//! failure_policy = "continue" # or "abort"
//!
//! [model]                     # co-culture defaults, any subset
//! theta = 0.001
//!
//! [grid]                      # cartesian product, last axis fastest
//! a_e = [0.1, 1.0, 2.0]
//! a_c = [0.1, 1.0]
//!
//! [[scenarios]]               # explicit rows, appended after the grid
//! a_e = 5.0
//! a_c = 0.0
//! ```
//!
//! Every section is optional. Without `[grid]` and `[[scenarios]]` the scan
//! has a single row running the model defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::error::ModelError;
use crate::model::Model;
use crate::models::coculture::{self, CocultureParameters};
use crate::scan::{FailurePolicy, ScanOptions, ScanTable};
use crate::solver::{linspace, SolverConfiguration};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

// =================================================================================================
// Sections
// =================================================================================================

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSettings {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 14.0,
            points: 11,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MethodName {
    #[default]
    DormandPrince,
    Rk4,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSettings {
    pub method: MethodName,
    pub rtol: Option<f64>,
    pub atol: Option<f64>,
    pub max_steps: Option<usize>,
    /// RK4 only (default: 100)
    pub substeps: Option<usize>,
    pub time_budget_secs: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionSettings {
    pub parallel: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

// =================================================================================================
// Settings
// =================================================================================================

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSettings {
    pub time: TimeSettings,
    pub solver: SolverSettings,
    pub scan: ExecutionSettings,
    pub model: CocultureParameters,
    pub grid: IndexMap<String, Vec<f64>>,
    pub scenarios: Vec<IndexMap<String, f64>>,
}

impl ScanSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Evenly spaced output grid from `[time]`
    pub fn time_points(&self) -> Result<Vec<f64>, ConfigError> {
        let TimeSettings { start, end, points } = self.time;
        if !start.is_finite() || !end.is_finite() {
            return Err(ConfigError::Invalid("time bounds must be finite".to_string()));
        }
        if end < start {
            return Err(ConfigError::Invalid(format!(
                "time end {end} is before start {start}"
            )));
        }
        if points == 0 {
            return Err(ConfigError::Invalid("time points must be at least 1".to_string()));
        }
        Ok(linspace(start, end, points))
    }

    pub fn solver_configuration(&self) -> Result<SolverConfiguration, ConfigError> {
        let settings = &self.solver;
        let mut config = match settings.method {
            MethodName::DormandPrince => SolverConfiguration::dormand_prince(),
            MethodName::Rk4 => SolverConfiguration::rk4(settings.substeps.unwrap_or(100)),
        };

        if let Some(rtol) = settings.rtol {
            config.rtol = rtol;
        }
        if let Some(atol) = settings.atol {
            config.atol = atol;
        }
        if let Some(max_steps) = settings.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(secs) = settings.time_budget_secs {
            let budget = Duration::try_from_secs_f64(secs)
                .map_err(|e| ConfigError::Invalid(format!("time_budget_secs = {secs}: {e}")))?;
            config.time_budget = Some(budget);
        }

        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    pub fn scan_options(&self) -> Result<ScanOptions, ConfigError> {
        let mut options = ScanOptions::default()
            .with_solver(self.solver_configuration()?)
            .with_failure_policy(self.scan.failure_policy);
        options.parallel = self.scan.parallel;
        Ok(options)
    }

    /// Grid rows followed by explicit scenario rows
    ///
    /// Scenarios must set exactly the grid's parameters, or, without a grid,
    /// the same parameters as the first scenario.
    pub fn to_scan_table(&self) -> Result<ScanTable, ConfigError> {
        let invalid = |e: crate::error::ScanError| ConfigError::Invalid(e.to_string());

        if self.scenarios.is_empty() {
            return ScanTable::grid(self.grid.iter().map(|(k, v)| (k.as_str(), v))).map_err(invalid);
        }

        let mut table = if self.grid.is_empty() {
            ScanTable::new(self.scenarios[0].keys().map(String::as_str)).map_err(invalid)?
        } else {
            ScanTable::grid(self.grid.iter().map(|(k, v)| (k.as_str(), v))).map_err(invalid)?
        };

        for (i, scenario) in self.scenarios.iter().enumerate() {
            if scenario.len() != table.columns().len() {
                return Err(ConfigError::Invalid(format!(
                    "scenario {i} sets {} parameters, expected {}",
                    scenario.len(),
                    table.columns().len()
                )));
            }
            let row = table
                .columns()
                .iter()
                .map(|column| {
                    scenario.get(column).copied().ok_or_else(|| {
                        ConfigError::Invalid(format!("scenario {i} does not set '{column}'"))
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            table.push_row(&row).map_err(invalid)?;
        }

        Ok(table)
    }

    /// Co-culture model with the `[model]` defaults
    pub fn build_model(&self) -> Result<Model, ModelError> {
        coculture::build_model(&self.model)
    }

    pub fn model_factory(&self) -> impl Fn() -> Result<Model, ModelError> + Sync + Send {
        coculture::factory(self.model)
    }
}
