//! # Settings Module
//!
//! ## Purpose
//! Holds every knob the analyze and edit pipelines used to take from hardcoded
//! globals: the output directory, the sentinel ("no-op") rule policy, which
//! timesteps feed the missing-element summary and the report wrap width.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "output_dir": "./results",
//!   "sentinel": {
//!     "selector": { "select": "expression", "expression": "NONE => NONE" },
//!     "reset_weight": 0.001
//!   },
//!   "report_scope": "final",
//!   "wrap_width": 80
//! }
//! ```
//! Every field is optional in the file; missing ones take their defaults.
//!
//! ## Output files
//! | File | Written by |
//! |------|------------|
//! | rules_applied.txt | analyze |
//! | lost_reactives.txt | analyze |
//! | possible_rules.txt | analyze |
//! | missing_elts_summary.txt | analyze |
//! | updated_modelfile.model2 | edit |
//! | cytoscape_network.sif | edit |
//! | annot_node.csv | edit |
//! | annot_edge.csv | edit |

use crate::errors::Model2Error;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_OUTPUT_DIR: &str = "./results";
pub const DEFAULT_SENTINEL_EXPRESSION: &str = "NONE => NONE";
pub const DEFAULT_SENTINEL_WEIGHT: f64 = 0.001;
pub const DEFAULT_WRAP_WIDTH: usize = 80;

/// How the terminal no-op rule is recognised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "select", rename_all = "snake_case")]
pub enum SentinelSelector {
    /// no rule gets its weight reset
    Disabled,
    /// rule with this generated key, e.g. "R95"
    Key { key: String },
    /// rule whose reactants and products equal those of this expression
    Expression { expression: String },
    /// the last rule of the model
    LastRule,
}

/// Terminal rule whose weight is force-reset after re-weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelPolicy {
    pub selector: SentinelSelector,
    pub reset_weight: f64,
}

impl Default for SentinelPolicy {
    fn default() -> Self {
        Self {
            selector: SentinelSelector::Expression {
                expression: DEFAULT_SENTINEL_EXPRESSION.to_string(),
            },
            reset_weight: DEFAULT_SENTINEL_WEIGHT,
        }
    }
}

/// Which timesteps contribute missing elements to the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportScope {
    /// only the last timestep of the presence table
    #[default]
    Final,
    /// the n most recent timesteps
    Last(usize),
    /// every timestep
    All,
}

impl ReportScope {
    /// Index range (into a timestep sequence of length `len`) covered by the scope.
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        match self {
            ReportScope::Final => len.saturating_sub(1)..len,
            ReportScope::Last(n) => len.saturating_sub(*n)..len,
            ReportScope::All => 0..len,
        }
    }
}

impl FromStr for ReportScope {
    type Err = String;

    /// accepts "final", "all" or "last:N"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "final" => Ok(ReportScope::Final),
            "all" => Ok(ReportScope::All),
            _ => {
                let n = s
                    .strip_prefix("last:")
                    .ok_or_else(|| format!("Unknown report scope '{}'", s))?;
                let n: usize = n
                    .parse()
                    .map_err(|_| format!("Invalid timestep count in report scope '{}'", s))?;
                Ok(ReportScope::Last(n))
            }
        }
    }
}

impl fmt::Display for ReportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportScope::Final => write!(f, "final"),
            ReportScope::Last(n) => write!(f, "last:{}", n),
            ReportScope::All => write!(f, "all"),
        }
    }
}

/// Configuration passed explicitly into both pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub output_dir: PathBuf,
    pub sentinel: SentinelPolicy,
    pub report_scope: ReportScope,
    pub wrap_width: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sentinel: SentinelPolicy::default(),
            report_scope: ReportScope::default(),
            wrap_width: DEFAULT_WRAP_WIDTH,
        }
    }
}

impl AnalysisConfig {
    /// Loads a JSON configuration file. Fields absent from the file keep their defaults.
    pub fn from_file(config_file: &Path) -> Result<Self, Model2Error> {
        if !config_file.exists() {
            return Err(Model2Error::FileNotFound {
                path: config_file.to_path_buf(),
            });
        }
        let content =
            fs::read_to_string(config_file).map_err(|e| Model2Error::io(config_file, e))?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from '{}'", config_file.display());
        Ok(config)
    }

    /// Saves the configuration as pretty JSON, e.g. to produce a template.
    pub fn save(&self, config_file: &Path) -> Result<(), Model2Error> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_file, content).map_err(|e| Model2Error::io(config_file, e))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Model2Error> {
        if self.wrap_width == 0 {
            return Err(Model2Error::InvalidConfig(
                "wrap_width must be positive".to_string(),
            ));
        }
        if !self.sentinel.reset_weight.is_finite() || self.sentinel.reset_weight <= 0.0 {
            return Err(Model2Error::InvalidConfig(format!(
                "sentinel reset weight must be a positive number, got {}",
                self.sentinel.reset_weight
            )));
        }
        if let ReportScope::Last(0) = self.report_scope {
            return Err(Model2Error::InvalidConfig(
                "report scope last:N needs N > 0".to_string(),
            ));
        }
        if let SentinelSelector::Expression { expression } = &self.sentinel.selector {
            if !expression.contains("=>") {
                return Err(Model2Error::InvalidConfig(format!(
                    "sentinel expression '{}' has no '=>'",
                    expression
                )));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.output_dir)
    }
}

/// Fixed file names of every output under the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
    pub fn rules_applied(&self) -> PathBuf {
        self.dir.join("rules_applied.txt")
    }
    pub fn lost_reactives(&self) -> PathBuf {
        self.dir.join("lost_reactives.txt")
    }
    pub fn possible_rules(&self) -> PathBuf {
        self.dir.join("possible_rules.txt")
    }
    pub fn missing_elements_summary(&self) -> PathBuf {
        self.dir.join("missing_elts_summary.txt")
    }
    pub fn updated_model(&self) -> PathBuf {
        self.dir.join("updated_modelfile.model2")
    }
    pub fn network(&self) -> PathBuf {
        self.dir.join("cytoscape_network.sif")
    }
    pub fn node_annotation(&self) -> PathBuf {
        self.dir.join("annot_node.csv")
    }
    pub fn edge_annotation(&self) -> PathBuf {
        self.dir.join("annot_edge.csv")
    }
}
