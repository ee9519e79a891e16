//! Experiment description (experiment.json).
//!
//! JSON shape:
//! {
//!   "cases": ["sat_case_1", "unsat_case_1"],
//!   "worker_counts": [1, 2, 4, 8],
//!   "configurations": [
//!     {
//!       "name": "original",              // key used in summaries
//!       "label": "original approach",    // legend text, defaults to name
//!       "directory": "original/results"  // relative paths resolve against --root
//!     }
//!   ],
//!   "sequence_scope": "series",          // or "run"
//!   "missing_logs": "skip"               // or "fail"
//! }
//!
//! Every field is optional; missing fields fall back to the default layout of
//! the clause-sharing comparison.

use crate::Result;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// How communication sequence numbers are expected to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceScope {
    /// Numbering continues across all cases of one worker count, in iteration order.
    #[default]
    Series,
    /// Numbering restarts at 1 in every log file.
    Run,
}

/// What to do when a log file for a (worker count, case) pair does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLogPolicy {
    /// Warn and leave the sums untouched.
    #[default]
    Skip,
    /// Abort the aggregation.
    Fail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentSpec {
    #[serde(default)]
    pub cases: Vec<String>,

    #[serde(default)]
    pub worker_counts: Vec<u32>,

    #[serde(default)]
    pub configurations: Vec<ConfigurationSpec>,

    #[serde(default)]
    pub sequence_scope: SequenceScope,

    #[serde(default)]
    pub missing_logs: MissingLogPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationSpec {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    pub directory: PathBuf,
}

/// Validated configuration with its results directory resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub name: String,
    pub label: String,
    pub directory: PathBuf,
}

/// Validated experiment, ready for aggregation.
#[derive(Debug, Clone)]
pub struct Experiment {
    pub cases: Vec<String>,
    pub worker_counts: Vec<u32>,
    pub configurations: Vec<Configuration>,
    pub sequence_scope: SequenceScope,
    pub missing_logs: MissingLogPolicy,
}

impl ExperimentSpec {
    /// Read an experiment file; fields it leaves out come from [`ExperimentSpec::default_layout`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read experiment file {}", path.display()))?;
        let spec: ExperimentSpec = serde_json::from_str(&text)
            .with_context(|| format!("parse experiment file {}", path.display()))?;
        Ok(spec.or_default_layout())
    }

    /// Three clause-sharing variants, four cases, 1 to 48 workers.
    pub fn default_layout() -> Self {
        let configuration = |name: &str, label: &str, directory: &str| ConfigurationSpec {
            name: name.to_string(),
            label: Some(label.to_string()),
            directory: PathBuf::from(directory),
        };

        Self {
            cases: ["sat_case_1", "sat_case_3", "unsat_case_1", "unsat_case_3"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            worker_counts: vec![1, 2, 4, 8, 16, 32, 48],
            configurations: vec![
                configuration("original", "original approach", "original/results"),
                configuration("local", "local clause sharing", "local_clause_sharing/results"),
                configuration(
                    "local-fast",
                    "local clause sharing w/ fast sharing",
                    "local_clause_sharing/results-fast_share",
                ),
            ],
            sequence_scope: SequenceScope::default(),
            missing_logs: MissingLogPolicy::default(),
        }
    }

    fn or_default_layout(mut self) -> Self {
        let defaults = Self::default_layout();
        if self.cases.is_empty() {
            self.cases = defaults.cases;
        }
        if self.worker_counts.is_empty() {
            self.worker_counts = defaults.worker_counts;
        }
        if self.configurations.is_empty() {
            self.configurations = defaults.configurations;
        }
        self
    }

    /// Check names and counts, and resolve directories against `root`.
    pub fn validate_and_build(&self, root: &Path) -> Result<Experiment> {
        if self.cases.is_empty() {
            bail!("experiment lists no cases");
        }
        if self.worker_counts.is_empty() {
            bail!("experiment lists no worker counts");
        }
        if self.configurations.is_empty() {
            bail!("experiment lists no configurations");
        }

        let mut seen_cases = BTreeSet::new();
        for case in &self.cases {
            if case.trim().is_empty() {
                bail!("experiment contains an empty case name");
            }
            if !seen_cases.insert(case.as_str()) {
                bail!("duplicate case in experiment: {}", case);
            }
        }

        let mut seen_counts = BTreeSet::new();
        for &count in &self.worker_counts {
            if count == 0 {
                bail!("worker counts must be positive");
            }
            if !seen_counts.insert(count) {
                bail!("duplicate worker count in experiment: {}", count);
            }
        }

        let mut seen_names = BTreeSet::new();
        let mut configurations = Vec::with_capacity(self.configurations.len());
        for raw in &self.configurations {
            if raw.name.trim().is_empty() {
                bail!("configuration without a name (directory {})", raw.directory.display());
            }
            if !seen_names.insert(raw.name.as_str()) {
                bail!("duplicate configuration name in experiment: {}", raw.name);
            }

            let directory = if raw.directory.is_absolute() {
                raw.directory.clone()
            } else {
                root.join(&raw.directory)
            };

            configurations.push(Configuration {
                name: raw.name.clone(),
                label: raw.label.clone().unwrap_or_else(|| raw.name.clone()),
                directory,
            });
        }

        Ok(Experiment {
            cases: self.cases.clone(),
            worker_counts: self.worker_counts.clone(),
            configurations,
            sequence_scope: self.sequence_scope,
            missing_logs: self.missing_logs,
        })
    }
}
