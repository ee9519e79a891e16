//! Log file naming.
//!
//! Example: directory `original/results`, case `sat_case_1`, 8 workers
//! => `original/results/sat_case_1-8.txt`

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunIdentity {
    pub configuration: String,
    pub worker_count: u32,
    pub case: String,
}

impl RunIdentity {
    pub fn new(
        configuration: impl Into<String>,
        worker_count: u32,
        case: impl Into<String>,
    ) -> Self {
        Self {
            configuration: configuration.into(),
            worker_count,
            case: case.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}.txt", self.case, self.worker_count)
    }

    pub fn log_path(&self, directory: &Path) -> PathBuf {
        directory.join(self.file_name())
    }
}
